//! Load, mask, color and export one DEM raster.

use crate::config::RenderConfig;
use crate::overlay::ImageOverlay;
use crate::Result;
use demtint_color::{ColorMapper, GradientRegistry, ValueRange};
use demtint_dem::DemRaster;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What a render produced.
#[derive(Debug, Clone)]
pub struct RenderSummary {
    pub png_path: PathBuf,
    pub descriptor_path: PathBuf,
    pub width: usize,
    pub height: usize,
    pub valid_cells: usize,
    pub masked_cells: usize,
    pub range: ValueRange,
}

/// Load the configured raster, applying bounds and no-data overrides.
pub fn load_raster(config: &RenderConfig) -> Result<DemRaster> {
    let raster = match config.bounds {
        Some(bounds) => DemRaster::from_file_with_bounds(&config.input, bounds.into())?,
        None => DemRaster::from_file(&config.input)?,
    };

    let raster = match config.no_data {
        Some(value) => {
            debug!(
                "Overriding no-data {:?} with {}",
                raster.no_data_value(),
                value
            );
            raster.with_no_data(Some(value))
        }
        None => raster,
    };

    if config.stride > 1 {
        let (w, h) = raster.dimensions();
        let decimated = raster.decimate(config.stride)?;
        let (dw, dh) = decimated.dimensions();
        info!("Decimated {}x{} to {}x{} (stride {})", w, h, dw, dh, config.stride);
        Ok(decimated)
    } else {
        Ok(raster)
    }
}

/// Color an already loaded raster.
pub fn build_overlay(
    raster: &DemRaster,
    config: &RenderConfig,
    registry: &GradientRegistry,
) -> Result<ImageOverlay> {
    let samples = raster.masked_samples();

    let mut mapper =
        ColorMapper::from_registry(registry, &config.gradient)?.with_opacity(config.opacity)?;
    if let Some(range) = config.value_range()? {
        mapper = mapper.with_range(range);
    }
    let range = mapper.resolve_range(&samples)?;

    let start = Instant::now();
    let colors = if config.parallel {
        mapper.map_par_in_range(&samples, &range)?
    } else {
        mapper.map_in_range(&samples, &range)?
    };
    debug!(
        "Mapped {} cells with '{}' in {:?}",
        samples.len(),
        config.gradient,
        start.elapsed()
    );

    Ok(ImageOverlay {
        colors,
        bounds: raster.bounds(),
        opacity: mapper.opacity(),
        gradient: mapper.gradient().name().to_string(),
        range,
    })
}

/// Run the whole pipeline and write `<name>.png` and `<name>.json`.
pub fn render(config: &RenderConfig, registry: &GradientRegistry) -> Result<RenderSummary> {
    config.validate()?;

    info!("Loading {}", config.input.display());
    let raster = load_raster(config)?;

    let overlay = build_overlay(&raster, config, registry)?;

    let valid_cells = overlay
        .colors
        .iter()
        .filter(|c| !c.is_transparent())
        .count();
    let masked_cells = overlay.colors.len() - valid_cells;
    if masked_cells > 0 {
        info!("{} of {} cells are no-data", masked_cells, overlay.colors.len());
    }
    if valid_cells < overlay.colors.len() / 2 {
        warn!(
            "Only {} of {} cells hold elevation data",
            valid_cells,
            overlay.colors.len()
        );
    }

    std::fs::create_dir_all(&config.output_dir)?;
    let name = config.output_name();
    let image_name = format!("{}.png", name);
    let png_path = config.output_dir.join(&image_name);
    let descriptor_path = config.output_dir.join(format!("{}.json", name));

    overlay.write_png(&png_path)?;
    overlay.write_descriptor(&descriptor_path, &image_name)?;

    info!(
        "Wrote {} ({}x{}, range {:.1}..{:.1} m)",
        png_path.display(),
        overlay.colors.cols(),
        overlay.colors.rows(),
        overlay.range.min(),
        overlay.range.max()
    );

    Ok(RenderSummary {
        png_path,
        descriptor_path,
        width: overlay.colors.cols(),
        height: overlay.colors.rows(),
        valid_cells,
        masked_cells,
        range: overlay.range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use demtint_color::{ColorError, Grid};
    use demtint_dem::GeoBounds;

    fn raster(rows: Vec<Vec<f32>>, no_data: Option<f32>) -> DemRaster {
        DemRaster::from_grid(
            Grid::from_rows(rows).unwrap(),
            GeoBounds {
                min_lat: 0.0,
                max_lat: 1.0,
                min_lon: 0.0,
                max_lon: 1.0,
            },
            no_data,
        )
    }

    fn config(gradient: &str) -> RenderConfig {
        RenderConfig {
            input: PathBuf::from("memory.tif"),
            gradient: gradient.to_string(),
            opacity: 0.5,
            ..Default::default()
        }
    }

    #[test]
    fn test_build_overlay_masks_sentinel() {
        let raster = raster(vec![vec![1.0, -9999.0], vec![3.0, 2.0]], Some(-9999.0));
        let overlay =
            build_overlay(&raster, &config("linear-gray"), &GradientRegistry::with_builtins())
                .unwrap();

        assert_eq!(overlay.range.min(), 1.0);
        assert_eq!(overlay.range.max(), 3.0);
        assert!(overlay.colors.get(0, 1).unwrap().is_transparent());
        assert_eq!(overlay.colors.get(1, 1).unwrap().r, 0.5);
        assert_eq!(overlay.colors.get(1, 1).unwrap().a, 0.5);
    }

    #[test]
    fn test_build_overlay_reports_range_used_for_colors() {
        let raster = raster(vec![vec![0.0, 50.0, 100.0]], None);
        let mut config = config("linear-gray");
        config.value_min = Some(0.0);
        config.value_max = Some(200.0);
        let overlay = build_overlay(&raster, &config, &GradientRegistry::with_builtins()).unwrap();

        assert_eq!(overlay.range, ValueRange::new(0.0, 200.0).unwrap());
        assert_abs_diff_eq!(overlay.colors.get(0, 1).unwrap().r, 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(overlay.colors.get(0, 2).unwrap().r, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_build_overlay_single_valid_cell_fails() {
        let raster = raster(vec![vec![-9999.0, 7.0]], Some(-9999.0));
        let err = build_overlay(&raster, &config("terrain"), &GradientRegistry::with_builtins())
            .unwrap_err();
        assert!(matches!(
            err,
            crate::RunnerError::ColorError(ColorError::DegenerateRange { .. })
        ));
    }

    #[test]
    fn test_build_overlay_unknown_gradient() {
        let raster = raster(vec![vec![1.0, 2.0]], None);
        let registry = GradientRegistry::with_builtins();
        assert!(build_overlay(&raster, &config("jet"), &registry).is_err());
    }
}
