//! Value-to-color mapping.
//!
//! Mapping is done in two explicit passes over the sample grid:
//!
//! 1. [`valid_range`] reduces the valid samples to their minimum and maximum.
//!    Invalid samples (NaN or infinite) are skipped, never replaced.
//! 2. [`ColorMapper::map`] normalizes each valid sample against that range,
//!    samples the gradient, and attaches the configured opacity. Invalid
//!    samples become [`Rgba::TRANSPARENT`].
//!
//! Cells are independent, so [`ColorMapper::map_par`] runs the second pass
//! on the rayon pool and produces exactly the same output.

use crate::gradient::{Gradient, GradientRegistry};
use crate::{ColorError, Grid, Result, Rgba};
use rayon::prelude::*;
use std::sync::Arc;

/// Opacity used by [`map_values_to_colors`] and new mappers.
pub const DEFAULT_OPACITY: f32 = 0.7;

/// Inclusive value range used for normalization. Always `min < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    min: f32,
    max: f32,
}

impl ValueRange {
    /// Create a range. Both bounds must be finite and `min < max`.
    pub fn new(min: f32, max: f32) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ColorError::DegenerateRange {
                reason: format!("range bounds must be finite, got [{}, {}]", min, max),
            });
        }
        if min >= max {
            return Err(ColorError::DegenerateRange {
                reason: format!("range minimum {} is not below maximum {}", min, max),
            });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Width of the range, in f64 so that bounds near `±f32::MAX` do not
    /// overflow.
    pub fn span(&self) -> f64 {
        self.max as f64 - self.min as f64
    }

    /// Position of `value` within the range, clamped to `[0, 1]`.
    pub fn normalize(&self, value: f32) -> f32 {
        ((value as f64 - self.min as f64) / self.span()).clamp(0.0, 1.0) as f32
    }
}

/// Whether a sample holds a usable value.
#[inline]
pub fn is_valid(value: f32) -> bool {
    value.is_finite()
}

/// First pass: minimum and maximum over the valid samples only.
///
/// Fails with [`ColorError::DegenerateRange`] when there are no valid
/// samples or when every valid sample has the same value.
pub fn valid_range(samples: &Grid<f32>) -> Result<ValueRange> {
    let mut count = 0usize;
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;

    for &v in samples.iter().filter(|v| is_valid(**v)) {
        count += 1;
        min = min.min(v);
        max = max.max(v);
    }

    if count == 0 {
        return Err(ColorError::DegenerateRange {
            reason: format!("no valid samples in {} cells", samples.len()),
        });
    }
    if min == max {
        return Err(ColorError::DegenerateRange {
            reason: format!("all {} valid samples equal {}", count, min),
        });
    }

    Ok(ValueRange { min, max })
}

/// Maps sample grids to color grids with a fixed gradient and opacity.
#[derive(Debug, Clone)]
pub struct ColorMapper {
    gradient: Arc<dyn Gradient>,
    opacity: f32,
    /// Fixed normalization range. When `None` the range is computed from
    /// each input grid.
    range: Option<ValueRange>,
}

impl ColorMapper {
    /// Create a mapper for an injected gradient.
    pub fn new(gradient: Arc<dyn Gradient>) -> Self {
        Self {
            gradient,
            opacity: DEFAULT_OPACITY,
            range: None,
        }
    }

    /// Create a mapper for a gradient looked up by name.
    pub fn from_registry(registry: &GradientRegistry, name: &str) -> Result<Self> {
        Ok(Self::new(registry.get(name)?))
    }

    /// Set the opacity applied to valid cells. Must be in `(0, 1]`.
    pub fn with_opacity(mut self, opacity: f32) -> Result<Self> {
        if !(opacity > 0.0 && opacity <= 1.0) {
            return Err(ColorError::InvalidOpacity(opacity));
        }
        self.opacity = opacity;
        Ok(self)
    }

    /// Normalize against a fixed range instead of the data's own range.
    /// Values outside it are clamped to the gradient ends.
    pub fn with_range(mut self, range: ValueRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn gradient(&self) -> &Arc<dyn Gradient> {
        &self.gradient
    }

    /// The range that [`map`](Self::map) would use for `samples`.
    pub fn resolve_range(&self, samples: &Grid<f32>) -> Result<ValueRange> {
        match self.range {
            Some(range) => Ok(range),
            None => valid_range(samples),
        }
    }

    /// Color for one sample.
    #[inline]
    pub fn color_for(&self, value: f32, range: &ValueRange) -> Rgba {
        if !is_valid(value) {
            return Rgba::TRANSPARENT;
        }
        let t = range.normalize(value);
        Rgba::from_rgb(self.gradient.sample(t), self.opacity)
    }

    /// Map a sample grid to a color grid of the same shape.
    pub fn map(&self, samples: &Grid<f32>) -> Result<Grid<Rgba>> {
        let range = self.resolve_range(samples)?;
        self.map_in_range(samples, &range)
    }

    /// Same as [`map`](Self::map), with the per-cell pass run in parallel.
    pub fn map_par(&self, samples: &Grid<f32>) -> Result<Grid<Rgba>> {
        let range = self.resolve_range(samples)?;
        self.map_par_in_range(samples, &range)
    }

    /// Second pass only, against a range the caller already resolved.
    pub fn map_in_range(&self, samples: &Grid<f32>, range: &ValueRange) -> Result<Grid<Rgba>> {
        let colors = samples.map(|&v| self.color_for(v, range));
        check_shape(samples, &colors)?;
        Ok(colors)
    }

    /// Parallel form of [`map_in_range`](Self::map_in_range).
    pub fn map_par_in_range(&self, samples: &Grid<f32>, range: &ValueRange) -> Result<Grid<Rgba>> {
        let data: Vec<Rgba> = samples
            .as_slice()
            .par_iter()
            .map(|&v| self.color_for(v, range))
            .collect();
        let colors = Grid::from_vec(samples.rows(), samples.cols(), data)?;
        check_shape(samples, &colors)?;
        Ok(colors)
    }
}

/// Map `samples` with a built-in gradient at [`DEFAULT_OPACITY`].
///
/// ```
/// use demtint_color::{map_values_to_colors, Grid};
///
/// let samples = Grid::from_rows(vec![vec![1.0, f32::NAN], vec![3.0, 2.0]])?;
/// let colors = map_values_to_colors(&samples, "linear-gray")?;
/// assert!(colors.get(0, 1).unwrap().is_transparent());
/// # Ok::<(), demtint_color::ColorError>(())
/// ```
pub fn map_values_to_colors(samples: &Grid<f32>, gradient: &str) -> Result<Grid<Rgba>> {
    ColorMapper::from_registry(&GradientRegistry::with_builtins(), gradient)?.map(samples)
}

fn check_shape(samples: &Grid<f32>, colors: &Grid<Rgba>) -> Result<()> {
    if samples.shape() != colors.shape() {
        return Err(ColorError::ShapeMismatch {
            expected_rows: samples.rows(),
            expected_cols: samples.cols(),
            detail: format!("{}x{} color grid", colors.rows(), colors.cols()),
        });
    }
    Ok(())
}
