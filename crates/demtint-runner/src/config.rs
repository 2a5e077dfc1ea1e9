//! Render configuration loaded from YAML and/or command-line flags.

use crate::{Result, RunnerError};
use demtint_color::{ValueRange, DEFAULT_OPACITY};
use demtint_dem::GeoBounds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Gradient used when none is configured.
pub const DEFAULT_GRADIENT: &str = "terrain";

/// Explicit bounds for rasters without georeferencing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsConfig {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl From<BoundsConfig> for GeoBounds {
    fn from(b: BoundsConfig) -> Self {
        GeoBounds {
            min_lat: b.south,
            max_lat: b.north,
            min_lon: b.west,
            max_lon: b.east,
        }
    }
}

/// Everything needed to turn one DEM file into an overlay.
///
/// ```yaml
/// input: dem_data/USGS_13_n48w123_20240327.tif
/// output_dir: out
/// gradient: viridis
/// opacity: 0.6
/// no_data: -9999
/// stride: 4
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// GeoTIFF to render.
    pub input: PathBuf,
    /// Directory receiving the PNG and its descriptor.
    pub output_dir: PathBuf,
    /// Base name of the outputs. Defaults to the input file stem.
    pub name: Option<String>,
    /// Registered gradient name.
    pub gradient: String,
    /// Alpha of valid cells, in (0, 1].
    pub opacity: f32,
    /// Replaces the no-data sentinel declared by the file.
    pub no_data: Option<f32>,
    /// Fixed normalization minimum. Must be given together with `value_max`.
    pub value_min: Option<f32>,
    /// Fixed normalization maximum. Must be given together with `value_min`.
    pub value_max: Option<f32>,
    /// Keep every n-th row and column before mapping.
    pub stride: usize,
    /// Run the per-cell pass on the rayon pool.
    pub parallel: bool,
    /// Bounds to use instead of the file's georeferencing.
    pub bounds: Option<BoundsConfig>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            input: PathBuf::new(),
            output_dir: PathBuf::from("."),
            name: None,
            gradient: DEFAULT_GRADIENT.to_string(),
            opacity: DEFAULT_OPACITY,
            no_data: None,
            value_min: None,
            value_max: None,
            stride: 1,
            parallel: true,
            bounds: None,
        }
    }
}

impl RenderConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Check the fields that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() {
            return Err(RunnerError::ConfigError("no input file given".to_string()));
        }
        if self.stride == 0 {
            return Err(RunnerError::ConfigError(
                "stride must be at least 1".to_string(),
            ));
        }
        self.value_range()?;
        Ok(())
    }

    /// Fixed normalization range, if configured.
    pub fn value_range(&self) -> Result<Option<ValueRange>> {
        match (self.value_min, self.value_max) {
            (None, None) => Ok(None),
            (Some(min), Some(max)) => Ok(Some(ValueRange::new(min, max)?)),
            _ => Err(RunnerError::ConfigError(
                "value_min and value_max must be set together".to_string(),
            )),
        }
    }

    /// Base name for the output files.
    pub fn output_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.input
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
                .unwrap_or_else(|| "overlay".to_string())
        })
    }
}
