//! Error type for the render pipeline.

use thiserror::Error;

/// Errors that halt the render pipeline.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Reading the raster or writing the overlay files failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The render configuration file is not valid YAML.
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The overlay descriptor could not be serialized.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The DEM raster could not be loaded.
    #[error("DEM error: {0}")]
    DemError(#[from] demtint_dem::DemError),

    /// The sample grid could not be mapped to colors.
    #[error("Color mapping error: {0}")]
    ColorError(#[from] demtint_color::ColorError),

    /// The PNG encoder failed.
    #[error("Image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    /// The color grid does not fit the 32-bit image dimensions.
    #[error("Overlay {width}x{height} is too large for an image")]
    ImageTooLarge {
        /// Grid columns.
        width: usize,
        /// Grid rows.
        height: usize,
    },

    /// A configuration value is inconsistent or out of range.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;
