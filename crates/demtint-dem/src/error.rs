//! Error types for the DEM crate.

use thiserror::Error;

/// Errors that can occur when loading DEM rasters.
#[derive(Debug, Error)]
pub enum DemError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding error.
    #[error("TIFF decode error: {0}")]
    TiffDecode(#[from] tiff::TiffError),

    /// Invalid GeoTIFF - missing required tags or inconsistent contents.
    #[error("Invalid GeoTIFF: {0}")]
    InvalidGeoTiff(String),

    /// Invalid tile filename - cannot parse coordinates.
    #[error("Invalid tile filename: {0}")]
    InvalidFilename(String),

    /// Raster data could not be arranged into a grid.
    #[error("Grid error: {0}")]
    Grid(#[from] demtint_color::ColorError),
}
