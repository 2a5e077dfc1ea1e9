//! # demtint-dem
//!
//! Loads Digital Elevation Model rasters from GeoTIFF files and reconciles
//! their no-data sentinel with NaN so the samples can go straight into
//! `demtint_color`.
//!
//! Decoding is delegated to the `tiff` crate. Geographic bounds are read from
//! the GeoTIFF ModelTiepoint/ModelPixelScale tags when present, otherwise
//! from USGS 3DEP style filenames such as `USGS_13_n48w123_20240327.tif`
//! (covering latitude 47°N to 48°N and longitude 123°W to 122°W).
//!
//! ## Example
//!
//! ```no_run
//! use demtint_dem::DemRaster;
//!
//! let raster = DemRaster::from_file("dem_data/USGS_13_n48w123_20240327.tif")?;
//! let samples = raster.masked_samples(); // sentinel cells are now NaN
//! let (south, west) = raster.bounds().south_west();
//! println!("{}x{} samples from ({}, {})", samples.cols(), samples.rows(), south, west);
//! # Ok::<(), demtint_dem::DemError>(())
//! ```

mod error;
mod raster;

pub use error::DemError;
pub use raster::{mask_sentinel, DemRaster, GeoBounds, DEFAULT_NO_DATA, NO_DATA_TOLERANCE};

/// Result type for DEM operations.
pub type Result<T> = std::result::Result<T, DemError>;
