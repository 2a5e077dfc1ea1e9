//! Single DEM raster loaded from a GeoTIFF file.

use crate::{DemError, Result};
use demtint_color::Grid;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tracing::{debug, warn};

/// No-data value assumed when the file does not declare one (USGS default).
pub const DEFAULT_NO_DATA: f32 = -999999.0;

/// Samples within this distance of the sentinel are treated as no-data.
pub const NO_DATA_TOLERANCE: f32 = 0.001;

/// Geographic bounds of a raster, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    /// Minimum latitude (south edge).
    pub min_lat: f64,
    /// Maximum latitude (north edge).
    pub max_lat: f64,
    /// Minimum longitude (west edge).
    pub min_lon: f64,
    /// Maximum longitude (east edge).
    pub max_lon: f64,
}

impl GeoBounds {
    /// Check if a coordinate is within the bounds.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// South-west corner as `(lat, lon)`.
    pub fn south_west(&self) -> (f64, f64) {
        (self.min_lat, self.min_lon)
    }

    /// North-east corner as `(lat, lon)`.
    pub fn north_east(&self) -> (f64, f64) {
        (self.max_lat, self.max_lon)
    }
}

/// Replace every sample within [`NO_DATA_TOLERANCE`] of `sentinel` with NaN.
///
/// NaN samples stay NaN, so a grid that already uses NaN for missing data
/// passes through unchanged apart from the sentinel cells.
pub fn mask_sentinel(samples: &Grid<f32>, sentinel: f32) -> Grid<f32> {
    samples.map(|&v| {
        if (v - sentinel).abs() < NO_DATA_TOLERANCE {
            f32::NAN
        } else {
            v
        }
    })
}

/// An elevation raster with its bounds and declared no-data sentinel.
///
/// Samples are stored north to south, west to east.
#[derive(Debug, Clone)]
pub struct DemRaster {
    samples: Grid<f32>,
    bounds: GeoBounds,
    /// Elevations equal to this are treated as missing.
    no_data_value: Option<f32>,
}

impl DemRaster {
    /// Wrap an in-memory grid.
    pub fn from_grid(samples: Grid<f32>, bounds: GeoBounds, no_data_value: Option<f32>) -> Self {
        Self {
            samples,
            bounds,
            no_data_value,
        }
    }

    /// Load a DEM raster from a GeoTIFF file.
    ///
    /// Bounds come from the ModelTiepoint/ModelPixelScale tags, falling back
    /// to a USGS style filename (`USGS_13_n48w123_*.tif`).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut decoder = Self::open_decoder(path)?;
        let bounds = Self::read_geotransform(&mut decoder, path)?;
        Self::finish_load(decoder, path, bounds)
    }

    /// Load a DEM raster from a GeoTIFF file with explicit bounds.
    ///
    /// Use this when the file has no GeoTIFF tags and its name doesn't follow
    /// the USGS naming convention.
    pub fn from_file_with_bounds<P: AsRef<Path>>(path: P, bounds: GeoBounds) -> Result<Self> {
        let path = path.as_ref();
        let decoder = Self::open_decoder(path)?;
        Self::finish_load(decoder, path, bounds)
    }

    fn open_decoder(path: &Path) -> Result<Decoder<std::fs::File>> {
        let file = std::fs::File::open(path)?;
        let decoder = Decoder::new(file)?;

        // 1/3 arc-second tiles are 10812 x 10812 f32 pixels, ~466 MB
        let mut limits = Limits::default();
        limits.decoding_buffer_size = 1024 * 1024 * 1024;
        limits.intermediate_buffer_size = 1024 * 1024 * 1024;
        limits.ifd_value_size = 1024 * 1024 * 1024;
        Ok(decoder.with_limits(limits))
    }

    fn finish_load(
        mut decoder: Decoder<std::fs::File>,
        path: &Path,
        bounds: GeoBounds,
    ) -> Result<Self> {
        let (width, height) = decoder.dimensions()?;
        let data = Self::decode_elevation_data(&mut decoder)?;

        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(DemError::InvalidGeoTiff(format!(
                "{}: expected {} single-band samples for {}x{}, got {}",
                path.display(),
                expected,
                width,
                height,
                data.len()
            )));
        }
        let samples = Grid::from_vec(height as usize, width as usize, data)?;

        let no_data_value = Self::read_nodata_value(&mut decoder, path);

        debug!(
            "Loaded {} ({}x{}), lat {:.4}..{:.4}, lon {:.4}..{:.4}, no-data {:?}",
            path.display(),
            width,
            height,
            bounds.min_lat,
            bounds.max_lat,
            bounds.min_lon,
            bounds.max_lon,
            no_data_value
        );

        Ok(Self {
            samples,
            bounds,
            no_data_value,
        })
    }

    /// Read the geotransform (geographic bounds) from GeoTIFF tags.
    fn read_geotransform<R: std::io::Read + std::io::Seek>(
        decoder: &mut Decoder<R>,
        path: &Path,
    ) -> Result<GeoBounds> {
        let tiepoint = decoder.get_tag_f64_vec(Tag::ModelTiepointTag);
        let pixel_scale = decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag);

        if let (Ok(tiepoint), Ok(scale)) = (tiepoint, pixel_scale) {
            if tiepoint.len() >= 6 && scale.len() >= 2 {
                // Tiepoint is [i, j, k, x, y, z]; (x, y) is the top-left corner
                let tie_lon = tiepoint[3];
                let tie_lat = tiepoint[4];
                let (width, height) = decoder.dimensions()?;

                return Ok(GeoBounds {
                    min_lat: tie_lat - height as f64 * scale[1],
                    max_lat: tie_lat,
                    min_lon: tie_lon,
                    max_lon: tie_lon + width as f64 * scale[0],
                });
            }
        }

        Self::bounds_from_filename(path)
    }

    /// Parse raster bounds from a USGS filename like "USGS_13_n48w123_*.tif".
    ///
    /// The `n48w123` token names the north-west corner of a 1x1 degree cell.
    pub fn bounds_from_filename(path: &Path) -> Result<GeoBounds> {
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| DemError::InvalidFilename(path.display().to_string()))?;
        let invalid = || DemError::InvalidFilename(filename.to_string());

        let mut chars = filename.chars().peekable();
        while let Some(c) = chars.next() {
            if c != 'n' && c != 's' {
                continue;
            }
            let is_north = c == 'n';

            let mut lat_str = String::new();
            while let Some(d) = chars.next_if(char::is_ascii_digit) {
                lat_str.push(d);
            }
            if lat_str.is_empty() {
                continue;
            }

            let is_west = match chars.next() {
                Some('w') => true,
                Some('e') => false,
                _ => continue,
            };

            let mut lon_str = String::new();
            while let Some(d) = chars.next_if(char::is_ascii_digit) {
                lon_str.push(d);
            }
            if lon_str.is_empty() {
                continue;
            }

            let lat: f64 = lat_str.parse().map_err(|_| invalid())?;
            let lon: f64 = lon_str.parse().map_err(|_| invalid())?;

            let max_lat = if is_north { lat } else { -lat };
            let min_lon = if is_west { -lon } else { lon };

            return Ok(GeoBounds {
                min_lat: max_lat - 1.0,
                max_lat,
                min_lon,
                max_lon: min_lon + 1.0,
            });
        }

        Err(invalid())
    }

    /// Decode elevation data from the TIFF decoder.
    fn decode_elevation_data<R: std::io::Read + std::io::Seek>(
        decoder: &mut Decoder<R>,
    ) -> Result<Vec<f32>> {
        let result = decoder.read_image()?;

        match result {
            DecodingResult::F32(data) => Ok(data),
            DecodingResult::F64(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I16(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I32(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U16(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U32(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U8(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I8(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::U64(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
            DecodingResult::I64(data) => Ok(data.into_iter().map(|v| v as f32).collect()),
        }
    }

    /// Read the no-data value from the GDAL_NODATA tag.
    fn read_nodata_value<R: std::io::Read + std::io::Seek>(
        decoder: &mut Decoder<R>,
        path: &Path,
    ) -> Option<f32> {
        match decoder.get_tag_ascii_string(Tag::GdalNodata) {
            Ok(raw) => {
                let text = raw.trim_matches(char::from(0)).trim();
                match text.parse::<f32>() {
                    Ok(v) => Some(v),
                    Err(_) => {
                        warn!("{}: unparseable GDAL_NODATA '{}', ignoring", path.display(), text);
                        None
                    }
                }
            }
            Err(_) => {
                debug!(
                    "{}: no GDAL_NODATA tag, assuming {}",
                    path.display(),
                    DEFAULT_NO_DATA
                );
                Some(DEFAULT_NO_DATA)
            }
        }
    }

    /// Override the declared no-data value.
    pub fn with_no_data(mut self, no_data_value: Option<f32>) -> Self {
        self.no_data_value = no_data_value;
        self
    }

    /// Raw samples, sentinel values included.
    pub fn samples(&self) -> &Grid<f32> {
        &self.samples
    }

    /// Samples with the no-data sentinel replaced by NaN.
    pub fn masked_samples(&self) -> Grid<f32> {
        match self.no_data_value {
            Some(sentinel) if !sentinel.is_nan() => mask_sentinel(&self.samples, sentinel),
            _ => self.samples.clone(),
        }
    }

    /// Keep every `stride`-th row and column. Bounds are unchanged.
    pub fn decimate(&self, stride: usize) -> Result<Self> {
        Ok(Self {
            samples: self.samples.decimate(stride)?,
            bounds: self.bounds,
            no_data_value: self.no_data_value,
        })
    }

    /// Get the geographic bounds of this raster.
    pub fn bounds(&self) -> GeoBounds {
        self.bounds
    }

    /// Get the dimensions of this raster as `(width, height)` in pixels.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.samples.cols(), self.samples.rows())
    }

    pub fn no_data_value(&self) -> Option<f32> {
        self.no_data_value
    }

    /// Get the resolution in degrees per pixel as `(lon, lat)`.
    pub fn resolution(&self) -> (f64, f64) {
        let (width, height) = self.dimensions();
        let lat_range = self.bounds.max_lat - self.bounds.min_lat;
        let lon_range = self.bounds.max_lon - self.bounds.min_lon;
        (lon_range / width as f64, lat_range / height as f64)
    }
}
