//! Loader tests against GeoTIFF files written to a scratch directory.

use approx::assert_abs_diff_eq;
use demtint_dem::{DemError, DemRaster, GeoBounds, DEFAULT_NO_DATA};
use std::fs::File;
use std::path::Path;
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

/// Write a single-band f32 GeoTIFF, optionally georeferenced and with a
/// GDAL_NODATA tag.
fn write_dem(
    path: &Path,
    width: u32,
    height: u32,
    data: &[f32],
    origin: Option<(f64, f64, f64)>,
    nodata: Option<&str>,
) {
    let file = File::create(path).unwrap();
    let mut tiff = TiffEncoder::new(file).unwrap();
    let mut image = tiff
        .new_image::<colortype::Gray32Float>(width, height)
        .unwrap();

    if let Some((lon, lat, scale)) = origin {
        let tiepoint = [0.0, 0.0, 0.0, lon, lat, 0.0];
        let pixel_scale = [scale, scale, 0.0];
        image
            .encoder()
            .write_tag(Tag::ModelTiepointTag, &tiepoint[..])
            .unwrap();
        image
            .encoder()
            .write_tag(Tag::ModelPixelScaleTag, &pixel_scale[..])
            .unwrap();
    }
    if let Some(nodata) = nodata {
        image
            .encoder()
            .write_tag(Tag::GdalNodata, nodata)
            .unwrap();
    }

    image.write_data(data).unwrap();
}

#[test]
fn test_load_georeferenced_raster() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patch.tif");
    let data = [10.0, 20.0, -9999.0, 40.0, 50.0, 60.0];
    write_dem(&path, 3, 2, &data, Some((-122.5, 47.75, 0.25)), Some("-9999"));

    let raster = DemRaster::from_file(&path).unwrap();
    assert_eq!(raster.dimensions(), (3, 2));
    assert_eq!(raster.no_data_value(), Some(-9999.0));

    let bounds = raster.bounds();
    assert_abs_diff_eq!(bounds.max_lat, 47.75);
    assert_abs_diff_eq!(bounds.min_lat, 47.25);
    assert_abs_diff_eq!(bounds.min_lon, -122.5);
    assert_abs_diff_eq!(bounds.max_lon, -121.75);

    let masked = raster.masked_samples();
    assert_eq!(masked.get(0, 0), Some(&10.0));
    assert!(masked.get(0, 2).unwrap().is_nan());
    assert_eq!(masked.get(1, 2), Some(&60.0));
    // Raw samples keep the sentinel
    assert_eq!(raster.samples().get(0, 2), Some(&-9999.0));
}

#[test]
fn test_float_min_sentinel_is_read_and_masked() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ridge_float32.tif");
    let data = [f32::MIN, 812.5, 790.0, f32::MIN];
    write_dem(&path, 2, 2, &data, Some((8.0, 46.5, 0.5)), Some("-3.4028235e+38"));

    let raster = DemRaster::from_file(&path).unwrap();
    assert_eq!(raster.no_data_value(), Some(f32::MIN));
    assert_eq!(
        raster.bounds(),
        GeoBounds {
            min_lat: 45.5,
            max_lat: 46.5,
            min_lon: 8.0,
            max_lon: 9.0,
        }
    );

    let masked = raster.masked_samples();
    assert!(masked.get(0, 0).unwrap().is_nan());
    assert!(masked.get(1, 1).unwrap().is_nan());
    assert_eq!(masked.get(0, 1), Some(&812.5));
    assert_eq!(masked.get(1, 0), Some(&790.0));
}

#[test]
fn test_bounds_fall_back_to_usgs_filename() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("USGS_13_n48w123_20240327.tif");
    write_dem(&path, 2, 2, &[1.0, 2.0, 3.0, 4.0], None, None);

    let raster = DemRaster::from_file(&path).unwrap();
    assert_eq!(
        raster.bounds(),
        GeoBounds {
            min_lat: 47.0,
            max_lat: 48.0,
            min_lon: -123.0,
            max_lon: -122.0,
        }
    );
    // No GDAL_NODATA tag: USGS default assumed
    assert_eq!(raster.no_data_value(), Some(DEFAULT_NO_DATA));
}

#[test]
fn test_missing_bounds_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("untagged.tif");
    write_dem(&path, 2, 1, &[1.0, 2.0], None, None);

    assert!(matches!(
        DemRaster::from_file(&path),
        Err(DemError::InvalidFilename(_))
    ));

    let bounds = GeoBounds {
        min_lat: 0.0,
        max_lat: 1.0,
        min_lon: 0.0,
        max_lon: 2.0,
    };
    let raster = DemRaster::from_file_with_bounds(&path, bounds).unwrap();
    assert_eq!(raster.bounds(), bounds);
    assert_eq!(raster.resolution(), (1.0, 1.0));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        DemRaster::from_file(dir.path().join("absent.tif")),
        Err(DemError::Io(_))
    ));
}
