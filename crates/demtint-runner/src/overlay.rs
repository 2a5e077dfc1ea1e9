//! Image overlay export.
//!
//! An overlay is the color grid plus everything a web map needs to place it:
//! the south-west and north-east corners and the opacity baked into the
//! image alpha. The map renderer itself is external; we hand it a PNG and a
//! JSON descriptor, and it should draw the layer at full opacity.

use crate::{Result, RunnerError};
use demtint_color::{Grid, Rgba, ValueRange};
use demtint_dem::GeoBounds;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A rendered color grid positioned on the map.
#[derive(Debug, Clone)]
pub struct ImageOverlay {
    pub colors: Grid<Rgba>,
    pub bounds: GeoBounds,
    /// Alpha already applied to every valid pixel.
    pub opacity: f32,
    pub gradient: String,
    /// Elevation range mapped to the gradient ends.
    pub range: ValueRange,
}

/// JSON sidecar describing where and how to draw the overlay image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayDescriptor {
    /// Image file name, relative to the descriptor.
    pub image: String,
    /// `[[south, west], [north, east]]`.
    pub bounds: [[f64; 2]; 2],
    /// Alpha already present in every valid pixel. Not a layer opacity to
    /// apply on top.
    pub baked_opacity: f32,
    pub gradient: String,
    pub value_min: f32,
    pub value_max: f32,
    pub width: usize,
    pub height: usize,
}

impl ImageOverlay {
    /// Convert the color grid to an 8-bit RGBA image.
    pub fn to_image(&self) -> Result<RgbaImage> {
        let (rows, cols) = self.colors.shape();
        let (width, height) = pixel_dimensions(rows, cols)?;

        let mut buf = Vec::with_capacity(self.colors.len() * 4);
        for color in self.colors.iter() {
            buf.extend_from_slice(&color.to_rgba8());
        }

        RgbaImage::from_raw(width, height, buf).ok_or(RunnerError::ImageTooLarge {
            width: cols,
            height: rows,
        })
    }

    /// Write the overlay as a PNG.
    pub fn write_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_image()?
            .save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    pub fn descriptor(&self, image_name: &str) -> OverlayDescriptor {
        let (south, west) = self.bounds.south_west();
        let (north, east) = self.bounds.north_east();
        OverlayDescriptor {
            image: image_name.to_string(),
            bounds: [[south, west], [north, east]],
            baked_opacity: self.opacity,
            gradient: self.gradient.clone(),
            value_min: self.range.min(),
            value_max: self.range.max(),
            width: self.colors.cols(),
            height: self.colors.rows(),
        }
    }

    /// Write the descriptor as pretty-printed JSON.
    pub fn write_descriptor<P: AsRef<Path>>(&self, path: P, image_name: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.descriptor(image_name))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Image width and height for a `rows` x `cols` grid.
fn pixel_dimensions(rows: usize, cols: usize) -> Result<(u32, u32)> {
    let too_large = || RunnerError::ImageTooLarge {
        width: cols,
        height: rows,
    };
    let width = u32::try_from(cols).map_err(|_| too_large())?;
    let height = u32::try_from(rows).map_err(|_| too_large())?;
    Ok((width, height))
}
