//! # demtint-runner
//!
//! Pipeline and CLI that turn a DEM GeoTIFF into a web map overlay:
//!
//! 1. load the raster and its no-data sentinel ([`demtint_dem`]),
//! 2. replace the sentinel with NaN,
//! 3. map elevation to color with transparent no-data cells ([`demtint_color`]),
//! 4. write a PNG plus a JSON descriptor holding the south-west/north-east
//!    corners and opacity for the external map renderer.

pub mod cli;
pub mod config;
mod error;
pub mod overlay;
pub mod pipeline;

pub use config::{BoundsConfig, RenderConfig, DEFAULT_GRADIENT};
pub use error::{Result, RunnerError};
pub use overlay::{ImageOverlay, OverlayDescriptor};
pub use pipeline::{build_overlay, load_raster, render, RenderSummary};
