//! # demtint-color
//!
//! Converts a 2-D grid of elevation samples (possibly containing no-data
//! cells) into a same-shaped grid of RGBA colors for a semi-transparent map
//! overlay.
//!
//! ## Overview
//!
//! - Invalid samples (NaN or infinite) are excluded from the min/max
//!   reduction and rendered fully transparent.
//! - Valid samples are normalized against the valid range, passed through a
//!   [`Gradient`], and given a fixed opacity.
//! - A grid with no valid samples, or only one distinct valid value, is an
//!   error rather than a grid of NaN colors.
//!
//! Sentinel no-data values (such as `-999999.0`) must be converted to NaN by
//! the caller before mapping; see `demtint_dem::mask_sentinel`.
//!
//! ## Example
//!
//! ```
//! use demtint_color::{ColorMapper, GradientRegistry, Grid};
//!
//! let samples = Grid::from_rows(vec![
//!     vec![120.0, f32::NAN],
//!     vec![480.0, 300.0],
//! ])?;
//!
//! let registry = GradientRegistry::with_builtins();
//! let mapper = ColorMapper::from_registry(&registry, "terrain")?.with_opacity(0.6)?;
//! let colors = mapper.map(&samples)?;
//!
//! assert_eq!(colors.shape(), samples.shape());
//! assert_eq!(colors.get(0, 1).unwrap().a, 0.0);
//! assert_eq!(colors.get(1, 0).unwrap().a, 0.6);
//! # Ok::<(), demtint_color::ColorError>(())
//! ```

mod error;
mod gradient;
mod grid;
mod mapper;
mod rgba;

pub use error::ColorError;
pub use gradient::{
    FnGradient, Gradient, GradientRegistry, LinearGray, Ramp, StopRamp, LINEAR_GRAY,
};
pub use grid::Grid;
pub use mapper::{
    is_valid, map_values_to_colors, valid_range, ColorMapper, ValueRange, DEFAULT_OPACITY,
};
pub use rgba::Rgba;

/// Result type for color mapping operations.
pub type Result<T> = std::result::Result<T, ColorError>;
