//! Color gradients: continuous maps from `[0, 1]` to RGB.
//!
//! The mapper never depends on a concrete gradient. It takes an
//! `Arc<dyn Gradient>`, either resolved by name from a [`GradientRegistry`]
//! or injected directly (for example via [`FnGradient`] wrapping another
//! colormap library).

use crate::{ColorError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name of the built-in black-to-white gradient.
pub const LINEAR_GRAY: &str = "linear-gray";

/// A continuous color gradient.
pub trait Gradient: Send + Sync {
    /// Registry name of this gradient.
    fn name(&self) -> &str;

    /// Sample the gradient at `t`. Implementations clamp `t` to `[0, 1]` and
    /// return components in `[0, 1]`.
    fn sample(&self, t: f32) -> [f32; 3];
}

impl fmt::Debug for dyn Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gradient({})", self.name())
    }
}

/// Black at `t = 0`, white at `t = 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearGray;

impl Gradient for LinearGray {
    fn name(&self) -> &str {
        LINEAR_GRAY
    }

    fn sample(&self, t: f32) -> [f32; 3] {
        let t = clamp_unit(t);
        [t, t, t]
    }
}

/// Evenly spaced control points, interpolated linearly in sRGB.
#[derive(Debug, Clone)]
pub struct Ramp {
    name: String,
    points: Vec<[f32; 3]>,
}

impl Ramp {
    /// Create a ramp. An empty ramp samples as black.
    pub fn new(name: impl Into<String>, points: Vec<[f32; 3]>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// 16-point approximation of matplotlib's viridis.
    pub fn viridis() -> Self {
        Self::new(
            "viridis",
            vec![
                [0.267, 0.005, 0.329],
                [0.283, 0.081, 0.400],
                [0.278, 0.155, 0.470],
                [0.259, 0.231, 0.513],
                [0.230, 0.301, 0.538],
                [0.201, 0.366, 0.552],
                [0.176, 0.428, 0.557],
                [0.153, 0.487, 0.558],
                [0.131, 0.545, 0.553],
                [0.120, 0.603, 0.541],
                [0.140, 0.659, 0.518],
                [0.226, 0.712, 0.474],
                [0.346, 0.761, 0.412],
                [0.496, 0.804, 0.316],
                [0.665, 0.838, 0.195],
                [0.993, 0.906, 0.144],
            ],
        )
    }

    /// 16-point approximation of matplotlib's inferno.
    pub fn inferno() -> Self {
        Self::new(
            "inferno",
            vec![
                [0.001, 0.000, 0.014],
                [0.042, 0.028, 0.141],
                [0.122, 0.047, 0.283],
                [0.217, 0.036, 0.383],
                [0.310, 0.071, 0.421],
                [0.400, 0.107, 0.432],
                [0.490, 0.140, 0.424],
                [0.580, 0.171, 0.402],
                [0.669, 0.205, 0.367],
                [0.752, 0.248, 0.322],
                [0.828, 0.302, 0.266],
                [0.893, 0.369, 0.204],
                [0.944, 0.451, 0.135],
                [0.975, 0.552, 0.065],
                [0.978, 0.672, 0.098],
                [0.988, 0.998, 0.645],
            ],
        )
    }
}

impl Gradient for Ramp {
    fn name(&self) -> &str {
        &self.name
    }

    fn sample(&self, t: f32) -> [f32; 3] {
        let t = clamp_unit(t);
        let n = self.points.len();
        match n {
            0 => return [0.0; 3],
            1 => return self.points[0],
            _ => {}
        }

        let scaled = t * (n - 1) as f32;
        let lo = (scaled as usize).min(n - 2);
        let frac = scaled - lo as f32;
        lerp(self.points[lo], self.points[lo + 1], frac)
    }
}

/// Color stops at explicit positions in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct StopRamp {
    name: String,
    /// `(position, rgb)`, sorted by position.
    stops: Vec<(f32, [f32; 3])>,
}

impl StopRamp {
    /// Create a stop ramp. Stops are sorted by position; NaN positions are
    /// dropped. An empty ramp samples as black.
    pub fn new(name: impl Into<String>, mut stops: Vec<(f32, [f32; 3])>) -> Self {
        stops.retain(|(pos, _)| !pos.is_nan());
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self {
            name: name.into(),
            stops,
        }
    }

    /// Hypsometric tint similar to matplotlib's `terrain`:
    /// deep blue through green and brown up to white.
    pub fn terrain() -> Self {
        Self::new(
            "terrain",
            vec![
                (0.00, [0.20, 0.20, 0.60]),
                (0.15, [0.00, 0.60, 1.00]),
                (0.25, [0.00, 0.80, 0.40]),
                (0.50, [1.00, 1.00, 0.60]),
                (0.75, [0.50, 0.36, 0.33]),
                (1.00, [1.00, 1.00, 1.00]),
            ],
        )
    }
}

impl Gradient for StopRamp {
    fn name(&self) -> &str {
        &self.name
    }

    fn sample(&self, t: f32) -> [f32; 3] {
        let t = clamp_unit(t);
        let Some(&(first_pos, first_rgb)) = self.stops.first() else {
            return [0.0; 3];
        };
        if t <= first_pos {
            return first_rgb;
        }

        for pair in self.stops.windows(2) {
            let (p0, c0) = pair[0];
            let (p1, c1) = pair[1];
            if t <= p1 {
                let frac = if p1 > p0 { (t - p0) / (p1 - p0) } else { 1.0 };
                return lerp(c0, c1, frac);
            }
        }

        self.stops.last().map_or(first_rgb, |&(_, rgb)| rgb)
    }
}

/// Adapter turning any `Fn(f32) -> [f32; 3]` into a [`Gradient`].
///
/// The output of the wrapped function is clamped to `[0, 1]` per component.
pub struct FnGradient<F> {
    name: String,
    f: F,
}

impl<F> FnGradient<F>
where
    F: Fn(f32) -> [f32; 3] + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Gradient for FnGradient<F>
where
    F: Fn(f32) -> [f32; 3] + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn sample(&self, t: f32) -> [f32; 3] {
        let [r, g, b] = (self.f)(clamp_unit(t));
        [clamp_unit(r), clamp_unit(g), clamp_unit(b)]
    }
}

/// Gradients looked up by case-insensitive name.
#[derive(Clone, Default)]
pub struct GradientRegistry {
    gradients: HashMap<String, Arc<dyn Gradient>>,
}

impl GradientRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding `linear-gray`, `viridis`, `inferno` and `terrain`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(LinearGray);
        registry.register(Ramp::viridis());
        registry.register(Ramp::inferno());
        registry.register(StopRamp::terrain());
        registry
    }

    /// Register a gradient, replacing any existing one with the same name.
    pub fn register<G: Gradient + 'static>(&mut self, gradient: G) {
        self.register_arc(Arc::new(gradient));
    }

    /// Register an already shared gradient.
    pub fn register_arc(&mut self, gradient: Arc<dyn Gradient>) {
        self.gradients
            .insert(gradient.name().to_ascii_lowercase(), gradient);
    }

    /// Look up a gradient by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Gradient>> {
        self.gradients
            .get(&name.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| ColorError::UnknownGradient {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.gradients.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for GradientRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Clamp to `[0, 1]`, sending NaN to 0.
#[inline]
fn clamp_unit(x: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

#[inline]
fn lerp(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    // Weighted form so t = 0 and t = 1 return the endpoints exactly.
    let s = 1.0 - t;
    [
        a[0] * s + b[0] * t,
        a[1] * s + b[1] * t,
        a[2] * s + b[2] * t,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_linear_gray() {
        assert_eq!(LinearGray.sample(0.0), [0.0, 0.0, 0.0]);
        assert_eq!(LinearGray.sample(0.5), [0.5, 0.5, 0.5]);
        assert_eq!(LinearGray.sample(1.0), [1.0, 1.0, 1.0]);
        // Clamped
        assert_eq!(LinearGray.sample(-2.0), [0.0, 0.0, 0.0]);
        assert_eq!(LinearGray.sample(7.0), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_ramp_endpoints_and_midpoint() {
        let ramp = Ramp::new("bw", vec![[0.0, 0.0, 0.0], [1.0, 0.5, 0.0]]);
        assert_eq!(ramp.sample(0.0), [0.0, 0.0, 0.0]);
        assert_eq!(ramp.sample(1.0), [1.0, 0.5, 0.0]);
        let mid = ramp.sample(0.5);
        assert_abs_diff_eq!(mid[0], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(mid[1], 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_single_point_ramp() {
        let ramp = Ramp::new("flat", vec![[0.3, 0.3, 0.3]]);
        assert_eq!(ramp.sample(0.9), [0.3, 0.3, 0.3]);
    }

    #[test]
    fn test_viridis_endpoints() {
        let viridis = Ramp::viridis();
        assert_eq!(viridis.sample(0.0), [0.267, 0.005, 0.329]);
        assert_eq!(viridis.sample(1.0), [0.993, 0.906, 0.144]);
    }

    #[test]
    fn test_stop_ramp_interpolates_between_stops() {
        let ramp = StopRamp::new(
            "two",
            vec![(1.0, [1.0, 1.0, 1.0]), (0.0, [0.0, 0.0, 0.0])],
        );
        let c = ramp.sample(0.25);
        assert_abs_diff_eq!(c[0], 0.25, epsilon = 1e-6);

        let terrain = StopRamp::terrain();
        assert_eq!(terrain.sample(0.0), [0.20, 0.20, 0.60]);
        assert_eq!(terrain.sample(1.0), [1.0, 1.0, 1.0]);
        assert_eq!(terrain.sample(0.5), [1.00, 1.00, 0.60]);
    }

    #[test]
    fn test_fn_gradient_clamps_output() {
        let g = FnGradient::new("hot", |t| [t * 3.0, t - 1.0, t]);
        assert_eq!(g.sample(0.5), [1.0, 0.0, 0.5]);
        assert_eq!(g.name(), "hot");
    }

    #[test]
    fn test_builtin_samples_in_unit_range() {
        let registry = GradientRegistry::with_builtins();
        for name in registry.names() {
            let g = registry.get(&name).unwrap();
            for i in 0..=100 {
                let rgb = g.sample(i as f32 / 100.0);
                for c in rgb {
                    assert!((0.0..=1.0).contains(&c), "{} out of range at {}", name, i);
                }
            }
        }
    }

    #[test]
    fn test_registry_lookup() {
        let registry = GradientRegistry::with_builtins();
        assert_eq!(
            registry.names(),
            vec!["inferno", "linear-gray", "terrain", "viridis"]
        );
        assert_eq!(registry.get("Viridis").unwrap().name(), "viridis");

        let err = registry.get("jet").unwrap_err();
        match err {
            ColorError::UnknownGradient { name, available } => {
                assert_eq!(name, "jet");
                assert!(available.contains("linear-gray"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = GradientRegistry::new();
        registry.register(FnGradient::new("custom", |_| [1.0, 0.0, 0.0]));
        registry.register(FnGradient::new("CUSTOM", |_| [0.0, 1.0, 0.0]));
        assert_eq!(registry.names(), vec!["custom"]);
        assert_eq!(registry.get("custom").unwrap().sample(0.3), [0.0, 1.0, 0.0]);
    }
}
