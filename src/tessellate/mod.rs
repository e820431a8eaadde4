//! Curve and surface tessellation.
//!
//! Turns stored control points into dense point sets once per frame. The
//! output is plain positions; clipping and projection happen later.

pub mod curves;
pub mod surface;

pub use curves::{b_spline, bezier, hermite, tessellate_curve};
pub use surface::{tessellate_surface, PatchGrid};

use crate::math::Vec3;

pub const DEFAULT_CURVE_PRECISION: f64 = 0.01;
pub const DEFAULT_SURFACE_PRECISION: f64 = 0.1;

/// Finest accepted precision; caps a segment at [`MAX_STEPS`] steps.
pub const MIN_PRECISION: f64 = 0.001;
pub const MAX_STEPS: usize = 1000;

/// A 4x4 cubic basis matrix, rows ordered for `[t³, t², t, 1]`.
pub(crate) type Basis = [[f64; 4]; 4];

/// Number of parameter steps across `[0, 1]` for `precision`.
///
/// Non-positive or non-finite precision falls back to the curve default.
/// Otherwise precision is clamped to `[MIN_PRECISION, 1]`, so every segment
/// yields between two and `MAX_STEPS + 1` points.
pub fn step_count(precision: f64) -> usize {
    let precision = if precision.is_finite() && precision > 0.0 {
        precision.clamp(MIN_PRECISION, 1.0)
    } else {
        DEFAULT_CURVE_PRECISION
    };
    ((1.0 / precision).round() as usize).clamp(1, MAX_STEPS)
}

/// `t = i / steps` for `i` in `0..=steps`; both ends are exact.
pub(crate) fn parameters(steps: usize) -> impl Iterator<Item = f64> {
    (0..=steps).map(move |i| i as f64 / steps as f64)
}

/// `basis · geometry`: polynomial coefficients for one axis.
pub(crate) fn coefficients(basis: &Basis, geometry: [f64; 4]) -> [f64; 4] {
    let mut out = [0.0; 4];
    for (row, value) in basis.iter().zip(out.iter_mut()) {
        *value = row.iter().zip(geometry).map(|(m, g)| m * g).sum();
    }
    out
}

/// Evaluates `c0 t³ + c1 t² + c2 t + c3`.
pub(crate) fn cubic(c: [f64; 4], t: f64) -> f64 {
    ((c[0] * t + c[1]) * t + c[2]) * t + c[3]
}

/// Per-axis geometry vectors of four control points.
pub(crate) fn axes(points: &[Vec3]) -> [[f64; 4]; 3] {
    let mut out = [[0.0; 4]; 3];
    for (i, p) in points.iter().take(4).enumerate() {
        out[0][i] = p.x;
        out[1][i] = p.y;
        out[2][i] = p.z;
    }
    out
}
