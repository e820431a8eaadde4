//! Cubic curve plotting: Hermite, piecewise Bézier and uniform B-spline.

use super::{axes, coefficients, cubic, parameters, step_count, Basis};
use crate::geometry::PlotMethod;
use crate::math::Vec3;

/// Geometry order `[P1, P4, R1, R4]`.
const HERMITE: Basis = [
    [2.0, -2.0, 1.0, 1.0],
    [-3.0, 3.0, -2.0, -1.0],
    [0.0, 0.0, 1.0, 0.0],
    [1.0, 0.0, 0.0, 0.0],
];

const BEZIER: Basis = [
    [-1.0, 3.0, -3.0, 1.0],
    [3.0, -6.0, 3.0, 0.0],
    [-3.0, 3.0, 0.0, 0.0],
    [1.0, 0.0, 0.0, 0.0],
];

const B_SPLINE: Basis = [
    [-1.0 / 6.0, 3.0 / 6.0, -3.0 / 6.0, 1.0 / 6.0],
    [3.0 / 6.0, -6.0 / 6.0, 3.0 / 6.0, 0.0],
    [-3.0 / 6.0, 0.0, 3.0 / 6.0, 0.0],
    [1.0 / 6.0, 4.0 / 6.0, 1.0 / 6.0, 0.0],
];

/// Tessellates a curve into one polyline.
pub fn tessellate_curve(control: &[Vec3], method: PlotMethod, precision: f64) -> Vec<Vec3> {
    match method {
        PlotMethod::Hermite => hermite(control, precision),
        PlotMethod::Bezier => bezier(control, precision),
        PlotMethod::BSpline => b_spline(control, precision),
    }
}

/// Hermite segments from consecutive `(P1, P4, R1, R4)` groups, where `R1`
/// and `R4` are the tangent vectors at `P1` and `P4`. A trailing partial
/// group is ignored.
pub fn hermite(control: &[Vec3], precision: f64) -> Vec<Vec3> {
    let steps = step_count(precision);
    control
        .chunks_exact(4)
        .flat_map(|group| evaluate_segment(&HERMITE, group, steps, false))
        .collect()
}

/// Piecewise cubic Bézier over 4-point groups with stride 3. Segments share
/// their joining control point, which is emitted once.
pub fn bezier(control: &[Vec3], precision: f64) -> Vec<Vec3> {
    let steps = step_count(precision);
    let mut points = Vec::new();
    let mut start = 0;
    while start + 3 < control.len() {
        let group = &control[start..start + 4];
        points.extend(evaluate_segment(&BEZIER, group, steps, start > 0));
        start += 3;
    }
    points
}

/// Uniform cubic B-spline over a sliding 4-point window, evaluated with
/// forward differences.
pub fn b_spline(control: &[Vec3], precision: f64) -> Vec<Vec3> {
    let steps = step_count(precision);
    let delta = 1.0 / steps as f64;
    let mut points = Vec::with_capacity(control.len().saturating_sub(3) * steps + 1);

    for (index, window) in control.windows(4).enumerate() {
        let mut diffs = axes(window).map(|g| forward_differences(coefficients(&B_SPLINE, g), delta));

        // Consecutive windows meet at the same point.
        if index == 0 {
            points.push(Vec3::new(diffs[0][0], diffs[1][0], diffs[2][0]));
        }
        for _ in 0..steps {
            for d in diffs.iter_mut() {
                d[0] += d[1];
                d[1] += d[2];
                d[2] += d[3];
            }
            points.push(Vec3::new(diffs[0][0], diffs[1][0], diffs[2][0]));
        }
    }
    points
}

/// Initial forward differences `[f(0), Δf, Δ²f, Δ³f]` of a cubic with
/// coefficients `[a, b, c, d]` at step `delta`.
fn forward_differences(coeffs: [f64; 4], delta: f64) -> [f64; 4] {
    let [a, b, c, d] = coeffs;
    let (d2, d3) = (delta * delta, delta * delta * delta);
    [
        d,
        a * d3 + b * d2 + c * delta,
        6.0 * a * d3 + 2.0 * b * d2,
        6.0 * a * d3,
    ]
}

fn evaluate_segment(basis: &Basis, group: &[Vec3], steps: usize, skip_first: bool) -> Vec<Vec3> {
    let [gx, gy, gz] = axes(group);
    let (cx, cy, cz) = (
        coefficients(basis, gx),
        coefficients(basis, gy),
        coefficients(basis, gz),
    );
    parameters(steps)
        .skip(usize::from(skip_first))
        .map(|t| Vec3::new(cubic(cx, t), cubic(cy, t), cubic(cz, t)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_point_eq(a: Vec3, b: Vec3) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-9);
    }

    #[test]
    fn bezier_segments_start_and_end_on_control_points() {
        let control = vec![
            Vec3::xy(0.0, 0.0),
            Vec3::xy(10.0, 40.0),
            Vec3::xy(30.0, 40.0),
            Vec3::xy(40.0, 0.0),
            Vec3::xy(50.0, -40.0),
            Vec3::xy(70.0, -40.0),
            Vec3::xy(80.0, 0.0),
        ];
        let steps = step_count(0.1);
        let points = bezier(&control, 0.1);
        assert_eq!(points.len(), 2 * steps + 1);

        assert_point_eq(points[0], control[0]);
        assert_point_eq(points[steps], control[3]);
        assert_point_eq(points[2 * steps], control[6]);
    }

    #[test]
    fn bezier_ignores_incomplete_tail() {
        let control = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE, Vec3::X];
        assert_eq!(bezier(&control, 0.25).len(), 5);
    }

    #[test]
    fn hermite_interpolates_endpoints_and_depth() {
        let control = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(100.0, 50.0, 20.0),
            Vec3::new(50.0, 100.0, 0.0),
            Vec3::new(50.0, 0.0, 0.0),
        ];
        let points = hermite(&control, 0.05);
        assert_eq!(points.len(), 21);
        assert_point_eq(points[0], control[0]);
        assert_point_eq(points[20], control[1]);
        // y is evaluated from y, not x.
        assert!(points[10].y != points[10].x);
    }

    #[test]
    fn hermite_with_zero_tangents_is_smoothstep() {
        let control = vec![Vec3::ZERO, Vec3::xy(10.0, 0.0), Vec3::ZERO, Vec3::ZERO];
        let points = hermite(&control, 0.5);
        assert_point_eq(points[1], Vec3::xy(5.0, 0.0));
    }

    #[test]
    fn b_spline_matches_direct_evaluation() {
        let control = vec![
            Vec3::xy(0.0, 0.0),
            Vec3::xy(20.0, 60.0),
            Vec3::xy(60.0, 60.0),
            Vec3::xy(80.0, 0.0),
            Vec3::xy(120.0, 30.0),
        ];
        let steps = step_count(0.1);
        let points = b_spline(&control, 0.1);
        assert_eq!(points.len(), 2 * steps + 1);

        for (window, chunk) in control.windows(4).enumerate() {
            let direct = evaluate_segment(&B_SPLINE, chunk, steps, false);
            for (i, expected) in direct.into_iter().enumerate() {
                assert_point_eq(points[window * steps + i], expected);
            }
        }
    }

    #[test]
    fn b_spline_of_collinear_points_stays_on_line() {
        let control: Vec<Vec3> = (0..4).map(|i| Vec3::xy(i as f64, 0.0)).collect();
        let points = b_spline(&control, 0.25);
        assert_point_eq(points[0], Vec3::xy(1.0, 0.0));
        assert_point_eq(points[4], Vec3::xy(2.0, 0.0));
        assert!(points.iter().all(|p| p.y.abs() < 1e-12));
    }

    #[test]
    fn dispatch_by_method() {
        let control = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE];
        assert_eq!(tessellate_curve(&control, PlotMethod::Bezier, 0.5), bezier(&control, 0.5));
        assert_eq!(
            tessellate_curve(&control, PlotMethod::BSpline, 0.5),
            b_spline(&control, 0.5)
        );
    }
}
