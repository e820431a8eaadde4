//! Bicubic Bézier surface patches.

use super::{cubic, parameters, step_count, Basis};
use crate::geometry::SURFACE_PATCH_POINTS;
use crate::math::Vec3;

const BEZIER: Basis = [
    [-1.0, 3.0, -3.0, 1.0],
    [3.0, -6.0, 3.0, 0.0],
    [-3.0, 3.0, 0.0, 0.0],
    [1.0, 0.0, 0.0, 0.0],
];

/// Evaluated points of one patch: `points[i][j]` is `position(s_i, t_j)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchGrid {
    points: Vec<Vec<Vec3>>,
}

impl PatchGrid {
    /// Lines of constant `s`.
    pub fn rows(&self) -> &[Vec<Vec3>] {
        &self.points
    }

    /// Lines of constant `t`.
    pub fn columns(&self) -> Vec<Vec<Vec3>> {
        let width = self.points.first().map_or(0, Vec::len);
        (0..width)
            .map(|j| self.points.iter().map(|row| row[j]).collect())
            .collect()
    }

    /// Rows and columns together: the wire mesh of the patch.
    pub fn polylines(&self) -> Vec<Vec<Vec3>> {
        let mut lines = self.points.clone();
        lines.extend(self.columns());
        lines
    }

    pub fn point(&self, s_index: usize, t_index: usize) -> Option<Vec3> {
        self.points.get(s_index)?.get(t_index).copied()
    }

    pub fn size(&self) -> usize {
        self.points.len()
    }
}

/// Tessellates every complete 16-point block of `control` (row-major 4x4
/// grids) into a grid of `(steps + 1)²` points.
pub fn tessellate_surface(control: &[Vec3], precision: f64) -> Vec<PatchGrid> {
    let steps = step_count(precision);
    control
        .chunks_exact(SURFACE_PATCH_POINTS)
        .map(|patch| evaluate_patch(patch, steps))
        .collect()
}

fn evaluate_patch(patch: &[Vec3], steps: usize) -> PatchGrid {
    let cx = patch_coefficients(patch, |p| p.x);
    let cy = patch_coefficients(patch, |p| p.y);
    let cz = patch_coefficients(patch, |p| p.z);

    let points = parameters(steps)
        .map(|s| {
            let sx = row_times(s, &cx);
            let sy = row_times(s, &cy);
            let sz = row_times(s, &cz);
            parameters(steps)
                .map(|t| Vec3::new(cubic(sx, t), cubic(sy, t), cubic(sz, t)))
                .collect()
        })
        .collect();

    PatchGrid { points }
}

/// `M · G · Mᵀ` for one axis of the control grid.
fn patch_coefficients(patch: &[Vec3], axis: impl Fn(&Vec3) -> f64) -> Basis {
    let mut g = [[0.0; 4]; 4];
    for (index, p) in patch.iter().enumerate() {
        g[index / 4][index % 4] = axis(p);
    }

    let mut mg = [[0.0; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            mg[i][j] = (0..4).map(|k| BEZIER[i][k] * g[k][j]).sum();
        }
    }

    let mut out = [[0.0; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            out[i][j] = (0..4).map(|k| mg[i][k] * BEZIER[j][k]).sum();
        }
    }
    out
}

/// `S · C` with `S = [s³, s², s, 1]`.
fn row_times(s: f64, c: &Basis) -> [f64; 4] {
    let column = |j: usize| cubic([c[0][j], c[1][j], c[2][j], c[3][j]], s);
    [column(0), column(1), column(2), column(3)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// A 3x3 span in x/y with a bump in the middle control points.
    fn bumpy_patch() -> Vec<Vec3> {
        let mut control = Vec::with_capacity(16);
        for i in 0..4 {
            for j in 0..4 {
                let inner = (1..3).contains(&i) && (1..3).contains(&j);
                control.push(Vec3::new(j as f64 * 10.0, i as f64 * 10.0, if inner { 30.0 } else { 0.0 }));
            }
        }
        control
    }

    #[test]
    fn grid_has_expected_size() {
        let grids = tessellate_surface(&bumpy_patch(), 0.1);
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].size(), 11);
        assert!(grids[0].rows().iter().all(|row| row.len() == 11));
        assert_eq!(grids[0].columns().len(), 11);
        assert_eq!(grids[0].polylines().len(), 22);
    }

    #[test]
    fn patch_corners_are_control_corners() {
        let control = bumpy_patch();
        let grid = &tessellate_surface(&control, 0.25)[0];
        let last = grid.size() - 1;
        for (s, t, expected) in [
            (0, 0, control[0]),
            (0, last, control[3]),
            (last, 0, control[12]),
            (last, last, control[15]),
        ] {
            let p = grid.point(s, t).unwrap();
            assert_relative_eq!(p.x, expected.x, epsilon = 1e-9);
            assert_relative_eq!(p.y, expected.y, epsilon = 1e-9);
            assert_relative_eq!(p.z, expected.z, epsilon = 1e-9);
        }
    }

    #[test]
    fn center_is_lifted_by_inner_controls() {
        let grid = &tessellate_surface(&bumpy_patch(), 0.5)[0];
        let center = grid.point(1, 1).unwrap();
        assert_relative_eq!(center.x, 15.0, epsilon = 1e-9);
        assert_relative_eq!(center.y, 15.0, epsilon = 1e-9);
        // Bernstein weight of the inner 2x2 block at s = t = 1/2 is (3/4)^2.
        assert_relative_eq!(center.z, 30.0 * 0.5625, epsilon = 1e-9);
    }

    #[test]
    fn each_block_of_sixteen_is_a_patch() {
        let mut control = bumpy_patch();
        control.extend(bumpy_patch().into_iter().map(|p| p + Vec3::xy(100.0, 0.0)));
        let grids = tessellate_surface(&control, 0.5);
        assert_eq!(grids.len(), 2);
        assert_relative_eq!(grids[1].point(0, 0).unwrap().x, 100.0, epsilon = 1e-9);
    }
}
