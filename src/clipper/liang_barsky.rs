//! Liang–Barsky parametric line clipping.

use super::{ClipRect, LineClipper};
use crate::math::Vec3;

/// Parametric interval of a segment `a + t (b - a)` that lies inside a
/// rectangle, with the half-plane index (left, right, bottom, top) that
/// bounded each end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ParametricSpan {
    pub t_enter: f64,
    pub t_leave: f64,
    pub enter_edge: Option<usize>,
    pub leave_edge: Option<usize>,
}

impl ParametricSpan {
    /// Computes the inside interval of `a`-`b`, or `None` when the segment
    /// misses the rectangle. Grazing contacts (`t_enter == t_leave`) are kept.
    pub(crate) fn compute(a: Vec3, b: Vec3, rect: &ClipRect) -> Option<Self> {
        let d = b - a;
        let p = [-d.x, d.x, -d.y, d.y];
        let q = [a.x - rect.x_min, rect.x_max - a.x, a.y - rect.y_min, rect.y_max - a.y];

        let mut span = Self {
            t_enter: 0.0,
            t_leave: 1.0,
            enter_edge: None,
            leave_edge: None,
        };

        for edge in 0..4 {
            if p[edge] == 0.0 {
                // Parallel to this boundary.
                if q[edge] < 0.0 {
                    return None;
                }
                continue;
            }

            let r = q[edge] / p[edge];
            if p[edge] < 0.0 {
                if r > span.t_leave {
                    return None;
                }
                if r > span.t_enter {
                    span.t_enter = r;
                    span.enter_edge = Some(edge);
                }
            } else {
                if r < span.t_enter {
                    return None;
                }
                if r < span.t_leave {
                    span.t_leave = r;
                    span.leave_edge = Some(edge);
                }
            }
        }

        (span.t_enter <= span.t_leave).then_some(span)
    }

    pub(crate) fn enter_point(&self, a: Vec3, b: Vec3, rect: &ClipRect) -> Vec3 {
        point_at(a, b, self.t_enter, self.enter_edge, rect)
    }

    pub(crate) fn leave_point(&self, a: Vec3, b: Vec3, rect: &ClipRect) -> Vec3 {
        point_at(b, a, 1.0 - self.t_leave, self.leave_edge, rect)
    }
}

/// Evaluates the segment at `t` from `from`, snapping the coordinate of the
/// bounding half-plane exactly onto the rectangle.
fn point_at(from: Vec3, to: Vec3, t: f64, edge: Option<usize>, rect: &ClipRect) -> Vec3 {
    let Some(edge) = edge else {
        return from;
    };
    let mut p = from.lerp(to, t);
    match edge {
        0 => p.x = rect.x_min,
        1 => p.x = rect.x_max,
        2 => p.y = rect.y_min,
        _ => p.y = rect.y_max,
    }
    p
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LiangBarsky;

impl LineClipper for LiangBarsky {
    fn clip_line(&self, a: Vec3, b: Vec3, rect: &ClipRect) -> Option<(Vec3, Vec3)> {
        let span = ParametricSpan::compute(a, b, rect)?;
        Some((span.enter_point(a, b, rect), span.leave_point(a, b, rect)))
    }
}
