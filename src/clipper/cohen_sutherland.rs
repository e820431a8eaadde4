//! Cohen–Sutherland line clipping.

use super::{ClipRect, LineClipper};
use crate::math::Vec3;

pub const INSIDE: u8 = 0b0000;
pub const LEFT: u8 = 0b0001;
pub const RIGHT: u8 = 0b0010;
pub const BOTTOM: u8 = 0b0100;
pub const TOP: u8 = 0b1000;

/// Each endpoint crosses at most one horizontal and one vertical boundary.
const MAX_ITERATIONS: usize = 8;

/// 4-bit region code of `p`: a bit is set for each boundary `p` lies strictly beyond.
pub fn outcode(p: Vec3, rect: &ClipRect) -> u8 {
    let mut code = INSIDE;
    if p.y > rect.y_max {
        code |= TOP;
    } else if p.y < rect.y_min {
        code |= BOTTOM;
    }
    if p.x > rect.x_max {
        code |= RIGHT;
    } else if p.x < rect.x_min {
        code |= LEFT;
    }
    code
}

/// Outcode-based clipper. Moves one outside endpoint per iteration onto the
/// first boundary it violates, in top, bottom, right, left priority.
#[derive(Debug, Default, Clone, Copy)]
pub struct CohenSutherland;

impl LineClipper for CohenSutherland {
    fn clip_line(&self, a: Vec3, b: Vec3, rect: &ClipRect) -> Option<(Vec3, Vec3)> {
        let (mut p0, mut p1) = (a, b);
        let mut c0 = outcode(p0, rect);
        let mut c1 = outcode(p1, rect);

        for _ in 0..=MAX_ITERATIONS {
            if c0 | c1 == INSIDE {
                return Some((p0, p1));
            }
            if c0 & c1 != INSIDE {
                return None;
            }

            // The AND test above guarantees the other endpoint is on the far
            // side of the chosen boundary, so the divisor is never zero.
            if c0 != INSIDE {
                p0 = boundary_intersection(a, b, c0, rect);
                c0 = outcode(p0, rect);
            } else {
                p1 = boundary_intersection(a, b, c1, rect);
                c1 = outcode(p1, rect);
            }
        }

        None
    }
}

/// Point where the line through `a` and `b` meets the first boundary named
/// in `code`.
///
/// Always measured from the original endpoints, multiplying before dividing,
/// so a segment through a window corner lands exactly on it instead of
/// drifting off by the error of an earlier step.
fn boundary_intersection(a: Vec3, b: Vec3, code: u8, rect: &ClipRect) -> Vec3 {
    let d = b - a;
    if code & (TOP | BOTTOM) != 0 {
        let y = if code & TOP != 0 { rect.y_max } else { rect.y_min };
        let dy = y - a.y;
        Vec3::new(a.x + d.x * dy / d.y, y, a.z + d.z * dy / d.y)
    } else {
        let x = if code & RIGHT != 0 { rect.x_max } else { rect.x_min };
        let dx = x - a.x;
        Vec3::new(x, a.y + d.y * dx / d.x, a.z + d.z * dx / d.x)
    }
}
