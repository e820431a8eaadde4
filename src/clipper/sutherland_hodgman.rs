//! Sutherland–Hodgman clipping against single half-planes.
//!
//! Used as the reference result for convex polygons and to cut geometry
//! against the near plane before the perspective divide.

use super::ClipRect;
use crate::math::Vec3;

/// A clipping half-plane. The signed distance is positive inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClipEdge {
    /// x >= value
    Left(f64),
    /// x <= value
    Right(f64),
    /// y >= value
    Bottom(f64),
    /// y <= value
    Top(f64),
    /// z >= value
    Near(f64),
}

impl ClipEdge {
    pub fn signed_distance(&self, p: Vec3) -> f64 {
        match *self {
            Self::Left(x) => p.x - x,
            Self::Right(x) => x - p.x,
            Self::Bottom(y) => p.y - y,
            Self::Top(y) => y - p.y,
            Self::Near(z) => p.z - z,
        }
    }

    /// Point where segment `a`-`b` crosses the edge, with the clipped
    /// coordinate set exactly.
    fn intersection(&self, a: Vec3, b: Vec3) -> Vec3 {
        let d1 = self.signed_distance(a);
        let d2 = self.signed_distance(b);
        let mut p = a.lerp(b, d1 / (d1 - d2));
        match *self {
            Self::Left(x) | Self::Right(x) => p.x = x,
            Self::Bottom(y) | Self::Top(y) => p.y = y,
            Self::Near(z) => p.z = z,
        }
        p
    }

    /// The four rectangle edges in left, right, bottom, top order.
    pub fn rect_edges(rect: &ClipRect) -> [ClipEdge; 4] {
        [
            Self::Left(rect.x_min),
            Self::Right(rect.x_max),
            Self::Bottom(rect.y_min),
            Self::Top(rect.y_max),
        ]
    }
}

/// Clips a closed polygon against one half-plane.
pub fn clip_against_edge(polygon: &[Vec3], edge: ClipEdge) -> Vec<Vec3> {
    let mut output = Vec::with_capacity(polygon.len() + 1);

    for (i, &current) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        let current_inside = edge.signed_distance(current) >= 0.0;
        let next_inside = edge.signed_distance(next) >= 0.0;

        if current_inside {
            output.push(current);
            if !next_inside {
                output.push(edge.intersection(current, next));
            }
        } else if next_inside {
            output.push(edge.intersection(current, next));
        }
    }

    output
}

/// Clips a closed polygon against every edge of `rect`. Exact for convex
/// input; concave input comes back as a single ring that may run along
/// the border.
pub fn clip_polygon(polygon: &[Vec3], rect: &ClipRect) -> Vec<Vec3> {
    let mut result = polygon.to_vec();
    for edge in ClipEdge::rect_edges(rect) {
        if result.len() < 3 {
            return Vec::new();
        }
        result = clip_against_edge(&result, edge);
    }
    if result.len() < 3 {
        return Vec::new();
    }
    result
}

/// Clips an open segment against one half-plane.
pub fn clip_segment(a: Vec3, b: Vec3, edge: ClipEdge) -> Option<(Vec3, Vec3)> {
    let a_inside = edge.signed_distance(a) >= 0.0;
    let b_inside = edge.signed_distance(b) >= 0.0;
    match (a_inside, b_inside) {
        (true, true) => Some((a, b)),
        (false, false) => None,
        (true, false) => Some((a, edge.intersection(a, b))),
        (false, true) => Some((edge.intersection(a, b), b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn signed_distance_is_positive_inside() {
        let p = Vec3::new(5.0, 5.0, 5.0);
        assert!(ClipEdge::Left(0.0).signed_distance(p) > 0.0);
        assert!(ClipEdge::Right(4.0).signed_distance(p) < 0.0);
        assert!(ClipEdge::Near(1.0).signed_distance(p) > 0.0);
    }

    #[test]
    fn triangle_against_right_edge() {
        let triangle = [Vec3::xy(0.0, 0.0), Vec3::xy(20.0, 0.0), Vec3::xy(0.0, 20.0)];
        let clipped = clip_against_edge(&triangle, ClipEdge::Right(10.0));
        assert_eq!(clipped.len(), 4);
        assert_eq!(clipped[1], Vec3::xy(10.0, 0.0));
        assert_relative_eq!(clipped[2].y, 10.0);
        assert_eq!(clipped[2].x, 10.0);
    }

    #[test]
    fn polygon_outside_rect_vanishes() {
        let rect = ClipRect::new(0.0, 10.0, 0.0, 10.0);
        let square = [
            Vec3::xy(20.0, 20.0),
            Vec3::xy(30.0, 20.0),
            Vec3::xy(30.0, 30.0),
            Vec3::xy(20.0, 30.0),
        ];
        assert!(clip_polygon(&square, &rect).is_empty());
    }

    #[test]
    fn segment_crossing_near_plane() {
        let (a, b) = clip_segment(Vec3::new(0.0, 0.0, -10.0), Vec3::new(10.0, 0.0, 10.0), ClipEdge::Near(0.0)).unwrap();
        assert_relative_eq!(a.x, 5.0);
        assert_eq!(a.z, 0.0);
        assert_eq!(b, Vec3::new(10.0, 0.0, 10.0));
        assert!(clip_segment(Vec3::new(0.0, 0.0, -1.0), Vec3::new(1.0, 0.0, -2.0), ClipEdge::Near(0.0)).is_none());
    }
}
