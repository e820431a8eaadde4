//! Weiler–Atherton polygon clipping against a rectangle.
//!
//! The subject polygon is normalized to counter-clockwise order and walked
//! edge by edge to find where it enters and leaves the rectangle. Every
//! crossing is threaded into two circular lists:
//!
//! - the subject list: polygon vertices with crossings in traversal order;
//! - the boundary list: rectangle corners with crossings in counter-clockwise
//!   perimeter order (bottom left to right, right bottom to top, top right
//!   to left, left top to bottom).
//!
//! Output rings start at an entering crossing, follow the subject list to
//! the next (leaving) crossing, then the boundary list to the next entering
//! crossing, and so on until they close. Concave input can yield several
//! rings.

use tracing::{trace, warn};

use super::liang_barsky::ParametricSpan;
use super::{round_to, same_point, sutherland_hodgman, ClipRect};
use crate::math::Vec3;

#[derive(Debug, Clone, Copy)]
struct Crossing {
    point: Vec3,
    entering: bool,
    edge: usize,
    subject_index: usize,
    boundary_index: usize,
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Vertex(Vec3),
    Crossing(usize),
}

/// Clips a closed polygon against `rect`.
///
/// Returns the polygon unchanged when every vertex is inside, and nothing
/// when no edge crosses the boundary. Output rings keep the winding of the
/// input.
pub fn clip_polygon(polygon: &[Vec3], rect: &ClipRect) -> Vec<Vec<Vec3>> {
    if polygon.len() < 3 {
        return Vec::new();
    }
    if polygon.iter().all(|&p| rect.contains(p)) {
        return vec![polygon.to_vec()];
    }

    let clockwise = signed_area(polygon) < 0.0;
    let subject: Vec<Vec3> = if clockwise {
        polygon.iter().rev().copied().collect()
    } else {
        polygon.to_vec()
    };

    let mut crossings = find_crossings(&subject, rect);
    if crossings.is_empty() {
        trace!(vertices = polygon.len(), "polygon has no boundary crossings, dropped");
        return Vec::new();
    }
    if !alternates(&crossings) {
        warn!(
            crossings = crossings.len(),
            "entering and leaving crossings do not alternate, using convex clip"
        );
        return fallback(polygon, rect);
    }

    let subject_list = build_subject_list(&subject, &mut crossings);
    let boundary_list = build_boundary_list(rect, &mut crossings);

    let Some(mut rings) = traverse(&subject_list, &boundary_list, &crossings) else {
        warn!(
            vertices = polygon.len(),
            crossings = crossings.len(),
            "polygon traversal did not close, using convex clip"
        );
        return fallback(polygon, rect);
    };

    if clockwise {
        rings.iter_mut().for_each(|ring| ring.reverse());
    }
    rings
}

/// Shoelace area; positive for counter-clockwise rings.
pub fn signed_area(ring: &[Vec3]) -> f64 {
    let n = ring.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice / 2.0
}

fn fallback(polygon: &[Vec3], rect: &ClipRect) -> Vec<Vec<Vec3>> {
    let ring = sutherland_hodgman::clip_polygon(polygon, rect);
    if ring.is_empty() {
        Vec::new()
    } else {
        vec![ring]
    }
}

fn find_crossings(subject: &[Vec3], rect: &ClipRect) -> Vec<Crossing> {
    let n = subject.len();
    let mut crossings = Vec::new();

    for edge in 0..n {
        let (a, b) = (subject[edge], subject[(edge + 1) % n]);
        let Some(span) = ParametricSpan::compute(a, b, rect) else {
            continue;
        };

        let crossing = |point, entering| Crossing {
            point,
            entering,
            edge,
            subject_index: 0,
            boundary_index: 0,
        };
        if span.t_enter > 0.0 {
            crossings.push(crossing(span.enter_point(a, b, rect), true));
        }
        if span.t_leave < 1.0 {
            crossings.push(crossing(span.leave_point(a, b, rect), false));
        }
    }

    collapse_touches(crossings, n)
}

/// Removes entering/leaving pairs at the same point on one edge or across
/// one shared vertex. These only touch the boundary.
fn collapse_touches(crossings: Vec<Crossing>, edges: usize) -> Vec<Crossing> {
    let touches = |enter: &Crossing, leave: &Crossing| {
        enter.entering
            && !leave.entering
            && (leave.edge == enter.edge || leave.edge == (enter.edge + 1) % edges)
            && same_point(enter.point, leave.point)
    };

    let mut kept: Vec<Crossing> = Vec::with_capacity(crossings.len());
    for crossing in crossings {
        if kept.last().is_some_and(|last| touches(last, &crossing)) {
            kept.pop();
        } else {
            kept.push(crossing);
        }
    }

    // Pair straddling the closing vertex.
    while kept.len() >= 2 && touches(&kept[kept.len() - 1], &kept[0]) {
        kept.pop();
        kept.remove(0);
    }
    kept
}

fn alternates(crossings: &[Crossing]) -> bool {
    let n = crossings.len();
    (0..n).all(|i| crossings[i].entering != crossings[(i + 1) % n].entering)
}

fn build_subject_list(subject: &[Vec3], crossings: &mut [Crossing]) -> Vec<Node> {
    let mut list = Vec::with_capacity(subject.len() + crossings.len());
    let mut next = 0;

    for (edge, &vertex) in subject.iter().enumerate() {
        list.push(Node::Vertex(vertex));
        while next < crossings.len() && crossings[next].edge == edge {
            crossings[next].subject_index = list.len();
            list.push(Node::Crossing(next));
            next += 1;
        }
    }
    list
}

fn build_boundary_list(rect: &ClipRect, crossings: &mut [Crossing]) -> Vec<Node> {
    // Rank orders ties: corner, then leaving, then entering.
    let mut entries: Vec<(f64, u8, Node)> = rect
        .corners_ccw()
        .into_iter()
        .map(|corner| (perimeter_position(corner, rect), 0, Node::Vertex(corner)))
        .collect();
    entries.extend(crossings.iter().enumerate().map(|(id, c)| {
        let rank = if c.entering { 2 } else { 1 };
        (perimeter_position(c.point, rect), rank, Node::Crossing(id))
    }));
    entries.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let list: Vec<Node> = entries.into_iter().map(|(_, _, node)| node).collect();
    for (index, node) in list.iter().enumerate() {
        if let Node::Crossing(id) = *node {
            crossings[id].boundary_index = index;
        }
    }
    list
}

/// Distance of a boundary point from the bottom-left corner, measured
/// counter-clockwise around the perimeter.
fn perimeter_position(p: Vec3, rect: &ClipRect) -> f64 {
    let (x, y) = (round_to(p.x), round_to(p.y));
    let (length, width) = (rect.length(), rect.width());

    if y == round_to(rect.y_min) {
        x - rect.x_min
    } else if x == round_to(rect.x_max) {
        length + (y - rect.y_min)
    } else if y == round_to(rect.y_max) {
        length + width + (rect.x_max - x)
    } else {
        2.0 * length + width + (rect.y_max - y)
    }
}

fn traverse(subject: &[Node], boundary: &[Node], crossings: &[Crossing]) -> Option<Vec<Vec<Vec3>>> {
    let limit = 4 * (subject.len() + boundary.len());
    let mut steps = 0;
    let mut step = || {
        steps += 1;
        steps <= limit
    };

    let mut visited = vec![false; crossings.len()];
    let mut rings = Vec::new();

    for start in 0..crossings.len() {
        if visited[start] || !crossings[start].entering {
            continue;
        }

        let mut ring = Vec::new();
        let mut current = start;
        loop {
            visited[current] = true;
            ring.push(crossings[current].point);

            // Inside: follow the polygon until it leaves.
            let mut i = crossings[current].subject_index;
            let leave = loop {
                if !step() {
                    return None;
                }
                i = (i + 1) % subject.len();
                match subject[i] {
                    Node::Vertex(p) => ring.push(p),
                    Node::Crossing(id) => break id,
                }
            };
            visited[leave] = true;
            ring.push(crossings[leave].point);

            // Outside: follow the border until the polygon re-enters.
            let mut j = crossings[leave].boundary_index;
            let enter = loop {
                if !step() {
                    return None;
                }
                j = (j + 1) % boundary.len();
                match boundary[j] {
                    Node::Vertex(p) => ring.push(p),
                    Node::Crossing(id) if crossings[id].entering => break id,
                    Node::Crossing(_) => {}
                }
            };

            if enter == start {
                break;
            }
            if visited[enter] {
                return None;
            }
            current = enter;
        }

        if let Some(ring) = finish_ring(ring) {
            rings.push(ring);
        }
    }

    Some(rings)
}

/// Drops repeated points and degenerate rings.
fn finish_ring(points: Vec<Vec3>) -> Option<Vec<Vec3>> {
    let mut ring: Vec<Vec3> = Vec::with_capacity(points.len());
    for p in points {
        if ring.last().map_or(true, |&last| !same_point(last, p)) {
            ring.push(p);
        }
    }
    while ring.len() > 1 && same_point(ring[0], ring[ring.len() - 1]) {
        ring.pop();
    }

    (ring.len() >= 3 && round_to(signed_area(&ring)) != 0.0).then_some(ring)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipper::ROUNDING_DECIMALS;
    use approx::assert_relative_eq;

    fn window() -> ClipRect {
        ClipRect::new(0.0, 100.0, 0.0, 100.0)
    }

    fn ring(points: &[(f64, f64)]) -> Vec<Vec3> {
        points.iter().map(|&(x, y)| Vec3::xy(x, y)).collect()
    }

    /// Rounded, deduplicated, rotated to start at the smallest point.
    fn normalized(points: &[Vec3]) -> Vec<(i64, i64)> {
        let factor = 10f64.powi(ROUNDING_DECIMALS - 1);
        let mut keys: Vec<(i64, i64)> = Vec::new();
        for p in points {
            let key = ((p.x * factor).round() as i64, (p.y * factor).round() as i64);
            if keys.last() != Some(&key) {
                keys.push(key);
            }
        }
        while keys.len() > 1 && keys.first() == keys.last() {
            keys.pop();
        }
        let start = keys
            .iter()
            .enumerate()
            .min_by_key(|(_, k)| **k)
            .map(|(i, _)| i)
            .unwrap_or(0);
        keys.rotate_left(start);
        keys
    }

    fn assert_within(points: &[Vec3], rect: &ClipRect) {
        for p in points {
            assert!(
                p.x >= rect.x_min - 1e-9
                    && p.x <= rect.x_max + 1e-9
                    && p.y >= rect.y_min - 1e-9
                    && p.y <= rect.y_max + 1e-9,
                "{:?} outside {:?}",
                p,
                rect
            );
        }
    }

    #[test]
    fn inside_polygon_is_unchanged() {
        let triangle = ring(&[(10.0, 10.0), (90.0, 10.0), (50.0, 100.0)]);
        assert_eq!(clip_polygon(&triangle, &window()), vec![triangle]);
    }

    #[test]
    fn diamond_becomes_octagon() {
        let diamond = ring(&[(-10.0, 50.0), (50.0, -10.0), (110.0, 50.0), (50.0, 110.0)]);
        let rings = clip_polygon(&diamond, &window());
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 8);
        assert_within(&rings[0], &window());
        assert_relative_eq!(signed_area(&rings[0]), 10000.0 - 4.0 * 800.0, epsilon = 1e-6);
    }

    #[test]
    fn convex_result_matches_sutherland_hodgman() {
        let rect = window();
        let polygons = [
            ring(&[(-10.0, 50.0), (50.0, -10.0), (110.0, 50.0), (50.0, 110.0)]),
            ring(&[(-30.0, -20.0), (60.0, 10.0), (40.0, 70.0)]),
            ring(&[(20.0, 20.0), (150.0, 40.0), (140.0, 160.0), (30.0, 90.0)]),
            ring(&[(-50.0, 30.0), (150.0, 30.0), (150.0, 60.0), (-50.0, 60.0)]),
        ];
        for polygon in polygons {
            let rings = clip_polygon(&polygon, &rect);
            let reference = sutherland_hodgman::clip_polygon(&polygon, &rect);
            assert_eq!(rings.len(), 1, "{:?}", polygon);
            assert_eq!(normalized(&rings[0]), normalized(&reference), "{:?}", polygon);
        }
    }

    #[test]
    fn clockwise_input_keeps_winding() {
        let diamond = ring(&[(50.0, 110.0), (110.0, 50.0), (50.0, -10.0), (-10.0, 50.0)]);
        let rings = clip_polygon(&diamond, &window());
        assert_eq!(rings.len(), 1);
        assert!(signed_area(&rings[0]) < 0.0);
    }

    #[test]
    fn outside_polygon_is_dropped() {
        let far = ring(&[(200.0, 200.0), (300.0, 200.0), (250.0, 300.0)]);
        assert!(clip_polygon(&far, &window()).is_empty());

        // Touches the window only at its top-right corner.
        let touching = ring(&[(100.0, 100.0), (150.0, 110.0), (110.0, 150.0)]);
        assert!(clip_polygon(&touching, &window()).is_empty());
    }

    #[test]
    fn enclosing_polygon_without_crossings_is_dropped() {
        let big = ring(&[(-50.0, -50.0), (150.0, -50.0), (150.0, 150.0), (-50.0, 150.0)]);
        assert!(clip_polygon(&big, &window()).is_empty());
    }

    #[test]
    fn polygon_covering_window_from_border_edge() {
        let cover = ring(&[(-10.0, -10.0), (110.0, -10.0), (110.0, 100.0), (-10.0, 100.0)]);
        let rings = clip_polygon(&cover, &window());
        assert_eq!(rings.len(), 1);
        assert_relative_eq!(signed_area(&rings[0]), 10000.0, epsilon = 1e-6);
    }

    #[test]
    fn concave_polygon_splits_into_rings() {
        // Two arms reaching down into the window from above.
        let u = ring(&[
            (10.0, 150.0),
            (10.0, 50.0),
            (30.0, 50.0),
            (30.0, 120.0),
            (70.0, 120.0),
            (70.0, 50.0),
            (90.0, 50.0),
            (90.0, 150.0),
        ]);
        let rings = clip_polygon(&u, &window());
        assert_eq!(rings.len(), 2);
        for r in &rings {
            assert_eq!(r.len(), 4);
            assert_within(r, &window());
            assert_relative_eq!(signed_area(r), 1000.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn vertex_on_corner_keeps_covered_corner() {
        let polygon = ring(&[(-10.0, 50.0), (0.0, 0.0), (50.0, -10.0), (200.0, 200.0)]);
        let rings = clip_polygon(&polygon, &window());
        assert_eq!(rings.len(), 1);
        assert!(rings[0].iter().any(|p| same_point(*p, Vec3::xy(0.0, 0.0))));
        assert_within(&rings[0], &window());
    }

    #[test]
    fn perimeter_positions_run_counter_clockwise() {
        let rect = window();
        assert_eq!(perimeter_position(Vec3::xy(0.0, 0.0), &rect), 0.0);
        assert_eq!(perimeter_position(Vec3::xy(40.0, 0.0), &rect), 40.0);
        assert_eq!(perimeter_position(Vec3::xy(100.0, 30.0), &rect), 130.0);
        assert_eq!(perimeter_position(Vec3::xy(70.0, 100.0), &rect), 230.0);
        assert_eq!(perimeter_position(Vec3::xy(0.0, 20.0), &rect), 380.0);
    }
}
