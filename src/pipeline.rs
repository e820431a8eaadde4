//! Per-frame view pipeline.
//!
//! World objects flow through five stages, each taking its input by value
//! or reference and returning new data; stored geometry is never touched:
//!
//! 1. [`tessellate`]: geometry to drawable primitives (curves and surfaces
//!    become polylines or cells).
//! 2. [`to_window_frame`]: center the window at the origin and align it with
//!    the XY plane.
//! 3. [`project`]: parallel or perspective projection.
//! 4. [`clip`]: points, lines and polygons against the window rectangle.
//! 5. [`to_device`]: window coordinates to viewport pixels.

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::clipper::{clip_point, clip_polyline, weiler_atherton, ClipRect, LineClipper};
use crate::geometry::{GeometricObject, Geometry, ObjectId, ObjectKind};
use crate::math::{Mat4, Vec3};
use crate::projection::Projector;
use crate::tessellate::{
    tessellate_curve, tessellate_surface, DEFAULT_CURVE_PRECISION, DEFAULT_SURFACE_PRECISION,
};
use crate::viewport::{Pixel, Viewport};
use crate::window::Window;

/// A drawable piece of an object, in world or window coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Point(Vec3),
    Segment(Vec3, Vec3),
    /// Closed ring of at least three points.
    Polygon(Vec<Vec3>),
    /// Open chain of at least two points.
    Polyline(Vec<Vec3>),
}

impl Primitive {
    fn map(self, f: impl Fn(Vec3) -> Vec3) -> Primitive {
        match self {
            Primitive::Point(p) => Primitive::Point(f(p)),
            Primitive::Segment(a, b) => Primitive::Segment(f(a), f(b)),
            Primitive::Polygon(ring) => Primitive::Polygon(ring.into_iter().map(f).collect()),
            Primitive::Polyline(points) => Primitive::Polyline(points.into_iter().map(f).collect()),
        }
    }
}

/// A primitive in device pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevicePrimitive {
    Point(Pixel),
    Segment(Pixel, Pixel),
    Polygon(Vec<Pixel>),
    Polyline(Vec<Pixel>),
}

/// A surviving object, ready for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceObject {
    /// `None` for overlays that are not world objects.
    pub id: Option<ObjectId>,
    pub name: String,
    pub color: u32,
    pub kind: ObjectKind,
    pub filled: bool,
    pub primitives: Vec<DevicePrimitive>,
}

/// Sampling precision for curves and surfaces, as a parameter step in `[MIN_PRECISION, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tessellation {
    pub curve_precision: f64,
    pub surface_precision: f64,
}

impl Default for Tessellation {
    fn default() -> Self {
        Self {
            curve_precision: DEFAULT_CURVE_PRECISION,
            surface_precision: DEFAULT_SURFACE_PRECISION,
        }
    }
}

// ============ Stages ============

/// Stage 1: the primitives that draw `geometry`.
pub fn tessellate(geometry: &Geometry, tessellation: &Tessellation) -> Vec<Primitive> {
    match geometry {
        Geometry::Point(p) => vec![Primitive::Point(*p)],
        Geometry::Line(a, b) => vec![Primitive::Segment(*a, *b)],
        Geometry::Wireframe {
            points,
            faces: None,
            ..
        } => loop_primitive(points.clone()).into_iter().collect(),
        Geometry::Wireframe {
            points,
            faces: Some(faces),
            filled,
        } => mesh_primitives(points, faces, *filled),
        Geometry::Curve { control, method } => {
            let points = tessellate_curve(control, *method, tessellation.curve_precision);
            if points.len() >= 2 {
                vec![Primitive::Polyline(points)]
            } else {
                Vec::new()
            }
        }
        Geometry::Surface { control, filled } => {
            let grids = tessellate_surface(control, tessellation.surface_precision);
            if *filled {
                grids.iter().flat_map(|grid| surface_cells(grid.rows())).collect()
            } else {
                grids
                    .iter()
                    .flat_map(|grid| grid.polylines())
                    .map(Primitive::Polyline)
                    .collect()
            }
        }
    }
}

/// A vertex loop as the simplest primitive that draws it.
fn loop_primitive(mut points: Vec<Vec3>) -> Option<Primitive> {
    match points.len() {
        0 => None,
        1 => Some(Primitive::Point(points[0])),
        2 => Some(Primitive::Segment(points[0], points[1])),
        _ => {
            points.shrink_to_fit();
            Some(Primitive::Polygon(points))
        }
    }
}

/// Filled meshes keep each face as a polygon; unfilled meshes draw each
/// distinct edge once.
fn mesh_primitives(points: &[Vec3], faces: &[Vec<usize>], filled: bool) -> Vec<Primitive> {
    let vertex = |i: usize| {
        let p = points.get(i).copied();
        if p.is_none() {
            warn!(index = i, vertices = points.len(), "mesh face index out of range, skipped");
        }
        p
    };

    if filled {
        return faces
            .iter()
            .filter_map(|face| {
                let ring: Option<Vec<Vec3>> = face.iter().map(|&i| vertex(i)).collect();
                loop_primitive(ring?)
            })
            .collect();
    }

    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for face in faces {
        for k in 0..face.len() {
            let (i, j) = (face[k], face[(k + 1) % face.len()]);
            if i == j || !seen.insert((i.min(j), i.max(j))) {
                continue;
            }
            if let (Some(a), Some(b)) = (vertex(i), vertex(j)) {
                edges.push(Primitive::Segment(a, b));
            }
        }
    }
    edges
}

/// Quads between neighbouring grid points of a filled patch.
fn surface_cells(rows: &[Vec<Vec3>]) -> Vec<Primitive> {
    rows.windows(2)
        .flat_map(|pair| {
            let (top, bottom) = (&pair[0], &pair[1]);
            (0..top.len().saturating_sub(1)).map(move |j| {
                Primitive::Polygon(vec![top[j], top[j + 1], bottom[j + 1], bottom[j]])
            })
        })
        .collect()
}

/// Stage 2: maps every point through the window alignment matrix.
pub fn to_window_frame(primitives: Vec<Primitive>, view: &Mat4) -> Vec<Primitive> {
    primitives
        .into_iter()
        .map(|primitive| primitive.map(|p| view.transform_point(p)))
        .collect()
}

/// Stage 3: projects window-frame primitives.
pub fn project(primitives: Vec<Primitive>, projector: &Projector) -> Vec<Primitive> {
    let mut out = Vec::with_capacity(primitives.len());
    for primitive in primitives {
        match primitive {
            Primitive::Point(p) => out.extend(projector.project_point(p).map(Primitive::Point)),
            Primitive::Segment(a, b) => out.extend(
                projector
                    .project_segment(a, b)
                    .map(|(a, b)| Primitive::Segment(a, b)),
            ),
            Primitive::Polygon(ring) => {
                let ring = projector.project_polygon(&ring);
                if ring.len() >= 3 {
                    out.push(Primitive::Polygon(ring));
                }
            }
            Primitive::Polyline(points) => out.extend(
                projector
                    .project_polyline(&points)
                    .into_iter()
                    .map(Primitive::Polyline),
            ),
        }
    }
    out
}

/// Stage 4: clips against the window rectangle. Polygons may split into
/// several rings and polylines into several runs.
pub fn clip(primitives: Vec<Primitive>, rect: &ClipRect, clipper: &dyn LineClipper) -> Vec<Primitive> {
    let mut out = Vec::with_capacity(primitives.len());
    for primitive in primitives {
        match primitive {
            Primitive::Point(p) => out.extend(clip_point(p, rect).map(Primitive::Point)),
            Primitive::Segment(a, b) => out.extend(
                clipper
                    .clip_line(a, b, rect)
                    .map(|(a, b)| Primitive::Segment(a, b)),
            ),
            Primitive::Polygon(ring) => out.extend(
                weiler_atherton::clip_polygon(&ring, rect)
                    .into_iter()
                    .map(Primitive::Polygon),
            ),
            Primitive::Polyline(points) => out.extend(
                clip_polyline(&points, rect, clipper)
                    .into_iter()
                    .map(Primitive::Polyline),
            ),
        }
    }
    out
}

/// Stage 5: window coordinates to device pixels.
pub fn to_device(primitives: &[Primitive], viewport: &Viewport, rect: &ClipRect) -> Vec<DevicePrimitive> {
    let px = |p: &Vec3| viewport.to_pixel(*p, rect);
    primitives
        .iter()
        .map(|primitive| match primitive {
            Primitive::Point(p) => DevicePrimitive::Point(px(p)),
            Primitive::Segment(a, b) => DevicePrimitive::Segment(px(a), px(b)),
            Primitive::Polygon(ring) => DevicePrimitive::Polygon(ring.iter().map(px).collect()),
            Primitive::Polyline(points) => DevicePrimitive::Polyline(points.iter().map(px).collect()),
        })
        .collect()
}

// ============ Orchestration ============

/// Everything one frame needs, borrowed from the engine for the duration
/// of a pass.
pub struct ViewPipeline<'a> {
    view: Mat4,
    rect: ClipRect,
    projector: Projector,
    clipper: &'a dyn LineClipper,
    viewport: Viewport,
    tessellation: Tessellation,
}

impl<'a> ViewPipeline<'a> {
    pub fn new(
        window: &Window,
        viewport: Viewport,
        projector: Projector,
        clipper: &'a dyn LineClipper,
        tessellation: Tessellation,
    ) -> Self {
        Self {
            view: window.alignment_matrix(),
            rect: ClipRect::centered(window.length(), window.width()),
            projector,
            clipper,
            viewport,
            tessellation,
        }
    }

    /// The window rectangle in the window frame.
    pub fn clip_rect(&self) -> ClipRect {
        self.rect
    }

    /// Stages 1 to 4 for one geometry.
    pub fn clipped(&self, geometry: &Geometry) -> Vec<Primitive> {
        let primitives = tessellate(geometry, &self.tessellation);
        let primitives = to_window_frame(primitives, &self.view);
        let primitives = project(primitives, &self.projector);
        clip(primitives, &self.rect, self.clipper)
    }

    /// Runs every stage for one geometry; `None` when nothing is visible.
    pub fn render(
        &self,
        id: Option<ObjectId>,
        name: &str,
        color: u32,
        geometry: &Geometry,
    ) -> Option<DeviceObject> {
        let clipped = self.clipped(geometry);
        if clipped.is_empty() {
            trace!(name, kind = %geometry.kind(), "object outside window, dropped");
            return None;
        }
        Some(DeviceObject {
            id,
            name: name.to_string(),
            color,
            kind: geometry.kind(),
            filled: geometry.is_filled(),
            primitives: to_device(&clipped, &self.viewport, &self.rect),
        })
    }

    /// Runs the pipeline over `objects`, keeping their order.
    pub fn run<'o>(&self, objects: impl IntoIterator<Item = &'o GeometricObject>) -> Vec<DeviceObject> {
        let mut total = 0;
        let visible: Vec<DeviceObject> = objects
            .into_iter()
            .inspect(|_| total += 1)
            .filter_map(|o| self.render(Some(o.id()), o.name(), o.color(), o.geometry()))
            .collect();
        debug!(objects = total, visible = visible.len(), "view pipeline pass");
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipper::{CohenSutherland, LiangBarsky};
    use crate::geometry::PlotMethod;
    use crate::projection::ProjectionMode;

    fn window() -> Window {
        Window::new(100.0, 100.0)
    }

    fn pipeline(window: &Window, clipper: &'static dyn LineClipper) -> ViewPipeline<'static> {
        ViewPipeline::new(
            window,
            Viewport::new(100, 100),
            Projector::default(),
            clipper,
            Tessellation::default(),
        )
    }

    #[test]
    fn line_is_clipped_and_mapped() {
        let w = window();
        let p = pipeline(&w, &CohenSutherland);
        let out = p
            .render(None, "l", 0, &Geometry::Line(Vec3::xy(-10.0, 50.0), Vec3::xy(50.0, 50.0)))
            .unwrap();
        assert_eq!(
            out.primitives,
            vec![DevicePrimitive::Segment(Pixel::new(0, 50), Pixel::new(50, 50))]
        );
    }

    #[test]
    fn point_outside_is_dropped() {
        let w = window();
        let p = pipeline(&w, &CohenSutherland);
        assert!(p.render(None, "p", 0, &Geometry::Point(Vec3::xy(150.0, 150.0))).is_none());
    }

    #[test]
    fn wireframe_dispatch_by_point_count() {
        let t = Tessellation::default();
        let wire = |n: usize| Geometry::Wireframe {
            points: (0..n).map(|i| Vec3::xy(i as f64, (i * i) as f64)).collect(),
            faces: None,
            filled: false,
        };
        assert!(matches!(tessellate(&wire(1), &t)[..], [Primitive::Point(_)]));
        assert!(matches!(tessellate(&wire(2), &t)[..], [Primitive::Segment(..)]));
        assert!(matches!(tessellate(&wire(5), &t)[..], [Primitive::Polygon(_)]));
    }

    #[test]
    fn unfilled_mesh_draws_shared_edges_once() {
        let points = vec![Vec3::xy(0.0, 0.0), Vec3::xy(1.0, 0.0), Vec3::xy(1.0, 1.0), Vec3::xy(0.0, 1.0)];
        let faces = vec![vec![0, 1, 2], vec![0, 2, 3]];
        let edges = mesh_primitives(&points, &faces, false);
        assert_eq!(edges.len(), 5);

        let filled = mesh_primitives(&points, &faces, true);
        assert_eq!(filled.len(), 2);
        assert!(filled.iter().all(|p| matches!(p, Primitive::Polygon(r) if r.len() == 3)));
    }

    #[test]
    fn curve_becomes_clipped_polyline() {
        let w = window();
        let p = pipeline(&w, &CohenSutherland);
        let curve = Geometry::Curve {
            control: vec![
                Vec3::xy(-50.0, 10.0),
                Vec3::xy(30.0, 120.0),
                Vec3::xy(70.0, 120.0),
                Vec3::xy(150.0, 10.0),
            ],
            method: PlotMethod::Bezier,
        };
        let clipped = p.clipped(&curve);
        let rect = p.clip_rect();
        assert!(!clipped.is_empty());
        for primitive in &clipped {
            let Primitive::Polyline(points) = primitive else {
                panic!("expected polyline, got {:?}", primitive);
            };
            assert!(points.iter().all(|q| {
                q.x >= rect.x_min - 1e-9 && q.x <= rect.x_max + 1e-9 && q.y >= rect.y_min - 1e-9 && q.y <= rect.y_max + 1e-9
            }));
        }
    }

    #[test]
    fn filled_surface_becomes_cells() {
        let control: Vec<Vec3> = (0..16).map(|i| Vec3::xy((i % 4) as f64, (i / 4) as f64)).collect();
        let t = Tessellation {
            curve_precision: 0.1,
            surface_precision: 0.5,
        };
        let cells = tessellate(&Geometry::Surface { control: control.clone(), filled: true }, &t);
        assert_eq!(cells.len(), 4);
        let lines = tessellate(&Geometry::Surface { control, filled: false }, &t);
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn pipeline_does_not_touch_input() {
        let mut w = window();
        w.rotate(30.0, crate::transform::Axis::Z);
        let p = pipeline(&w, &LiangBarsky);
        let geometry = Geometry::Wireframe {
            points: vec![Vec3::xy(-10.0, 50.0), Vec3::xy(50.0, -10.0), Vec3::xy(110.0, 50.0)],
            faces: None,
            filled: true,
        };
        let before = geometry.clone();
        let _ = p.clipped(&geometry);
        assert_eq!(geometry, before);
    }

    #[test]
    fn perspective_keeps_window_plane_objects_in_place() {
        let w = window();
        let parallel = pipeline(&w, &CohenSutherland);
        let perspective = ViewPipeline::new(
            &w,
            Viewport::new(100, 100),
            Projector::new(ProjectionMode::Perspective, 1000.0),
            &CohenSutherland,
            Tessellation::default(),
        );
        let line = Geometry::Line(Vec3::xy(20.0, 20.0), Vec3::xy(80.0, 60.0));
        assert_eq!(
            parallel.render(None, "l", 0, &line).map(|o| o.primitives),
            perspective.render(None, "l", 0, &line).map(|o| o.primitives)
        );
    }
}
