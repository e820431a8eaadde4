//! The viewer context.
//!
//! [`Engine`] owns the world, the window, the viewport and the active
//! clipping and projection settings, and exposes the commands a UI layer
//! calls. [`Engine::update`] runs the [`crate::pipeline`] over the world and
//! keeps the resulting display list for the renderer.

use std::path::Path;

use tracing::info;

use crate::clipper::{LineClipDispatcher, LineClipMethod};
use crate::colors;
use crate::config::ViewerConfig;
use crate::error::{Result, ViewError};
use crate::geometry::{GeometricObject, Geometry, ObjectId, PlotMethod, Position};
use crate::mesh::Mesh;
use crate::pipeline::{DeviceObject, Tessellation, ViewPipeline};
use crate::projection::{ProjectionMode, Projector};
use crate::transform::{Axis, ObjectTransform};
use crate::viewport::Viewport;
use crate::window::Window;
use crate::world::{PointBuffer, World};

pub struct Engine {
    config: ViewerConfig,
    world: World,
    window: Window,
    viewport: Viewport,
    projector: Projector,
    clipper: LineClipDispatcher,
    tessellation: Tessellation,
    wireframe_buffer: PointBuffer,
    curve_buffer: PointBuffer,
    display_list: Vec<DeviceObject>,
    pub show_axes: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl Engine {
    pub fn new(config: ViewerConfig) -> Self {
        let window = Window::new(config.window_length, config.window_width)
            .with_zoom_limits(config.zoom_factor, config.min_window_size);

        Self {
            world: World::new(),
            window,
            viewport: Viewport::new(config.viewport_width, config.viewport_height),
            projector: Projector::new(config.projection, config.projection_distance),
            clipper: LineClipDispatcher::new(config.line_clipping),
            tessellation: config.tessellation(),
            wireframe_buffer: PointBuffer::wireframe(false),
            curve_buffer: PointBuffer::curve(PlotMethod::default()),
            display_list: Vec::new(),
            show_axes: true,
            config,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The output of the last [`Engine::update`].
    pub fn display_list(&self) -> &[DeviceObject] {
        &self.display_list
    }

    // ============ Adding objects ============

    pub fn add_object(&mut self, name: &str, color: u32, geometry: Geometry) -> Result<ObjectId> {
        self.world.add(name, color, geometry)
    }

    pub fn add_point(&mut self, name: &str, color: u32, p: Position) -> Result<ObjectId> {
        self.add_object(name, color, Geometry::Point(p))
    }

    pub fn add_line(&mut self, name: &str, color: u32, a: Position, b: Position) -> Result<ObjectId> {
        self.add_object(name, color, Geometry::Line(a, b))
    }

    /// Adds a surface from whole 4x4 control grids.
    pub fn add_surface(
        &mut self,
        name: &str,
        color: u32,
        control: Vec<Position>,
        filled: bool,
    ) -> Result<ObjectId> {
        self.add_object(name, color, Geometry::Surface { control, filled })
    }

    /// Starts a new wireframe, discarding any uncommitted points.
    pub fn begin_wireframe(&mut self, filled: bool) {
        self.wireframe_buffer = PointBuffer::wireframe(filled);
    }

    pub fn push_wireframe_point(&mut self, p: Position) {
        self.wireframe_buffer.push(p);
    }

    pub fn wireframe_buffer(&self) -> &PointBuffer {
        &self.wireframe_buffer
    }

    pub fn commit_wireframe(&mut self, name: &str, color: u32) -> Result<ObjectId> {
        self.wireframe_buffer.commit(&mut self.world, name, color)
    }

    /// Starts a new curve, discarding any uncommitted points.
    pub fn begin_curve(&mut self, method: PlotMethod) {
        self.curve_buffer = PointBuffer::curve(method);
    }

    pub fn push_curve_point(&mut self, p: Position) {
        self.curve_buffer.push(p);
    }

    pub fn curve_buffer(&self) -> &PointBuffer {
        &self.curve_buffer
    }

    /// Fails with a validation error, keeping the buffered points, while
    /// fewer than four control points are buffered.
    pub fn commit_curve(&mut self, name: &str, color: u32) -> Result<ObjectId> {
        self.curve_buffer.commit(&mut self.world, name, color)
    }

    // ============ Editing objects ============

    pub fn remove_object(&mut self, id: ObjectId) -> Result<GeometricObject> {
        self.world.remove(id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&GeometricObject> {
        self.world.get(id)
    }

    /// First object called `name`.
    pub fn find_object(&self, name: &str) -> Option<&GeometricObject> {
        self.world.find_by_name(name)
    }

    /// Applies `transform` to the stored geometry of `id`.
    pub fn transform_object(&mut self, id: ObjectId, transform: &ObjectTransform) -> Result<()> {
        let object = self.world.get_mut(id).ok_or(ViewError::ObjectNotFound(id))?;
        let matrix = transform.matrix(object.center())?;
        let geometry = object.geometry().transformed(&matrix);
        object.set_geometry(geometry);
        info!(%id, name = object.name(), ?transform, "object transformed");
        Ok(())
    }

    // ============ Window ============

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.window.pan(dx, dy);
    }

    /// Returns `false` when the window is already at its minimum size.
    pub fn zoom_in(&mut self) -> bool {
        self.window.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.window.zoom_out()
    }

    pub fn rotate_window(&mut self, degrees: f64, axis: Axis) {
        self.window.rotate(degrees, axis);
    }

    // ============ Settings ============

    pub fn clipping_method(&self) -> LineClipMethod {
        self.clipper.active_method()
    }

    pub fn set_clipping_method(&mut self, method: LineClipMethod) {
        if method != self.clipper.active_method() {
            info!(%method, "line clipping method changed");
        }
        self.clipper.set_method(method);
    }

    /// Selects a line clipper by identifier, e.g. `"liang_barsky"`.
    pub fn set_clipping_method_by_name(&mut self, name: &str) -> Result<()> {
        self.set_clipping_method(name.parse()?);
        Ok(())
    }

    pub fn projection(&self) -> ProjectionMode {
        self.projector.mode()
    }

    pub fn set_projection(&mut self, mode: ProjectionMode) {
        if mode != self.projector.mode() {
            info!(%mode, "projection changed");
        }
        self.projector.set_mode(mode);
    }

    pub fn set_projection_by_name(&mut self, name: &str) -> Result<()> {
        self.set_projection(name.parse()?);
        Ok(())
    }

    // ============ Mesh files ============

    /// Imports a mesh file as an unfilled wireframe named after its group.
    pub fn import_mesh(&mut self, path: impl AsRef<Path>, color: u32) -> Result<ObjectId> {
        let path = path.as_ref();
        let mesh = Mesh::read(path)?;
        let id = self.world.add(mesh.name.as_str(), color, mesh.to_geometry(false))?;
        info!(
            %id,
            path = %path.display(),
            vertices = mesh.vertices.len(),
            faces = mesh.faces.len(),
            "mesh imported"
        );
        Ok(id)
    }

    /// Writes a wireframe object to a mesh file.
    pub fn export_mesh(&self, id: ObjectId, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let object = self.world.get(id).ok_or(ViewError::ObjectNotFound(id))?;
        let mesh = Mesh::from_geometry(object.name(), object.geometry()).ok_or_else(|| {
            ViewError::Validation(format!("only wireframes can be exported, {} is a {}", id, object.kind()))
        })?;
        mesh.write(path)?;
        info!(%id, path = %path.display(), "mesh exported");
        Ok(())
    }

    // ============ Frame ============

    /// Runs the view pipeline over the world and returns the new display
    /// list. Axis overlays come first so objects draw over them.
    pub fn update(&mut self) -> &[DeviceObject] {
        let pipeline = ViewPipeline::new(
            &self.window,
            self.viewport,
            self.projector,
            &self.clipper,
            self.tessellation,
        );

        let mut display_list = Vec::with_capacity(self.world.len() + 2);
        if self.show_axes {
            let l = self.config.axis_length;
            let axes = [
                ("x axis", colors::AXIS_X, Position::new(-l, 0.0, 0.0), Position::new(l, 0.0, 0.0)),
                ("y axis", colors::AXIS_Y, Position::new(0.0, -l, 0.0), Position::new(0.0, l, 0.0)),
            ];
            for (name, color, a, b) in axes {
                display_list.extend(pipeline.render(None, name, color, &Geometry::Line(a, b)));
            }
        }
        display_list.extend(pipeline.run(self.world.iter()));

        self.display_list = display_list;
        &self.display_list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::DevicePrimitive;
    use crate::transform::RotationPivot;
    use crate::viewport::Pixel;

    fn engine() -> Engine {
        let mut engine = Engine::new(ViewerConfig {
            viewport_width: 100,
            viewport_height: 100,
            window_length: 100.0,
            window_width: 100.0,
            ..ViewerConfig::default()
        });
        engine.show_axes = false;
        engine
    }

    #[test]
    fn update_maps_visible_objects() {
        let mut engine = engine();
        engine.add_point("inside", colors::RED, Position::xy(25.0, 75.0)).unwrap();
        engine.add_point("outside", colors::RED, Position::xy(150.0, 150.0)).unwrap();

        let list = engine.update();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "inside");
        assert_eq!(list[0].primitives, vec![DevicePrimitive::Point(Pixel::new(25, 25))]);
    }

    #[test]
    fn axes_are_drawn_first() {
        let mut engine = engine();
        engine.show_axes = true;
        engine.add_point("p", colors::RED, Position::xy(50.0, 50.0)).unwrap();
        let list = engine.update();
        // The window starts at the origin, so both axes run along its border.
        assert_eq!(list.len(), 3);
        assert!(list[0].id.is_none() && list[1].id.is_none());
        assert_eq!(list[2].name, "p");
    }

    #[test]
    fn curve_commit_needs_four_points() {
        let mut engine = engine();
        engine.begin_curve(PlotMethod::Bezier);
        for i in 0..3 {
            engine.push_curve_point(Position::xy(i as f64 * 10.0, 10.0));
        }
        assert!(matches!(
            engine.commit_curve("c", colors::BLUE),
            Err(ViewError::Validation(_))
        ));
        assert_eq!(engine.curve_buffer().len(), 3);

        engine.push_curve_point(Position::xy(40.0, 10.0));
        engine.commit_curve("c", colors::BLUE).unwrap();
        assert!(engine.curve_buffer().is_empty());
        assert_eq!(engine.world().len(), 1);
    }

    #[test]
    fn clipping_method_by_name() {
        let mut engine = engine();
        engine.set_clipping_method_by_name("liang-barsky").unwrap();
        assert_eq!(engine.clipping_method(), LineClipMethod::LiangBarsky);
        assert!(matches!(
            engine.set_clipping_method_by_name("sutherland"),
            Err(ViewError::UnrecognizedEnum { .. })
        ));
        assert_eq!(engine.clipping_method(), LineClipMethod::LiangBarsky);
    }

    #[test]
    fn transform_moves_stored_geometry() {
        let mut engine = engine();
        let id = engine.add_line("l", colors::RED, Position::xy(0.0, 0.0), Position::xy(10.0, 0.0)).unwrap();
        engine
            .transform_object(id, &ObjectTransform::Translate(Position::xy(5.0, 5.0)))
            .unwrap();
        assert_eq!(
            engine.object(id).unwrap().geometry(),
            &Geometry::Line(Position::xy(5.0, 5.0), Position::xy(15.0, 5.0))
        );

        let rotate = ObjectTransform::Rotate {
            degrees: 90.0,
            pivot: RotationPivot::ObjectCenter { axis: Axis::Z },
        };
        engine.transform_object(id, &rotate).unwrap();
        let Geometry::Line(a, b) = *engine.object(id).unwrap().geometry() else {
            panic!("line changed kind");
        };
        approx::assert_abs_diff_eq!(a.x, 10.0, epsilon = 1e-9);
        approx::assert_abs_diff_eq!(b.x, 10.0, epsilon = 1e-9);
        approx::assert_abs_diff_eq!((a.y - b.y).abs(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn missing_objects_are_reported() {
        let mut engine = engine();
        let id = engine.add_point("p", 0, Position::ZERO).unwrap();
        engine.remove_object(id).unwrap();
        assert!(matches!(engine.remove_object(id), Err(ViewError::ObjectNotFound(_))));
        assert!(matches!(
            engine.transform_object(id, &ObjectTransform::Scale(Position::ONE)),
            Err(ViewError::ObjectNotFound(_))
        ));
    }

    #[test]
    fn update_leaves_world_untouched() {
        let mut engine = engine();
        engine.begin_wireframe(true);
        for p in [(-10.0, 50.0), (50.0, -10.0), (110.0, 50.0), (50.0, 110.0)] {
            engine.push_wireframe_point(Position::xy(p.0, p.1));
        }
        let id = engine.commit_wireframe("diamond", colors::RED).unwrap();
        let before = engine.object(id).unwrap().clone();

        engine.rotate_window(45.0, Axis::Z);
        engine.set_projection(ProjectionMode::Perspective);
        engine.update();
        assert_eq!(engine.object(id).unwrap(), &before);
    }
}
