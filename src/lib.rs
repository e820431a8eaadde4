//! A 2D/3D window-viewport viewing pipeline.
//!
//! The crate keeps a [`World`](world::World) of typed geometric objects and a
//! movable, zoomable, rotatable [`Window`](window::Window) onto it. Each frame,
//! [`Engine::update`] tessellates curves and surfaces, aligns everything with
//! the window, projects it (parallel or perspective), clips it against the
//! window rectangle and maps the survivors to viewport pixels.
//!
//! # Quick Start
//!
//! ```
//! use windowpane::prelude::*;
//!
//! let mut engine = Engine::default();
//! engine.add_line("diagonal", colors::RED, Vec3::xy(-50.0, -50.0), Vec3::xy(900.0, 700.0))?;
//! let display_list = engine.update();
//! assert!(!display_list.is_empty());
//! # Ok::<(), windowpane::ViewError>(())
//! ```

// Public API - exposed to library consumers
pub mod clipper;
pub mod colors;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod math;
pub mod mesh;
pub mod pipeline;
pub mod projection;
pub mod render;
pub mod tessellate;
pub mod transform;
pub mod viewport;
pub mod window;
pub mod world;

// Re-export commonly needed types at crate root for convenience
pub use config::ViewerConfig;
pub use engine::Engine;
pub use error::{Result, ViewError};
pub use geometry::{GeometricObject, Geometry, ObjectId, ObjectKind, PlotMethod};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use windowpane::prelude::*;
/// ```
pub mod prelude {
    // Engine and configuration
    pub use crate::config::ViewerConfig;
    pub use crate::engine::Engine;
    pub use crate::error::{Result, ViewError};

    // Geometry
    pub use crate::colors;
    pub use crate::geometry::{GeometricObject, Geometry, ObjectId, ObjectKind, PlotMethod, Position};

    // Viewing
    pub use crate::clipper::{ClipRect, LineClipMethod, LineClipper};
    pub use crate::pipeline::{DeviceObject, DevicePrimitive};
    pub use crate::projection::ProjectionMode;
    pub use crate::transform::{Axis, ObjectTransform, RotationPivot, RotationType};
    pub use crate::viewport::{Pixel, Viewport};
    pub use crate::window::Window;

    // Math
    pub use crate::math::{Mat4, Vec3, Vec4};

    // Rendering
    pub use crate::render::{Canvas, Painter};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::clipper::sutherland_hodgman::clip_polygon as sutherland_hodgman;
    pub use crate::clipper::weiler_atherton::clip_polygon as weiler_atherton;
    pub use crate::clipper::{CohenSutherland, LiangBarsky, LineClipper};
    pub use crate::tessellate::{b_spline, bezier, tessellate_surface};
}
