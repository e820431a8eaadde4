//! The viewing window: the region of world space currently being viewed.
//!
//! A [`Window`] is four corner positions that start as an axis-aligned
//! rectangle on the z = 0 plane. Panning, zooming and rotating move the
//! corners; the corner order never changes and every edge/border
//! computation in the pipeline relies on it:
//!
//! ```text
//!   TOP_LEFT (1) ------- TOP_RIGHT (2)
//!       |                    |
//!       |       center       |
//!       |                    |
//!  BOTTOM_LEFT (0) ---- BOTTOM_RIGHT (3)
//! ```

use tracing::{debug, warn};

use crate::math::{Mat4, Vec3};
use crate::transform::{rotation_about_center, scale_about_center, Axis};

pub const BOTTOM_LEFT: usize = 0;
pub const TOP_LEFT: usize = 1;
pub const TOP_RIGHT: usize = 2;
pub const BOTTOM_RIGHT: usize = 3;

/// Default zoom step (10% per call).
pub const DEFAULT_ZOOM_FACTOR: f64 = 0.1;

/// Default lower bound on window length and width.
pub const DEFAULT_MIN_SIZE: f64 = 10.0;

/// Accumulated rotation per axis, in degrees within `[0, 360)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Angles {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Angles {
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    fn add(&mut self, axis: Axis, degrees: f64) {
        let slot = match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        };
        *slot = (*slot + degrees).rem_euclid(360.0);
    }
}

/// Axis-aligned bounds of the window corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    corners: [Vec3; 4],
    angles: Angles,
    length: f64,
    width: f64,
    base_length: f64,
    base_width: f64,
    zoom_factor: f64,
    min_size: f64,
}

impl Window {
    /// Creates a `length` x `width` window with its bottom-left corner at the origin.
    pub fn new(length: f64, width: f64) -> Self {
        Self::from_corners([
            Vec3::xy(0.0, 0.0),
            Vec3::xy(0.0, width),
            Vec3::xy(length, width),
            Vec3::xy(length, 0.0),
        ])
    }

    /// Creates a window from corners in bottom-left, top-left, top-right,
    /// bottom-right order.
    pub fn from_corners(corners: [Vec3; 4]) -> Self {
        let length = corners[BOTTOM_LEFT].distance(corners[BOTTOM_RIGHT]);
        let width = corners[BOTTOM_LEFT].distance(corners[TOP_LEFT]);
        Self {
            corners,
            angles: Angles::default(),
            length,
            width,
            base_length: length,
            base_width: width,
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            min_size: DEFAULT_MIN_SIZE,
        }
    }

    /// Sets the zoom step and the minimum size floor.
    pub fn with_zoom_limits(mut self, zoom_factor: f64, min_size: f64) -> Self {
        self.zoom_factor = zoom_factor.abs();
        self.min_size = min_size.max(0.0);
        self
    }

    // ============ Queries ============

    pub fn corners(&self) -> [Vec3; 4] {
        self.corners
    }

    pub fn angles(&self) -> Angles {
        self.angles
    }

    /// Current extent along the window's horizontal edge.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Current extent along the window's vertical edge.
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn base_length(&self) -> f64 {
        self.base_length
    }

    pub fn base_width(&self) -> f64 {
        self.base_width
    }

    /// Ratio of the base length to the current length (> 1 when zoomed in).
    pub fn zoom_level(&self) -> f64 {
        self.base_length / self.length
    }

    /// Midpoint of the bottom-left and top-right corners.
    pub fn center(&self) -> Vec3 {
        self.corners[BOTTOM_LEFT].midpoint(self.corners[TOP_RIGHT])
    }

    pub fn bounds(&self) -> Bounds {
        let xs = self.corners.map(|c| c.x);
        let ys = self.corners.map(|c| c.y);
        Bounds {
            x_min: xs.iter().copied().fold(f64::INFINITY, f64::min),
            x_max: xs.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            y_min: ys.iter().copied().fold(f64::INFINITY, f64::min),
            y_max: ys.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Unit vector along the bottom edge (left to right).
    pub fn right(&self) -> Vec3 {
        (self.corners[BOTTOM_RIGHT] - self.corners[BOTTOM_LEFT])
            .try_normalize()
            .unwrap_or(Vec3::X)
    }

    /// Unit vector along the left edge (bottom to top).
    pub fn up(&self) -> Vec3 {
        (self.corners[TOP_LEFT] - self.corners[BOTTOM_LEFT])
            .try_normalize()
            .unwrap_or(Vec3::Y)
    }

    /// View-plane normal: cross product of the bottom and left edge vectors.
    pub fn view_plane_normal(&self) -> Vec3 {
        self.right().cross(self.up()).try_normalize().unwrap_or(Vec3::Z)
    }

    /// Eye point `distance` units behind the window center along the normal.
    pub fn center_of_projection(&self, distance: f64) -> Vec3 {
        self.center() - self.view_plane_normal() * distance
    }

    /// Maps world space into the window frame: center at the origin, the
    /// window's right/up/normal onto the X/Y/Z axes.
    pub fn alignment_matrix(&self) -> Mat4 {
        let center = self.center();
        Mat4::translation(-center.x, -center.y, -center.z)
            * Mat4::basis(self.right(), self.up(), self.view_plane_normal())
    }

    // ============ Navigation ============

    /// Moves all four corners by `(dx, dy)`.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let delta = Vec3::xy(dx, dy);
        self.corners = self.corners.map(|c| c + delta);
        debug!(dx, dy, "window panned");
    }

    /// Shrinks the window about its center. Returns `false` when the size
    /// floor would be crossed, leaving the window unchanged.
    pub fn zoom_in(&mut self) -> bool {
        self.scale(1.0 / (1.0 + self.zoom_factor))
    }

    /// Grows the window about its center.
    pub fn zoom_out(&mut self) -> bool {
        self.scale(1.0 + self.zoom_factor)
    }

    fn scale(&mut self, factor: f64) -> bool {
        if self.length * factor < self.min_size || self.width * factor < self.min_size {
            warn!(
                length = self.length,
                width = self.width,
                min_size = self.min_size,
                "zoom ignored: window would fall below minimum size"
            );
            return false;
        }

        let m = scale_about_center(self.center(), Vec3::new(factor, factor, factor));
        self.corners = self.corners.map(|c| m.transform_point(c));
        self.length = self.corners[BOTTOM_LEFT].distance(self.corners[BOTTOM_RIGHT]);
        self.width = self.corners[BOTTOM_LEFT].distance(self.corners[TOP_LEFT]);
        debug!(length = self.length, width = self.width, "window zoomed");
        true
    }

    /// Rotates the corners about the window center and accumulates the angle.
    pub fn rotate(&mut self, degrees: f64, axis: Axis) {
        let m = rotation_about_center(self.center(), degrees, axis);
        self.corners = self.corners.map(|c| m.transform_point(c));
        self.angles.add(axis, degrees);
        debug!(degrees, %axis, "window rotated");
    }
}
