//! Window-to-viewport mapping.

use serde::{Deserialize, Serialize};

use crate::clipper::ClipRect;
use crate::math::Vec3;

/// A device pixel coordinate. The origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
}

impl Pixel {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The fixed-size device rectangle the window is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Maps a window-frame point into device space, flipping Y so that
    /// larger window Y values land higher on screen.
    pub fn map(&self, p: Vec3, window: &ClipRect) -> (f64, f64) {
        let x = (p.x - window.x_min) / window.length() * f64::from(self.width);
        let y = (1.0 - (p.y - window.y_min) / window.width()) * f64::from(self.height);
        (x, y)
    }

    /// [`Viewport::map`] rounded to the pixel grid.
    pub fn to_pixel(&self, p: Vec3, window: &ClipRect) -> Pixel {
        let (x, y) = self.map(p, window);
        Pixel::new(x.round() as i32, y.round() as i32)
    }
}
