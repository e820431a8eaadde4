//! Draws a display list onto a [`Canvas`].

use super::canvas::Canvas;
use crate::pipeline::{DeviceObject, DevicePrimitive};
use crate::viewport::Pixel;

/// Side of the square drawn for point objects, in pixels.
pub const POINT_SIZE: i32 = 4;

/// Background grid spacing, in pixels.
pub const GRID_SPACING: i32 = 50;

#[derive(Debug, Clone, Copy)]
pub struct Painter {
    pub background: u32,
    pub grid: Option<u32>,
}

impl Painter {
    pub fn new(background: u32, grid: Option<u32>) -> Self {
        Self { background, grid }
    }

    /// Clears the canvas and draws every object in order.
    pub fn paint(&self, canvas: &mut Canvas, objects: &[DeviceObject]) {
        canvas.clear(self.background);
        if let Some(color) = self.grid {
            canvas.draw_grid(GRID_SPACING, color);
        }
        for object in objects {
            self.paint_object(canvas, object);
        }
    }

    pub fn paint_object(&self, canvas: &mut Canvas, object: &DeviceObject) {
        for primitive in &object.primitives {
            match primitive {
                DevicePrimitive::Point(p) => {
                    let half = POINT_SIZE / 2;
                    canvas.draw_rect(p.x - half, p.y - half, POINT_SIZE, POINT_SIZE, object.color);
                }
                DevicePrimitive::Segment(a, b) => canvas.draw_line(*a, *b, object.color),
                DevicePrimitive::Polyline(points) => {
                    for pair in points.windows(2) {
                        canvas.draw_line(pair[0], pair[1], object.color);
                    }
                }
                DevicePrimitive::Polygon(ring) => {
                    if object.filled {
                        fill_polygon(canvas, ring, object.color);
                    }
                    for (i, &a) in ring.iter().enumerate() {
                        canvas.draw_line(a, ring[(i + 1) % ring.len()], object.color);
                    }
                }
            }
        }
    }
}

/// Scanline fill with the even-odd rule. Each row is sampled at its pixel
/// center and spans between successive edge crossings are filled.
pub fn fill_polygon(canvas: &mut Canvas, ring: &[Pixel], color: u32) {
    if ring.len() < 3 {
        return;
    }
    let y_min = ring.iter().map(|p| p.y).min().unwrap_or(0).max(0);
    let y_max = ring
        .iter()
        .map(|p| p.y)
        .max()
        .unwrap_or(0)
        .min(canvas.height() as i32 - 1);

    let mut crossings = Vec::with_capacity(ring.len());
    for y in y_min..=y_max {
        let scan = y as f64 + 0.5;
        crossings.clear();
        for (i, a) in ring.iter().enumerate() {
            let b = ring[(i + 1) % ring.len()];
            let (ay, by) = (a.y as f64, b.y as f64);
            // Half-open in y so shared vertices count once.
            if (ay <= scan) != (by <= scan) {
                let t = (scan - ay) / (by - ay);
                crossings.push(a.x as f64 + t * (b.x - a.x) as f64);
            }
        }
        crossings.sort_by(|l, r| l.total_cmp(r));
        for pair in crossings.chunks_exact(2) {
            let x0 = (pair[0] - 0.5).ceil() as i32;
            let x1 = (pair[1] - 0.5).floor() as i32;
            if x0 <= x1 {
                canvas.draw_span(y, x0, x1, color);
            }
        }
    }
}
