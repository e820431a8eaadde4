//! Pixel buffer and low-level drawing.
//!
//! [`Canvas`] owns an ARGB8888 color buffer and implements the primitive
//! operations the painter builds on: pixels, rectangles, Bresenham lines,
//! horizontal spans and the background grid.

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::colors;
use crate::error::Result;
use crate::viewport::Pixel;

pub struct Canvas {
    color_buffer: Vec<u32>,
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            color_buffer: vec![colors::BACKGROUND; (width * height) as usize],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.color_buffer = vec![colors::BACKGROUND; (width * height) as usize];
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
    }

    /// Silently ignores out-of-bounds coordinates.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let index = (y as u32 * self.width + x as u32) as usize;
            self.color_buffer[index] = color;
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(self.color_buffer[(y as u32 * self.width + x as u32) as usize])
        } else {
            None
        }
    }

    pub fn draw_grid(&mut self, spacing: i32, color: u32) {
        if spacing <= 0 {
            return;
        }
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if x % spacing == 0 || y % spacing == 0 {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    #[inline]
    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32) {
        for dy in 0..height {
            for dx in 0..width {
                self.set_pixel(x + dx, y + dy, color);
            }
        }
    }

    /// Fills `[x0, x1]` on row `y`, clamped to the buffer.
    #[inline]
    pub fn draw_span(&mut self, y: i32, x0: i32, x1: i32, color: u32) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (lo, hi) = (x0.min(x1).max(0), x0.max(x1).min(self.width as i32 - 1));
        for x in lo..=hi {
            self.set_pixel(x, y, color);
        }
    }

    /// Draws a line between two pixels using Bresenham's algorithm.
    ///
    /// The error term tracks the distance between the ideal line and the
    /// current pixel; each step moves along the major axis and also along
    /// the minor axis once the accumulated error crosses the threshold.
    pub fn draw_line(&mut self, from: Pixel, to: Pixel, color: u32) {
        let (mut x, mut y) = (from.x, from.y);
        let dx = (to.x - x).abs();
        let dy = (to.y - y).abs();
        let x_step = if x < to.x { 1 } else { -1 };
        let y_step = if y < to.y { 1 } else { -1 };
        let mut err = dx - dy;

        loop {
            self.set_pixel(x, y, color);
            if x == to.x && y == to.y {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += x_step;
            }
            if e2 < dx {
                err += dx;
                y += y_step;
            }
        }
    }

    /// The color buffer as bytes, for streaming into an ARGB8888 texture.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: u32 has no padding and stricter alignment than u8; the
        // byte slice covers exactly the buffer's memory and borrows it.
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * 4,
            )
        }
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let (a, r, g, b) = colors::unpack(self.color_buffer[(y * self.width + x) as usize]);
            Rgba([r, g, b, a])
        })
    }

    /// Writes the buffer as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_image().save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}
