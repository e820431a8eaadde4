//! 4D vector for homogeneous coordinates.

use std::ops::Mul;

use super::mat4::Mat4;
use super::vec3::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vec4 {
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Create a point (w=1) from a position.
    pub const fn point(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z, 1.0)
    }

    /// Convert to Vec3, discarding w.
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Convert to Vec3 with perspective division (divide by w).
    ///
    /// Returns `None` when w is zero or not finite.
    pub fn to_vec3_perspective(self) -> Option<Vec3> {
        if self.w == 1.0 {
            return Some(self.to_vec3());
        }
        if self.w.abs() <= f64::EPSILON || !self.w.is_finite() {
            return None;
        }
        Some(Vec3::new(self.x / self.w, self.y / self.w, self.z / self.w))
    }
}

impl From<Vec3> for Vec4 {
    /// Convert Vec3 to Vec4 as a point (w=1).
    fn from(v: Vec3) -> Self {
        Self::point(v)
    }
}

/// Row vector times matrix: `v * M`.
impl Mul<Mat4> for Vec4 {
    type Output = Vec4;

    fn mul(self, m: Mat4) -> Self::Output {
        let row = [self.x, self.y, self.z, self.w];
        let mut out = [0.0f64; 4];
        for (col, value) in out.iter_mut().enumerate() {
            *value = (0..4).map(|k| row[k] * m.get(k, col)).sum();
        }
        Vec4::new(out[0], out[1], out[2], out[3])
    }
}
