//! Parallel and perspective projection of window-aligned geometry.
//!
//! Input coordinates are in the window frame: window center at the origin,
//! window right/up along X/Y and the view-plane normal along Z. The center
//! of projection sits `distance` units behind the window, at `(0, 0, -d)`.
//!
//! Perspective projection moves the center of projection to the origin so
//! the window plane lies at `z = d`, cuts geometry at the near plane, then
//! multiplies by [`Mat4::perspective`] and divides by `w`. Points on the
//! window plane keep their window-frame coordinates.
//!
//! The divide is a true homogeneous one, not an affine approximation:
//! `x` and `y` scale by `d / (z + d)`, so geometry one window distance
//! behind the window appears at half size.
//!
//! ```
//! use windowpane::math::Vec3;
//! use windowpane::projection::{ProjectionMode, Projector};
//!
//! let projector = Projector::new(ProjectionMode::Perspective, 1000.0);
//! let far = projector.project_point(Vec3::new(100.0, 40.0, 1000.0)).unwrap();
//! assert!((far.x - 50.0).abs() < 1e-9);
//! assert!((far.y - 20.0).abs() < 1e-9);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clipper::join_runs;
use crate::clipper::sutherland_hodgman::{self, ClipEdge};
use crate::error::{Result, ViewError};
use crate::math::{Mat4, Vec3, Vec4};

/// Default distance between the center of projection and the window.
pub const DEFAULT_DISTANCE: f64 = 1000.0;

/// Minimum depth in front of the center of projection.
pub const NEAR_PLANE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    #[default]
    Parallel,
    Perspective,
}

impl ProjectionMode {
    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Parallel => ProjectionMode::Perspective,
            ProjectionMode::Perspective => ProjectionMode::Parallel,
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionMode::Parallel => write!(f, "parallel"),
            ProjectionMode::Perspective => write!(f, "perspective"),
        }
    }
}

impl FromStr for ProjectionMode {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parallel" | "orthographic" => Ok(ProjectionMode::Parallel),
            "perspective" => Ok(ProjectionMode::Perspective),
            _ => Err(ViewError::unrecognized("projection", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    mode: ProjectionMode,
    distance: f64,
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(ProjectionMode::default(), DEFAULT_DISTANCE)
    }
}

impl Projector {
    /// Non-positive distances fall back to [`DEFAULT_DISTANCE`].
    pub fn new(mode: ProjectionMode, distance: f64) -> Self {
        let distance = if distance.is_finite() && distance > NEAR_PLANE {
            distance
        } else {
            DEFAULT_DISTANCE
        };
        Self { mode, distance }
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ProjectionMode) {
        self.mode = mode;
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    fn shift(&self, p: Vec3) -> Vec3 {
        Vec3::new(p.x, p.y, p.z + self.distance)
    }

    fn divide(&self, p: Vec3) -> Option<Vec3> {
        (Vec4::point(p) * Mat4::perspective(self.distance))
            .to_vec3_perspective()
            .filter(Vec3::is_finite)
    }

    /// Projects a point, or `None` when it is behind the near plane.
    pub fn project_point(&self, p: Vec3) -> Option<Vec3> {
        match self.mode {
            ProjectionMode::Parallel => Some(p),
            ProjectionMode::Perspective => {
                let p = self.shift(p);
                if p.z < NEAR_PLANE {
                    return None;
                }
                self.divide(p)
            }
        }
    }

    /// Projects a segment, cutting it at the near plane first.
    pub fn project_segment(&self, a: Vec3, b: Vec3) -> Option<(Vec3, Vec3)> {
        match self.mode {
            ProjectionMode::Parallel => Some((a, b)),
            ProjectionMode::Perspective => {
                let (a, b) = sutherland_hodgman::clip_segment(
                    self.shift(a),
                    self.shift(b),
                    ClipEdge::Near(NEAR_PLANE),
                )?;
                Some((self.divide(a)?, self.divide(b)?))
            }
        }
    }

    /// Projects a closed polygon, cutting it at the near plane first.
    /// Returns an empty ring when fewer than three vertices remain.
    pub fn project_polygon(&self, ring: &[Vec3]) -> Vec<Vec3> {
        match self.mode {
            ProjectionMode::Parallel => ring.to_vec(),
            ProjectionMode::Perspective => {
                let shifted: Vec<Vec3> = ring.iter().map(|&p| self.shift(p)).collect();
                let kept = sutherland_hodgman::clip_against_edge(&shifted, ClipEdge::Near(NEAR_PLANE));
                let projected: Option<Vec<Vec3>> = kept.into_iter().map(|p| self.divide(p)).collect();
                projected.filter(|r| r.len() >= 3).unwrap_or_default()
            }
        }
    }

    /// Projects an open polyline. Parts behind the near plane are removed,
    /// which may split it into several runs.
    pub fn project_polyline(&self, points: &[Vec3]) -> Vec<Vec<Vec3>> {
        match self.mode {
            ProjectionMode::Parallel => vec![points.to_vec()],
            ProjectionMode::Perspective => {
                join_runs(points.windows(2).map(|pair| self.project_segment(pair[0], pair[1])))
            }
        }
    }
}
