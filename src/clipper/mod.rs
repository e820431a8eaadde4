//! Clipping against the axis-aligned window rectangle.
//!
//! - Points: inclusive bounding-box test ([`ClipRect::contains`]).
//! - Lines: [`CohenSutherland`] or [`LiangBarsky`], swappable at runtime
//!   through [`LineClipDispatcher`].
//! - Polygons: [`weiler_atherton::clip_polygon`], with
//!   [`sutherland_hodgman`] kept as the convex reference and for
//!   near-plane clipping in perspective mode.

pub mod cohen_sutherland;
pub mod liang_barsky;
pub mod sutherland_hodgman;
pub mod weiler_atherton;

pub use cohen_sutherland::{outcode, CohenSutherland};
pub use liang_barsky::LiangBarsky;
pub use sutherland_hodgman::ClipEdge;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewError};
use crate::math::Vec3;
use crate::window::Bounds;

/// Decimal places used when deciding whether two computed intersections
/// are the same point.
pub const ROUNDING_DECIMALS: i32 = 5;

/// An axis-aligned clip rectangle. Boundaries are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ClipRect {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// `[-length/2, length/2] x [-width/2, width/2]`.
    pub fn centered(length: f64, width: f64) -> Self {
        Self::new(-length / 2.0, length / 2.0, -width / 2.0, width / 2.0)
    }

    pub fn length(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn width(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn contains(&self, p: Vec3) -> bool {
        self.x_min <= p.x && p.x <= self.x_max && self.y_min <= p.y && p.y <= self.y_max
    }

    /// Corners in counter-clockwise order starting at the bottom-left.
    pub fn corners_ccw(&self) -> [Vec3; 4] {
        [
            Vec3::xy(self.x_min, self.y_min),
            Vec3::xy(self.x_max, self.y_min),
            Vec3::xy(self.x_max, self.y_max),
            Vec3::xy(self.x_min, self.y_max),
        ]
    }
}

impl From<Bounds> for ClipRect {
    fn from(b: Bounds) -> Self {
        Self::new(b.x_min, b.x_max, b.y_min, b.y_max)
    }
}

/// Keeps `p` if it lies inside `rect`.
pub fn clip_point(p: Vec3, rect: &ClipRect) -> Option<Vec3> {
    rect.contains(p).then_some(p)
}

/// Trait for line clipping algorithms.
///
/// Implementors return the part of segment `a`-`b` inside `rect`, or `None`
/// when nothing is left. Accepted endpoints keep their original order.
pub trait LineClipper {
    fn clip_line(&self, a: Vec3, b: Vec3, rect: &ClipRect) -> Option<(Vec3, Vec3)>;
}

/// Available line clipping algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineClipMethod {
    #[default]
    CohenSutherland,
    LiangBarsky,
}

impl LineClipMethod {
    /// The other method; used by the viewer's toggle key.
    pub fn toggled(self) -> Self {
        match self {
            LineClipMethod::CohenSutherland => LineClipMethod::LiangBarsky,
            LineClipMethod::LiangBarsky => LineClipMethod::CohenSutherland,
        }
    }
}

impl fmt::Display for LineClipMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineClipMethod::CohenSutherland => write!(f, "cohen_sutherland"),
            LineClipMethod::LiangBarsky => write!(f, "liang_barsky"),
        }
    }
}

impl FromStr for LineClipMethod {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "cohen_sutherland" | "cs" => Ok(LineClipMethod::CohenSutherland),
            "liang_barsky" | "lb" => Ok(LineClipMethod::LiangBarsky),
            _ => Err(ViewError::unrecognized("clipping method", s)),
        }
    }
}

/// Holds both line clippers and forwards to the active one.
#[derive(Debug, Default)]
pub struct LineClipDispatcher {
    cohen_sutherland: CohenSutherland,
    liang_barsky: LiangBarsky,
    active: LineClipMethod,
}

impl LineClipDispatcher {
    pub fn new(method: LineClipMethod) -> Self {
        Self {
            cohen_sutherland: CohenSutherland,
            liang_barsky: LiangBarsky,
            active: method,
        }
    }

    pub fn set_method(&mut self, method: LineClipMethod) {
        self.active = method;
    }

    pub fn active_method(&self) -> LineClipMethod {
        self.active
    }
}

impl LineClipper for LineClipDispatcher {
    #[inline]
    fn clip_line(&self, a: Vec3, b: Vec3, rect: &ClipRect) -> Option<(Vec3, Vec3)> {
        match self.active {
            LineClipMethod::CohenSutherland => self.cohen_sutherland.clip_line(a, b, rect),
            LineClipMethod::LiangBarsky => self.liang_barsky.clip_line(a, b, rect),
        }
    }
}

/// Reassembles the surviving pieces of a polyline's segments into
/// contiguous runs. A run continues while a piece starts exactly where the
/// previous one ended.
pub fn join_runs(pieces: impl IntoIterator<Item = Option<(Vec3, Vec3)>>) -> Vec<Vec<Vec3>> {
    let mut runs = Vec::new();
    let mut current: Vec<Vec3> = Vec::new();

    for piece in pieces {
        match piece {
            Some((a, b)) => {
                if current.last() != Some(&a) {
                    if current.len() >= 2 {
                        runs.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(a);
                }
                current.push(b);
            }
            None => {
                if current.len() >= 2 {
                    runs.push(std::mem::take(&mut current));
                }
                current.clear();
            }
        }
    }
    if current.len() >= 2 {
        runs.push(current);
    }
    runs
}

/// Clips an open polyline segment by segment.
pub fn clip_polyline(points: &[Vec3], rect: &ClipRect, clipper: &dyn LineClipper) -> Vec<Vec<Vec3>> {
    join_runs(points.windows(2).map(|pair| clipper.clip_line(pair[0], pair[1], rect)))
}

/// Rounds to [`ROUNDING_DECIMALS`] places.
pub(crate) fn round_to(value: f64) -> f64 {
    let factor = 10f64.powi(ROUNDING_DECIMALS);
    (value * factor).round() / factor
}

/// Point equality after rounding to [`ROUNDING_DECIMALS`] places.
pub(crate) fn same_point(a: Vec3, b: Vec3) -> bool {
    let (a, b) = (a.rounded(ROUNDING_DECIMALS), b.rounded(ROUNDING_DECIMALS));
    a.x == b.x && a.y == b.y
}
