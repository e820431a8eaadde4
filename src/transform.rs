//! Affine transform engine.
//!
//! Provides the primitive [`Transform`]s (translation, scale, rotation about
//! one axis), the composed [`AffineTransform`] with a fluent builder API,
//! and the object-level [`ObjectTransform`] commands.
//!
//! All matrices follow the row-vector convention of [`Mat4`]: a composed
//! transform applies its parts in the order they were added.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewError};
use crate::geometry::Position;
use crate::math::{Mat4, Vec3};

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Unit vector along the axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

impl FromStr for Axis {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            _ => Err(ViewError::unrecognized("axis", s)),
        }
    }
}

/// A primitive transform about the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Translation(Vec3),
    Scale(Vec3),
    /// Counter-clockwise rotation in degrees.
    Rotation { degrees: f64, axis: Axis },
    Matrix(Mat4),
}

impl Transform {
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Transform::Translation(Vec3::new(x, y, z))
    }

    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        Transform::Scale(Vec3::new(x, y, z))
    }

    pub fn rotation(degrees: f64, axis: Axis) -> Self {
        Transform::Rotation { degrees, axis }
    }

    /// The homogeneous 4x4 matrix of this transform.
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Transform::Translation(t) => Mat4::translation(t.x, t.y, t.z),
            Transform::Scale(s) => Mat4::scaling(s.x, s.y, s.z),
            Transform::Rotation { degrees, axis } => {
                let radians = degrees.to_radians();
                match axis {
                    Axis::X => Mat4::rotation_x(radians),
                    Axis::Y => Mat4::rotation_y(radians),
                    Axis::Z => Mat4::rotation_z(radians),
                }
            }
            Transform::Matrix(m) => m,
        }
    }
}

/// Multiplies the transforms together in application order.
pub fn compose(transforms: &[Transform]) -> Mat4 {
    transforms
        .iter()
        .fold(Mat4::identity(), |acc, t| acc * t.matrix())
}

/// Rotation about an axis-parallel line through `center`:
/// `Translate(-center) -> Rotate -> Translate(+center)`.
pub fn rotation_about_center(center: Vec3, degrees: f64, axis: Axis) -> Mat4 {
    compose(&[
        Transform::Translation(-center),
        Transform::rotation(degrees, axis),
        Transform::Translation(center),
    ])
}

/// Scale about `center` instead of the origin.
pub fn scale_about_center(center: Vec3, factors: Vec3) -> Mat4 {
    compose(&[
        Transform::Translation(-center),
        Transform::Scale(factors),
        Transform::Translation(center),
    ])
}

/// Rotation about the arbitrary line through `anchor` along `direction`.
pub fn rotation_about_axis(anchor: Vec3, direction: Vec3, degrees: f64) -> Result<Mat4> {
    Mat4::rotation_about_axis(anchor, direction, degrees.to_radians()).ok_or_else(|| {
        ViewError::Validation("rotation axis direction has zero length".into())
    })
}

/// A composed matrix together with the positions it applies to.
///
/// Provides a fluent API where each step is appended after the previous ones:
///
/// ```ignore
/// let moved = AffineTransform::new(points)
///     .then(Transform::translation(5.0, 2.0, 0.0))
///     .then(Transform::rotation(90.0, Axis::Z))
///     .apply();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AffineTransform {
    matrix: Mat4,
    positions: Vec<Position>,
}

impl AffineTransform {
    /// Identity transform over `positions`.
    pub fn new(positions: Vec<Position>) -> Self {
        Self {
            matrix: Mat4::identity(),
            positions,
        }
    }

    /// Transform with a precomputed matrix.
    pub fn from_matrix(matrix: Mat4, positions: Vec<Position>) -> Self {
        Self { matrix, positions }
    }

    /// Append `transform` after everything already composed.
    pub fn then(mut self, transform: Transform) -> Self {
        self.matrix = self.matrix * transform.matrix();
        self
    }

    /// Append several transforms in order.
    pub fn then_all(mut self, transforms: &[Transform]) -> Self {
        self.matrix = self.matrix * compose(transforms);
        self
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Applies the composed matrix to the stored positions, returning new ones.
    pub fn apply(&self) -> Vec<Position> {
        self.apply_to(&self.positions)
    }

    /// Applies the composed matrix to arbitrary positions.
    pub fn apply_to(&self, positions: &[Position]) -> Vec<Position> {
        positions
            .iter()
            .map(|p| self.matrix.transform_point(*p))
            .collect()
    }

    /// The inverse transform over the same positions.
    pub fn inverse(&self) -> Result<Self> {
        let matrix = self.matrix.inverse().ok_or(ViewError::SingularTransform)?;
        Ok(Self {
            matrix,
            positions: self.positions.clone(),
        })
    }
}

/// How an object rotation chooses its pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationType {
    WorldCenter,
    ObjectCenter,
    ArbitraryPoint,
    ArbitraryAxis,
}

impl FromStr for RotationType {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "world_center" => Ok(RotationType::WorldCenter),
            "object_center" => Ok(RotationType::ObjectCenter),
            "arbitrary_point" => Ok(RotationType::ArbitraryPoint),
            "arbitrary_axis" => Ok(RotationType::ArbitraryAxis),
            _ => Err(ViewError::unrecognized("rotation type", s)),
        }
    }
}

/// Pivot of an object rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationPivot {
    WorldCenter { axis: Axis },
    ObjectCenter { axis: Axis },
    Point { point: Vec3, axis: Axis },
    Axis { anchor: Vec3, direction: Vec3 },
}

impl RotationPivot {
    /// Builds a pivot from a rotation type identifier and its parameters.
    ///
    /// `point` is the fixed point for `ArbitraryPoint` and the anchor for
    /// `ArbitraryAxis`; `direction` is only used by `ArbitraryAxis`.
    pub fn from_type(kind: RotationType, axis: Axis, point: Vec3, direction: Vec3) -> Self {
        match kind {
            RotationType::WorldCenter => RotationPivot::WorldCenter { axis },
            RotationType::ObjectCenter => RotationPivot::ObjectCenter { axis },
            RotationType::ArbitraryPoint => RotationPivot::Point { point, axis },
            RotationType::ArbitraryAxis => RotationPivot::Axis {
                anchor: point,
                direction,
            },
        }
    }
}

/// A transform command applied to a stored object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectTransform {
    Translate(Vec3),
    /// Scale about the object's own center.
    Scale(Vec3),
    Rotate { degrees: f64, pivot: RotationPivot },
}

impl ObjectTransform {
    /// The matrix for an object whose center is `object_center`.
    pub fn matrix(&self, object_center: Vec3) -> Result<Mat4> {
        match *self {
            ObjectTransform::Translate(t) => Ok(Transform::Translation(t).matrix()),
            ObjectTransform::Scale(factors) => Ok(scale_about_center(object_center, factors)),
            ObjectTransform::Rotate { degrees, pivot } => match pivot {
                RotationPivot::WorldCenter { axis } => {
                    Ok(Transform::rotation(degrees, axis).matrix())
                }
                RotationPivot::ObjectCenter { axis } => {
                    Ok(rotation_about_center(object_center, degrees, axis))
                }
                RotationPivot::Point { point, axis } => {
                    Ok(rotation_about_center(point, degrees, axis))
                }
                RotationPivot::Axis { anchor, direction } => {
                    rotation_about_axis(anchor, direction, degrees)
                }
            },
        }
    }
}
