//! Typed geometric primitives stored in the world.
//!
//! Every object carries its control data only: a curve stores its control
//! points and plotting method, a surface its 4x4 control grids. Dense point
//! sets are produced per frame by [`crate::tessellate`] and never stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewError};
use crate::math::{Mat4, Vec3};

/// World-space position.
pub type Position = Vec3;

/// Control points required by a single surface patch.
pub const SURFACE_PATCH_POINTS: usize = 16;

/// Control points required before a curve may be committed.
pub const MIN_CURVE_POINTS: usize = 4;

/// Unique identifier assigned by the [`crate::world::World`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Curve plotting methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotMethod {
    Hermite,
    #[default]
    Bezier,
    BSpline,
}

impl fmt::Display for PlotMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotMethod::Hermite => write!(f, "hermite"),
            PlotMethod::Bezier => write!(f, "bezier"),
            PlotMethod::BSpline => write!(f, "b_spline"),
        }
    }
}

impl FromStr for PlotMethod {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hermite" => Ok(PlotMethod::Hermite),
            "bezier" => Ok(PlotMethod::Bezier),
            "b_spline" | "bspline" | "b-spline" => Ok(PlotMethod::BSpline),
            _ => Err(ViewError::unrecognized("plot method", s)),
        }
    }
}

/// Type tag the renderer dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Point,
    Line,
    Wireframe,
    Curve,
    Surface,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Point => write!(f, "point"),
            ObjectKind::Line => write!(f, "line"),
            ObjectKind::Wireframe => write!(f, "wireframe"),
            ObjectKind::Curve => write!(f, "curve"),
            ObjectKind::Surface => write!(f, "surface"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Position),
    Line(Position, Position),
    /// Closed polygon, or a 3D mesh when `faces` is present.
    /// Faces are zero-based vertex index loops.
    Wireframe {
        points: Vec<Position>,
        faces: Option<Vec<Vec<usize>>>,
        filled: bool,
    },
    Curve {
        control: Vec<Position>,
        method: PlotMethod,
    },
    /// One bicubic Bézier patch per block of 16 row-major control points.
    Surface {
        control: Vec<Position>,
        filled: bool,
    },
}

impl Geometry {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Geometry::Point(_) => ObjectKind::Point,
            Geometry::Line(..) => ObjectKind::Line,
            Geometry::Wireframe { .. } => ObjectKind::Wireframe,
            Geometry::Curve { .. } => ObjectKind::Curve,
            Geometry::Surface { .. } => ObjectKind::Surface,
        }
    }

    pub fn is_filled(&self) -> bool {
        match self {
            Geometry::Wireframe { filled, .. } | Geometry::Surface { filled, .. } => *filled,
            _ => false,
        }
    }

    /// Control or vertex points, in storage order.
    pub fn positions(&self) -> Vec<Position> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::Line(a, b) => vec![*a, *b],
            Geometry::Wireframe { points, .. } => points.clone(),
            Geometry::Curve { control, .. } | Geometry::Surface { control, .. } => control.clone(),
        }
    }

    /// Arithmetic mean of the control/vertex points.
    pub fn center(&self) -> Position {
        Vec3::centroid(&self.positions()).unwrap_or(Vec3::ZERO)
    }

    /// Returns a copy with every control/vertex point mapped through `f`.
    pub fn map_positions(&self, f: impl Fn(Position) -> Position) -> Geometry {
        match self {
            Geometry::Point(p) => Geometry::Point(f(*p)),
            Geometry::Line(a, b) => Geometry::Line(f(*a), f(*b)),
            Geometry::Wireframe {
                points,
                faces,
                filled,
            } => Geometry::Wireframe {
                points: points.iter().map(|p| f(*p)).collect(),
                faces: faces.clone(),
                filled: *filled,
            },
            Geometry::Curve { control, method } => Geometry::Curve {
                control: control.iter().map(|p| f(*p)).collect(),
                method: *method,
            },
            Geometry::Surface { control, filled } => Geometry::Surface {
                control: control.iter().map(|p| f(*p)).collect(),
                filled: *filled,
            },
        }
    }

    /// Returns a copy transformed by `matrix`.
    pub fn transformed(&self, matrix: &Mat4) -> Geometry {
        self.map_positions(|p| matrix.transform_point(p))
    }

    /// Commit-time validation.
    pub fn validate(&self) -> Result<()> {
        match self {
            Geometry::Point(_) | Geometry::Line(..) => Ok(()),
            Geometry::Wireframe { points, faces, .. } => {
                if points.is_empty() {
                    return Err(ViewError::Validation(
                        "wireframe needs at least one point".into(),
                    ));
                }
                if let Some(faces) = faces {
                    for face in faces {
                        if let Some(bad) = face.iter().find(|&&i| i >= points.len()) {
                            return Err(ViewError::Validation(format!(
                                "face index {} out of range for {} vertices",
                                bad,
                                points.len()
                            )));
                        }
                    }
                }
                Ok(())
            }
            Geometry::Curve { control, .. } => {
                if control.len() < MIN_CURVE_POINTS {
                    return Err(ViewError::Validation(format!(
                        "curve needs at least {} control points, got {}",
                        MIN_CURVE_POINTS,
                        control.len()
                    )));
                }
                Ok(())
            }
            Geometry::Surface { control, .. } => {
                if control.is_empty() || control.len() % SURFACE_PATCH_POINTS != 0 {
                    return Err(ViewError::Validation(format!(
                        "surface needs control points in multiples of {}, got {}",
                        SURFACE_PATCH_POINTS,
                        control.len()
                    )));
                }
                Ok(())
            }
        }
    }
}

/// A named, colored object in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometricObject {
    id: ObjectId,
    name: String,
    color: u32,
    geometry: Geometry,
}

impl GeometricObject {
    pub(crate) fn new(id: ObjectId, name: String, color: u32, geometry: Geometry) -> Self {
        Self {
            id,
            name,
            color,
            geometry,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn set_color(&mut self, color: u32) {
        self.color = color;
    }

    pub fn kind(&self) -> ObjectKind {
        self.geometry.kind()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub(crate) fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    pub fn center(&self) -> Position {
        self.geometry.center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_needs_four_points() {
        let curve = Geometry::Curve {
            control: vec![Vec3::ZERO; 3],
            method: PlotMethod::Bezier,
        };
        assert!(matches!(curve.validate(), Err(ViewError::Validation(_))));

        let curve = Geometry::Curve {
            control: vec![Vec3::ZERO; 4],
            method: PlotMethod::Bezier,
        };
        assert!(curve.validate().is_ok());
    }

    #[test]
    fn surface_needs_multiples_of_sixteen() {
        for (count, ok) in [(0, false), (15, false), (16, true), (20, false), (32, true)] {
            let surface = Geometry::Surface {
                control: vec![Vec3::ZERO; count],
                filled: false,
            };
            assert_eq!(surface.validate().is_ok(), ok, "{} control points", count);
        }
    }

    #[test]
    fn wireframe_faces_must_reference_vertices() {
        let mesh = Geometry::Wireframe {
            points: vec![Vec3::ZERO; 3],
            faces: Some(vec![vec![0, 1, 3]]),
            filled: false,
        };
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn plot_method_parses_identifiers() {
        assert_eq!("bezier".parse::<PlotMethod>().unwrap(), PlotMethod::Bezier);
        assert_eq!("B-Spline".parse::<PlotMethod>().unwrap(), PlotMethod::BSpline);
        assert!(matches!(
            "nurbs".parse::<PlotMethod>(),
            Err(ViewError::UnrecognizedEnum { .. })
        ));
    }

    #[test]
    fn map_positions_leaves_original_untouched() {
        let line = Geometry::Line(Vec3::xy(0.0, 0.0), Vec3::xy(1.0, 1.0));
        let moved = line.map_positions(|p| p + Vec3::xy(10.0, 0.0));
        assert_eq!(line, Geometry::Line(Vec3::xy(0.0, 0.0), Vec3::xy(1.0, 1.0)));
        assert_eq!(moved, Geometry::Line(Vec3::xy(10.0, 0.0), Vec3::xy(11.0, 1.0)));
    }

    #[test]
    fn center_is_mean_of_points() {
        let square = Geometry::Wireframe {
            points: vec![
                Vec3::xy(0.0, 0.0),
                Vec3::xy(0.0, 4.0),
                Vec3::xy(4.0, 4.0),
                Vec3::xy(4.0, 0.0),
            ],
            faces: None,
            filled: true,
        };
        assert_eq!(square.center(), Vec3::xy(2.0, 2.0));
        assert!(square.is_filled());
    }
}
