//! The world: an insertion-ordered store of named geometric objects.
//!
//! Wireframes and curves are collected point by point in a [`PointBuffer`]
//! and only enter the world on commit, which is where validation happens.

use tracing::info;

use crate::error::{Result, ViewError};
use crate::geometry::{GeometricObject, Geometry, ObjectId, PlotMethod, Position};

#[derive(Debug, Default)]
pub struct World {
    objects: Vec<GeometricObject>,
    next_id: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `geometry` and appends it under a fresh id.
    pub fn add(&mut self, name: impl Into<String>, color: u32, geometry: Geometry) -> Result<ObjectId> {
        geometry.validate()?;

        let id = ObjectId(self.next_id);
        self.next_id += 1;
        let object = GeometricObject::new(id, name.into(), color, geometry);
        info!(%id, name = object.name(), kind = %object.kind(), "object added");
        self.objects.push(object);
        Ok(id)
    }

    pub fn remove(&mut self, id: ObjectId) -> Result<GeometricObject> {
        let index = self
            .objects
            .iter()
            .position(|o| o.id() == id)
            .ok_or(ViewError::ObjectNotFound(id))?;
        let object = self.objects.remove(index);
        info!(%id, name = object.name(), "object removed");
        Ok(object)
    }

    pub fn get(&self, id: ObjectId) -> Option<&GeometricObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GeometricObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    /// First object with the given name. Names are not unique; prefer [`World::get`].
    pub fn find_by_name(&self, name: &str) -> Option<&GeometricObject> {
        self.objects.iter().find(|o| o.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeometricObject> {
        self.objects.iter()
    }

    pub fn objects(&self) -> &[GeometricObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

/// What a [`PointBuffer`] turns into on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    Wireframe { filled: bool },
    Curve(PlotMethod),
}

/// Temporary point buffer for objects built one point at a time.
#[derive(Debug, Clone)]
pub struct PointBuffer {
    target: BufferTarget,
    points: Vec<Position>,
}

impl PointBuffer {
    pub fn wireframe(filled: bool) -> Self {
        Self {
            target: BufferTarget::Wireframe { filled },
            points: Vec::new(),
        }
    }

    pub fn curve(method: PlotMethod) -> Self {
        Self {
            target: BufferTarget::Curve(method),
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, point: Position) -> &mut Self {
        self.points.push(point);
        self
    }

    pub fn extend(&mut self, points: impl IntoIterator<Item = Position>) -> &mut Self {
        self.points.extend(points);
        self
    }

    pub fn points(&self) -> &[Position] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }

    /// The geometry this buffer would commit as. Not validated.
    pub fn to_geometry(&self) -> Geometry {
        match self.target {
            BufferTarget::Wireframe { filled } => Geometry::Wireframe {
                points: self.points.clone(),
                faces: None,
                filled,
            },
            BufferTarget::Curve(method) => Geometry::Curve {
                control: self.points.clone(),
                method,
            },
        }
    }

    /// Moves the buffered points into `world`. On failure the buffer is kept
    /// so more points can be added.
    pub fn commit(&mut self, world: &mut World, name: impl Into<String>, color: u32) -> Result<ObjectId> {
        let id = world.add(name, color, self.to_geometry())?;
        self.points.clear();
        Ok(id)
    }
}
