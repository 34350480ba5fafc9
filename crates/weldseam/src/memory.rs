//! In-memory model for hosts that snapshot their geometry, and for tests.

use std::collections::HashMap;

use weldseam_geom::{InUnit, ParametricCurve, Segment3d};
use weldseam_math::{FrameTransform, LengthUnit, Point3};

use crate::error::ModelError;
use crate::model::{EntityId, EntityKind, EntityRef, FrameId, ModelAccess};

#[derive(Debug)]
struct FrameNode {
    parent: Option<FrameId>,
    /// Pose relative to `parent`.
    pose: FrameTransform,
}

#[derive(Debug)]
enum Geometry {
    Curve(Box<dyn ParametricCurve>),
    Polyline(Vec<Point3>),
    Boundary(Vec<EntityId>),
    Point(Point3),
    Nothing,
}

#[derive(Debug)]
struct Stored {
    entity: EntityRef,
    geometry: Geometry,
}

/// A model held entirely in memory.
///
/// Frames form a tree under [`MemoryModel::root`], which is also the
/// target frame. Entities are selected explicitly with
/// [`MemoryModel::select`].
#[derive(Debug)]
pub struct MemoryModel {
    unit: LengthUnit,
    frames: HashMap<FrameId, FrameNode>,
    entities: HashMap<EntityId, Stored>,
    selection: Vec<EntityRef>,
    next_id: u64,
}

impl Default for MemoryModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryModel {
    /// Empty model in millimeters.
    pub fn new() -> Self {
        Self::with_unit(LengthUnit::Millimeter)
    }

    /// Empty model reporting lengths in `unit`.
    pub fn with_unit(unit: LengthUnit) -> Self {
        let mut frames = HashMap::new();
        frames.insert(
            FrameId(0),
            FrameNode {
                parent: None,
                pose: FrameTransform::identity(),
            },
        );
        Self {
            unit,
            frames,
            entities: HashMap::new(),
            selection: Vec::new(),
            next_id: 1,
        }
    }

    /// The top-level frame.
    pub fn root(&self) -> FrameId {
        FrameId(0)
    }

    fn next(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a frame posed at `pose` inside `parent`.
    pub fn add_frame(&mut self, parent: FrameId, pose: FrameTransform) -> FrameId {
        let id = FrameId(self.next());
        self.frames.insert(
            id,
            FrameNode {
                parent: Some(parent),
                pose,
            },
        );
        id
    }

    fn insert(&mut self, frame: FrameId, kind: EntityKind, geometry: Geometry) -> EntityRef {
        let entity = EntityRef::new(EntityId(self.next()), kind, frame);
        self.entities.insert(entity.id, Stored { entity, geometry });
        entity
    }

    /// Add a B-rep edge backed by `curve`.
    pub fn add_edge(&mut self, frame: FrameId, curve: impl ParametricCurve + 'static) -> EntityRef {
        self.insert(frame, EntityKind::Edge, Geometry::Curve(Box::new(curve)))
    }

    /// Add a sketch segment.
    pub fn add_segment(&mut self, frame: FrameId, segment: Segment3d) -> EntityRef {
        self.insert(frame, EntityKind::Segment, Geometry::Curve(Box::new(segment)))
    }

    /// Add a polyline with the given vertices.
    pub fn add_polyline(&mut self, frame: FrameId, vertices: Vec<Point3>) -> EntityRef {
        self.insert(frame, EntityKind::Polyline, Geometry::Polyline(vertices))
    }

    /// Add a face bounded by previously added edges.
    pub fn add_face(&mut self, frame: FrameId, edges: Vec<EntityId>) -> EntityRef {
        self.insert(frame, EntityKind::FaceBoundary, Geometry::Boundary(edges))
    }

    /// Add a sketch made of previously added edges or segments.
    pub fn add_sketch(&mut self, frame: FrameId, edges: Vec<EntityId>) -> EntityRef {
        self.insert(frame, EntityKind::SketchBoundary, Geometry::Boundary(edges))
    }

    /// Add a B-rep vertex.
    pub fn add_vertex(&mut self, frame: FrameId, point: Point3) -> EntityRef {
        self.insert(frame, EntityKind::Vertex, Geometry::Point(point))
    }

    /// Add a standalone construction point.
    pub fn add_point(&mut self, frame: FrameId, point: Point3) -> EntityRef {
        self.insert(frame, EntityKind::Point, Geometry::Point(point))
    }

    /// Add an entity of a kind seams cannot be built from.
    pub fn add_other(&mut self, frame: FrameId) -> EntityRef {
        self.insert(frame, EntityKind::Other, Geometry::Nothing)
    }

    /// Append an entity to the selection.
    pub fn select(&mut self, entity: EntityRef) {
        self.selection.push(entity);
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn stored(&self, id: EntityId) -> Result<&Stored, ModelError> {
        self.entities.get(&id).ok_or(ModelError::UnknownEntity(id))
    }

    fn wrong_kind(stored: &Stored, wanted: &'static str) -> ModelError {
        ModelError::WrongKind {
            id: stored.entity.id,
            kind: stored.entity.kind,
            wanted,
        }
    }

    /// Pose of `frame` in the root frame.
    fn to_root(&self, frame: FrameId) -> Result<FrameTransform, ModelError> {
        let mut levels = Vec::new();
        let mut current = Some(frame);
        while let Some(id) = current {
            let node = self.frames.get(&id).ok_or(ModelError::UnknownFrame(id))?;
            if levels.len() > self.frames.len() {
                return Err(ModelError::Host(format!("{frame} has a cyclic parent chain")));
            }
            levels.push(node.pose);
            current = node.parent;
        }
        Ok(FrameTransform::chain(&levels))
    }
}

impl ModelAccess for MemoryModel {
    fn selected_entities(&self) -> Result<Vec<EntityRef>, ModelError> {
        Ok(self.selection.clone())
    }

    fn curve_of(&self, id: EntityId) -> Result<Box<dyn ParametricCurve + '_>, ModelError> {
        let stored = self.stored(id)?;
        match &stored.geometry {
            Geometry::Curve(curve) => Ok(Box::new(InUnit::new(&**curve, self.unit))),
            _ => Err(Self::wrong_kind(stored, "curve")),
        }
    }

    fn vertices_of(&self, id: EntityId) -> Result<Vec<Point3>, ModelError> {
        let stored = self.stored(id)?;
        match &stored.geometry {
            Geometry::Polyline(points) => Ok(points.clone()),
            _ => Err(Self::wrong_kind(stored, "vertices")),
        }
    }

    fn boundary_edges_of(&self, entity: &EntityRef) -> Result<Vec<EntityId>, ModelError> {
        let stored = self.stored(entity.id)?;
        match &stored.geometry {
            Geometry::Boundary(edges) => Ok(edges.clone()),
            _ => Err(Self::wrong_kind(stored, "boundary edges")),
        }
    }

    fn point_of(&self, id: EntityId) -> Result<Point3, ModelError> {
        let stored = self.stored(id)?;
        match &stored.geometry {
            Geometry::Point(point) => Ok(*point),
            _ => Err(Self::wrong_kind(stored, "location")),
        }
    }

    fn local_to_target_transform(
        &self,
        frame: FrameId,
        target: FrameId,
    ) -> Result<FrameTransform, ModelError> {
        let local = self.to_root(frame)?;
        if target == self.root() {
            return Ok(local);
        }
        let target_inv = self
            .to_root(target)?
            .inverse()
            .ok_or(ModelError::SingularFrame(target))?;
        Ok(local.then(&target_inv))
    }

    fn target_frame(&self) -> FrameId {
        self.root()
    }

    fn length_unit(&self) -> LengthUnit {
        self.unit
    }
}
