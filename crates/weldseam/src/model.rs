//! Entity handles and the host model interface.
//!
//! The core never owns geometry. It reads curves, polyline vertices,
//! boundary edges and marker points from a host through [`ModelAccess`],
//! always in the entity's local frame, and asks the host how each local
//! frame sits inside the target frame.

use std::fmt;

use tracing::warn;
use weldseam_geom::ParametricCurve;
use weldseam_math::{FrameTransform, LengthUnit, Point3};

use crate::error::ModelError;

/// Opaque handle to a host entity (edge, face, point, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque handle to a rigid body's local coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame {}", self.0)
    }
}

/// What a selected entity is, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A B-rep edge backed by a parametric curve.
    Edge,
    /// A sketch segment backed by a parametric curve.
    Segment,
    /// An existing polyline with stored vertices.
    Polyline,
    /// A face; its bounding edges are used.
    FaceBoundary,
    /// A sketch; every edge authored in it is used.
    SketchBoundary,
    /// A B-rep vertex.
    Vertex,
    /// A standalone construction point.
    Point,
    /// Anything seams cannot be built from.
    Other,
}

/// How the pipeline turns an entity of some kind into seam geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Discretize the entity's curve.
    Curve,
    /// Read the entity's stored vertices.
    Polyline,
    /// Discretize every bounding edge, with shared edges removed.
    Boundary,
    /// A marker point for point paths and boundary filtering.
    Marker,
    /// Not used.
    Ignored,
}

impl EntityKind {
    /// Extraction route for this kind.
    pub fn route(self) -> Route {
        match self {
            EntityKind::Edge | EntityKind::Segment => Route::Curve,
            EntityKind::Polyline => Route::Polyline,
            EntityKind::FaceBoundary | EntityKind::SketchBoundary => Route::Boundary,
            EntityKind::Vertex | EntityKind::Point => Route::Marker,
            EntityKind::Other => Route::Ignored,
        }
    }
}

/// A selected entity: handle, kind and the frame its geometry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRef {
    /// Host handle.
    pub id: EntityId,
    /// Kind tag.
    pub kind: EntityKind,
    /// Frame of the owning rigid body.
    pub frame: FrameId,
}

impl EntityRef {
    /// Create an entity reference.
    pub fn new(id: EntityId, kind: EntityKind, frame: FrameId) -> Self {
        Self { id, kind, frame }
    }
}

/// Read-only access to the host model.
///
/// Geometry is returned in the owning entity's local frame and in
/// [`ModelAccess::length_unit`].
pub trait ModelAccess {
    /// Entities currently selected by the user, in selection order.
    fn selected_entities(&self) -> Result<Vec<EntityRef>, ModelError>;

    /// Underlying curve of an edge or segment.
    fn curve_of(&self, id: EntityId) -> Result<Box<dyn ParametricCurve + '_>, ModelError>;

    /// Ordered vertices of a polyline.
    fn vertices_of(&self, id: EntityId) -> Result<Vec<Point3>, ModelError>;

    /// Edges bounding a face, or authored in a sketch.
    ///
    /// The edges live in the same frame as `entity`.
    fn boundary_edges_of(&self, entity: &EntityRef) -> Result<Vec<EntityId>, ModelError>;

    /// Location of a vertex or standalone point.
    fn point_of(&self, id: EntityId) -> Result<Point3, ModelError>;

    /// Pose of `frame` expressed in `target`, all nesting levels composed.
    fn local_to_target_transform(
        &self,
        frame: FrameId,
        target: FrameId,
    ) -> Result<FrameTransform, ModelError>;

    /// Frame the seams are built in (usually the top-level assembly).
    fn target_frame(&self) -> FrameId;

    /// Unit of every length and coordinate the host reports.
    fn length_unit(&self) -> LengthUnit {
        LengthUnit::Millimeter
    }
}

/// A selection partitioned by extraction route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Edges and segments.
    pub curves: Vec<EntityRef>,
    /// Polylines.
    pub polylines: Vec<EntityRef>,
    /// Faces and sketches.
    pub boundaries: Vec<EntityRef>,
    /// Vertices and standalone points.
    pub markers: Vec<EntityRef>,
    /// Number of entities of unsupported kinds.
    pub ignored: usize,
}

impl Selection {
    /// Partition entities by [`EntityKind::route`], keeping their order.
    pub fn from_entities(entities: impl IntoIterator<Item = EntityRef>) -> Self {
        let mut selection = Self::default();
        for entity in entities {
            match entity.kind.route() {
                Route::Curve => selection.curves.push(entity),
                Route::Polyline => selection.polylines.push(entity),
                Route::Boundary => selection.boundaries.push(entity),
                Route::Marker => selection.markers.push(entity),
                Route::Ignored => {
                    warn!("Ignoring entity {} of unsupported kind", entity.id);
                    selection.ignored += 1;
                }
            }
        }
        selection
    }

    /// Number of entities seams can be built from.
    pub fn supported_count(&self) -> usize {
        self.curves.len() + self.polylines.len() + self.boundaries.len() + self.markers.len()
    }

    /// True when nothing at all was selected.
    pub fn is_empty(&self) -> bool {
        self.supported_count() == 0 && self.ignored == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: u64, kind: EntityKind) -> EntityRef {
        EntityRef::new(EntityId(id), kind, FrameId(0))
    }

    #[test]
    fn test_routes() {
        assert_eq!(EntityKind::Edge.route(), Route::Curve);
        assert_eq!(EntityKind::Segment.route(), Route::Curve);
        assert_eq!(EntityKind::Polyline.route(), Route::Polyline);
        assert_eq!(EntityKind::FaceBoundary.route(), Route::Boundary);
        assert_eq!(EntityKind::SketchBoundary.route(), Route::Boundary);
        assert_eq!(EntityKind::Vertex.route(), Route::Marker);
        assert_eq!(EntityKind::Point.route(), Route::Marker);
        assert_eq!(EntityKind::Other.route(), Route::Ignored);
    }

    #[test]
    fn test_selection_partition() {
        let selection = Selection::from_entities([
            entity(1, EntityKind::Edge),
            entity(2, EntityKind::Point),
            entity(3, EntityKind::Other),
            entity(4, EntityKind::FaceBoundary),
            entity(5, EntityKind::Segment),
            entity(6, EntityKind::Polyline),
        ]);
        let ids = |v: &[EntityRef]| v.iter().map(|e| e.id.0).collect::<Vec<_>>();
        assert_eq!(ids(&selection.curves), vec![1, 5]);
        assert_eq!(ids(&selection.polylines), vec![6]);
        assert_eq!(ids(&selection.boundaries), vec![4]);
        assert_eq!(ids(&selection.markers), vec![2]);
        assert_eq!(selection.ignored, 1);
        assert_eq!(selection.supported_count(), 5);
        assert!(!selection.is_empty());
    }

    #[test]
    fn test_empty_and_unsupported_only() {
        assert!(Selection::from_entities(Vec::<EntityRef>::new()).is_empty());

        let only_other = Selection::from_entities([entity(1, EntityKind::Other)]);
        assert!(!only_other.is_empty());
        assert_eq!(only_other.supported_count(), 0);
    }
}
