//! Error types for seam synthesis and body authoring.

use std::fmt;

use thiserror::Error;
use weldseam_geom::CurveError;

use crate::model::{EntityId, EntityKind, FrameId};

/// Failures reported by a [`ModelAccess`](crate::ModelAccess) host.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The host does not know this entity.
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    /// The host does not know this frame.
    #[error("unknown frame {0}")]
    UnknownFrame(FrameId),

    /// The entity exists but cannot answer this query.
    #[error("entity {id} is {kind:?} and has no {wanted}")]
    WrongKind {
        /// Entity that was queried.
        id: EntityId,
        /// Its actual kind.
        kind: EntityKind,
        /// What the caller asked for.
        wanted: &'static str,
    },

    /// A frame transform could not be resolved.
    #[error("frame {0} has a singular transform")]
    SingularFrame(FrameId),

    /// Any other failure inside the host application.
    #[error("host error: {0}")]
    Host(String),
}

/// Failure to author one seam body in the host.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    /// The path has no segment of non-zero length to orient a profile on.
    #[error("path has no non-degenerate segment")]
    DegeneratePath,

    /// The host rejected the sweep or body construction.
    #[error("host failed to build body: {0}")]
    Host(String),
}

/// A seam path whose body could not be built.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFailure {
    /// Index of the path in [`SeamPlan::paths`](crate::SeamPlan::paths).
    pub index: usize,
    /// Why the builder gave up on it.
    pub error: BuildError,
}

impl fmt::Display for PathFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path {}: {}", self.index, self.error)
    }
}

fn list_failures(failures: &[PathFailure]) -> String {
    failures
        .iter()
        .map(PathFailure::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur while synthesizing or authoring weld seams.
#[derive(Error, Debug)]
pub enum SeamError {
    /// The selection is empty.
    #[error("no entities selected")]
    NothingSelected,

    /// Every selected entity is of a kind seams cannot be built from.
    #[error("selection contains no supported entities ({ignored} ignored)")]
    NoSupportedEntities {
        /// Number of entities that were skipped.
        ignored: usize,
    },

    /// A curve could not be discretized; its fragment was skipped.
    #[error("unsupported curve on entity {entity}: {source}")]
    UnsupportedCurve {
        /// Entity owning the curve.
        entity: EntityId,
        /// What the discretizer rejected.
        #[source]
        source: CurveError,
    },

    /// Extraction and stitching left no path with at least two points.
    #[error("no seam geometry produced")]
    EmptyResult,

    /// Invalid weld line settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// The host model could not answer a query.
    #[error("model access failed: {0}")]
    Model(#[from] ModelError),

    /// Some seam bodies could not be built; the others were.
    #[error(
        "{} of {} seam bodies failed: {}",
        .failures.len(),
        .failures.len() + .built,
        list_failures(.failures)
    )]
    Authoring {
        /// Every path that failed, in path order.
        failures: Vec<PathFailure>,
        /// Number of bodies that were built.
        built: usize,
    },
}

/// Result type for seam operations.
pub type Result<T> = std::result::Result<T, SeamError>;
