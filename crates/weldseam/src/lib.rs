#![warn(missing_docs)]

//! Weld seam path synthesis.
//!
//! This crate turns a user's selection in a host CAD model (edges, sketch
//! segments, polylines, faces, sketches and marker points spread over
//! nested rigid bodies) into a small set of continuous seam paths in one
//! target frame, ready to have a bead profile swept along them.
//!
//! # Example
//!
//! ```ignore
//! use weldseam::{build_weld_bodies, plan_from_selection, WeldLineSettings};
//!
//! let model = // ... anything implementing ModelAccess
//! let settings = WeldLineSettings::for_diameter(6.0);
//! let plan = plan_from_selection(&model, &settings)?;
//!
//! println!("Seams: {}", plan.paths.len());
//! let bodies = build_weld_bodies(&mut host_builder, &plan)?;
//! ```

pub mod body;
pub mod error;
pub mod extract;
pub mod line;
pub mod memory;
pub mod model;
pub mod pipeline;
pub mod point_path;
pub mod profile;
pub mod settings;
pub mod stitch;

pub use body::{build_weld_bodies, WeldBodyBuilder};
pub use error::{BuildError, ModelError, PathFailure, Result, SeamError};
pub use extract::LineExtractor;
pub use line::Line;
pub use memory::MemoryModel;
pub use model::{EntityId, EntityKind, EntityRef, FrameId, ModelAccess, Route, Selection};
pub use pipeline::{plan_from_selection, synthesize_seam_paths, SeamPlan};
pub use point_path::construct_line;
pub use profile::SeamProfile;
pub use settings::{WeldLineConfig, WeldLineSettings, DEFAULT_DIAMETER};
pub use stitch::merge_lines;

pub use weldseam_geom::{CurveKind, ParametricCurve};
pub use weldseam_math::{FrameTransform, LengthUnit, Point3, Vec3};
