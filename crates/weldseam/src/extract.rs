//! Turning selected entities into line fragments in the target frame.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};
use weldseam_geom::{discretize, SamplingParams};
use weldseam_math::{FrameTransform, Point3};

use crate::error::{Result, SeamError};
use crate::line::Line;
use crate::model::{EntityId, EntityRef, FrameId, ModelAccess};
use crate::settings::WeldLineSettings;

/// Identity of a boundary edge: the same edge id in two frames is two edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EdgeKey {
    frame: FrameId,
    edge: EntityId,
}

/// Combine boundary edge sets so that an edge shared by two of them is dropped.
///
/// Sets are folded in order with symmetric difference. Each set is
/// deduplicated first, and the result keeps first-seen order.
fn unshared_edges(sets: Vec<Vec<EdgeKey>>) -> Vec<EdgeKey> {
    let mut kept: Vec<EdgeKey> = Vec::new();
    for set in sets {
        let mut seen = HashSet::new();
        let incoming: Vec<EdgeKey> = set.into_iter().filter(|k| seen.insert(*k)).collect();
        let existing: HashSet<EdgeKey> = kept.iter().copied().collect();
        kept.retain(|k| !seen.contains(k));
        kept.extend(incoming.into_iter().filter(|k| !existing.contains(k)));
    }
    kept
}

/// Reads entity geometry from a model and expresses it in the target frame.
///
/// Frame transforms are resolved once per frame and include the conversion
/// from the model's length unit into the settings' unit.
pub struct LineExtractor<'a, M: ModelAccess + ?Sized> {
    model: &'a M,
    sampling: SamplingParams,
    tolerance: f64,
    target: FrameId,
    unit_scale: f64,
    frames: HashMap<FrameId, FrameTransform>,
    skipped: Vec<SeamError>,
}

impl<'a, M: ModelAccess + ?Sized> LineExtractor<'a, M> {
    /// Create an extractor for `model` with the given settings.
    pub fn new(model: &'a M, settings: &WeldLineSettings) -> Self {
        Self {
            model,
            sampling: settings.sampling(),
            tolerance: settings.merge_tolerance,
            target: model.target_frame(),
            unit_scale: model.length_unit().factor_to(settings.unit),
            frames: HashMap::new(),
            skipped: Vec::new(),
        }
    }

    /// Curves that could not be discretized so far, one entry each.
    pub fn skipped(&self) -> &[SeamError] {
        &self.skipped
    }

    /// Take the skipped-curve report, leaving it empty.
    pub fn take_skipped(&mut self) -> Vec<SeamError> {
        std::mem::take(&mut self.skipped)
    }

    fn frame_transform(&mut self, frame: FrameId) -> Result<FrameTransform> {
        if let Some(t) = self.frames.get(&frame) {
            return Ok(*t);
        }
        let t = self
            .model
            .local_to_target_transform(frame, self.target)?
            .scaled(self.unit_scale);
        self.frames.insert(frame, t);
        Ok(t)
    }

    /// Locations of vertex and point entities in the target frame.
    pub fn marker_points(&mut self, markers: &[EntityRef]) -> Result<Vec<Point3>> {
        let mut points = Vec::with_capacity(markers.len());
        for marker in markers {
            let t = self.frame_transform(marker.frame)?;
            points.push(t.apply_point(&self.model.point_of(marker.id)?));
        }
        Ok(points)
    }

    /// Fragments of edges, segments and polylines, one per entity.
    ///
    /// Curves the discretizer rejects are logged, recorded in
    /// [`LineExtractor::skipped`] and left out.
    pub fn extract_curves(
        &mut self,
        curves: &[EntityRef],
        polylines: &[EntityRef],
    ) -> Result<Vec<Line>> {
        let mut lines = Vec::with_capacity(curves.len() + polylines.len());
        for entity in curves {
            lines.extend(self.curve_fragment(entity.id, entity.frame)?);
        }
        for entity in polylines {
            lines.extend(self.polyline_fragment(entity)?);
        }
        debug!(
            "Extracted {} fragments from {} curves and {} polylines",
            lines.len(),
            curves.len(),
            polylines.len()
        );
        Ok(lines)
    }

    /// Fragments of every edge bounding the given faces and sketches.
    ///
    /// An edge bounding two of the selected entities is left out, so two
    /// adjacent faces give their outer outline only.
    pub fn extract_boundaries(&mut self, boundaries: &[EntityRef]) -> Result<Vec<Line>> {
        let mut sets = Vec::with_capacity(boundaries.len());
        for entity in boundaries {
            let edges = self.model.boundary_edges_of(entity)?;
            debug!("Entity {} has {} boundary edges", entity.id, edges.len());
            sets.push(
                edges
                    .into_iter()
                    .map(|edge| EdgeKey {
                        frame: entity.frame,
                        edge,
                    })
                    .collect(),
            );
        }

        let edges = unshared_edges(sets);
        let mut lines = Vec::with_capacity(edges.len());
        for key in edges {
            lines.extend(self.curve_fragment(key.edge, key.frame)?);
        }
        Ok(lines)
    }

    fn curve_fragment(&mut self, id: EntityId, frame: FrameId) -> Result<Option<Line>> {
        let t = self.frame_transform(frame)?;
        let model = self.model;
        let curve = model.curve_of(id)?;
        match discretize(&*curve, &self.sampling, |p| t.apply_point(p)) {
            Ok(points) => Ok(Line::new(points, self.tolerance)),
            Err(source) => {
                let err = SeamError::UnsupportedCurve { entity: id, source };
                warn!("Skipping curve: {}", err);
                self.skipped.push(err);
                Ok(None)
            }
        }
    }

    fn polyline_fragment(&mut self, entity: &EntityRef) -> Result<Option<Line>> {
        let t = self.frame_transform(entity.frame)?;
        let points: Vec<Point3> = self
            .model
            .vertices_of(entity.id)?
            .iter()
            .map(|p| t.apply_point(p))
            .collect();
        let line = Line::new(points, self.tolerance);
        if line.is_none() {
            warn!("Polyline {} has fewer than two vertices", entity.id);
        }
        Ok(line)
    }
}
