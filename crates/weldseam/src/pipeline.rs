//! Seam path synthesis from a selection.

use tracing::{debug, info};

use crate::error::{Result, SeamError};
use crate::extract::LineExtractor;
use crate::line::Line;
use crate::model::{ModelAccess, Selection};
use crate::point_path::construct_line;
use crate::settings::WeldLineSettings;
use crate::stitch::merge_lines;

/// Seam paths ready for body authoring, with the settings that made them.
#[derive(Debug)]
pub struct SeamPlan {
    /// Continuous seam paths in the target frame, in `settings.unit`.
    pub paths: Vec<Line>,
    /// Settings used for synthesis, passed on to the body builder.
    pub settings: WeldLineSettings,
    /// Curves that were left out because they could not be sampled.
    pub skipped: Vec<SeamError>,
}

/// Read the model's current selection and synthesize seam paths from it.
pub fn plan_from_selection<M: ModelAccess + ?Sized>(
    model: &M,
    settings: &WeldLineSettings,
) -> Result<SeamPlan> {
    let selection = Selection::from_entities(model.selected_entities()?);
    synthesize_seam_paths(model, &selection, settings)
}

/// Synthesize continuous seam paths from a partitioned selection.
///
/// 1. Marker points (vertices, points) are moved into the target frame.
/// 2. Without any face or sketch selected, two or more markers are
///    ordered into one path.
/// 3. Face and sketch boundaries are extracted, with shared edges left
///    out, and stitched into loops. When markers were also selected,
///    only loops passing within the merge tolerance of a marker are kept.
/// 4. Edges, segments and polylines are extracted and stitched.
/// 5. Everything is stitched together once more.
///
/// Fails before touching any geometry when the selection is empty or
/// holds no supported entity, and after stitching when no path is left.
pub fn synthesize_seam_paths<M: ModelAccess + ?Sized>(
    model: &M,
    selection: &Selection,
    settings: &WeldLineSettings,
) -> Result<SeamPlan> {
    settings.validate()?;
    if selection.is_empty() {
        return Err(SeamError::NothingSelected);
    }
    if selection.supported_count() == 0 {
        return Err(SeamError::NoSupportedEntities {
            ignored: selection.ignored,
        });
    }

    let tol = settings.merge_tolerance;
    let mut extractor = LineExtractor::new(model, settings);
    let mut pool: Vec<Line> = Vec::new();

    let markers = extractor.marker_points(&selection.markers)?;

    if selection.boundaries.is_empty() && markers.len() >= 2 {
        pool.extend(Line::new(construct_line(&markers), tol));
    } else if selection.boundaries.is_empty() && !markers.is_empty() {
        debug!("A single marker point does not make a path");
    }

    if !selection.boundaries.is_empty() {
        let mut loops = merge_lines(extractor.extract_boundaries(&selection.boundaries)?, tol);
        if !markers.is_empty() {
            let before = loops.len();
            loops.retain(|chain| markers.iter().any(|m| chain.distance_to(m) <= tol));
            debug!("{} of {} boundary chains touch a marker", loops.len(), before);
        }
        pool.extend(loops);
    }

    let simple = extractor.extract_curves(&selection.curves, &selection.polylines)?;
    pool.extend(merge_lines(simple, tol));

    let paths = merge_lines(pool, tol);
    if paths.is_empty() {
        return Err(SeamError::EmptyResult);
    }
    info!("Synthesized {} continuous seams", paths.len());

    Ok(SeamPlan {
        paths,
        settings: settings.clone(),
        skipped: extractor.take_skipped(),
    })
}
