//! Handing seam paths to the host for body authoring.

use tracing::{info, warn};

use crate::error::{BuildError, PathFailure, Result, SeamError};
use crate::line::Line;
use crate::pipeline::SeamPlan;
use crate::profile::SeamProfile;
use crate::settings::WeldLineSettings;

/// Host-side construction of one seam body per path.
///
/// Implementations typically sweep `profile` along `path` and add the
/// result to the target model.
pub trait WeldBodyBuilder {
    /// Handle of a created body.
    type Body;

    /// Build the body for one seam path.
    fn build_weld_body(
        &mut self,
        path: &Line,
        profile: &SeamProfile,
        settings: &WeldLineSettings,
    ) -> std::result::Result<Self::Body, BuildError>;
}

/// Build a body for every path in `plan`.
///
/// A failing path does not stop the others. If any failed, the error
/// lists each of them and how many bodies were built anyway.
pub fn build_weld_bodies<B: WeldBodyBuilder + ?Sized>(
    builder: &mut B,
    plan: &SeamPlan,
) -> Result<Vec<B::Body>> {
    let mut bodies = Vec::with_capacity(plan.paths.len());
    let mut failures = Vec::new();

    for (index, path) in plan.paths.iter().enumerate() {
        let built = SeamProfile::for_path(path, &plan.settings)
            .ok_or(BuildError::DegeneratePath)
            .and_then(|profile| builder.build_weld_body(path, &profile, &plan.settings));
        match built {
            Ok(body) => bodies.push(body),
            Err(error) => {
                warn!("Seam body {} failed: {}", index, error);
                failures.push(PathFailure { index, error });
            }
        }
    }

    info!("Built {} of {} seam bodies", bodies.len(), plan.paths.len());
    if failures.is_empty() {
        Ok(bodies)
    } else {
        Err(SeamError::Authoring {
            failures,
            built: bodies.len(),
        })
    }
}
