//! Seam cross-section placed at the start of a path.

use std::f64::consts::PI;

use weldseam_math::{align_frames, basis_from_normal, FrameTransform, Mat3, Point3, Vec3};

use crate::line::Line;
use crate::settings::WeldLineSettings;

/// Cross-section to sweep along a seam path.
///
/// The profile lies in its local XY plane; `placement` carries it to the
/// path's first point with the local Z axis along the first segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SeamProfile {
    /// Local profile frame to target frame.
    pub placement: FrameTransform,
    /// Bead radius.
    pub radius: f64,
    /// Polygon side count, 0 for a circle.
    pub sides: u32,
    /// Whether the path loops back to its start.
    pub closed: bool,
}

impl SeamProfile {
    /// Profile for `path`, or `None` when every point of the path coincides.
    pub fn for_path(path: &Line, settings: &WeldLineSettings) -> Option<Self> {
        let start = *path.start();
        let direction: Vec3 = path
            .points()
            .iter()
            .map(|p| *p - start)
            .find(|d| d.norm() > 1e-12)?;

        let plane = basis_from_normal(&direction);
        let orient = align_frames(&Mat3::identity(), &plane, &Point3::origin());
        let placement = orient.then(&FrameTransform::new(Mat3::identity(), start.coords));

        Some(Self {
            placement,
            radius: settings.radius(),
            sides: settings.profile_sides,
            closed: path.is_closed(),
        })
    }

    /// Anchor point of the profile.
    pub fn origin(&self) -> Point3 {
        Point3::from(self.placement.translation)
    }

    /// Unit normal of the profile plane.
    pub fn normal(&self) -> Vec3 {
        self.placement.apply_vec(&Vec3::z())
    }

    /// Outline of the profile in the target frame.
    ///
    /// A polygon profile gives its `sides` corners. A circular one is
    /// approximated by `circle_segments` points (at least 3).
    pub fn outline(&self, circle_segments: usize) -> Vec<Point3> {
        let n = if self.sides >= 3 {
            self.sides as usize
        } else {
            circle_segments.max(3)
        };
        (0..n)
            .map(|i| {
                let angle = 2.0 * PI * i as f64 / n as f64;
                let local = Point3::new(self.radius * angle.cos(), self.radius * angle.sin(), 0.0);
                self.placement.apply_point(&local)
            })
            .collect()
    }
}
