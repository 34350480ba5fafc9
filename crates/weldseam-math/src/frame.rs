//! Rigid frame transforms and frame alignment.

use std::f64::consts::PI;

use crate::{
    axis_angle_between, basis_columns, project_onto_plane, rotation_about_axis, Dir3, Mat3,
    Point3, Vec3,
};

/// Pose of a local frame relative to a parent frame.
///
/// Maps a local point into the parent as `p_parent = rotation · p_local + translation`.
/// `rotation` is orthonormal except after [`FrameTransform::scaled`], which
/// folds a uniform unit conversion into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    /// Linear part: the local axes expressed in the parent frame, as columns.
    pub rotation: Mat3,
    /// Position of the local origin in the parent frame.
    pub translation: Vec3,
}

impl FrameTransform {
    /// Identity transform (frame aligned with its parent).
    pub fn identity() -> Self {
        Self {
            rotation: Mat3::identity(),
            translation: Vec3::zeros(),
        }
    }

    /// Transform from a rotation and a translation.
    pub fn new(rotation: Mat3, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Pure translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(Mat3::identity(), Vec3::new(dx, dy, dz))
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        Point3::from(self.rotation * p.coords + self.translation)
    }

    /// Transform a direction vector (ignores translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        self.rotation * v
    }

    /// Compose: apply `self` first, then `outer`.
    ///
    /// `self` is the inner nesting level (local → parent) and `outer` the
    /// next one up (parent → grandparent).
    pub fn then(&self, outer: &FrameTransform) -> Self {
        Self {
            rotation: outer.rotation * self.rotation,
            translation: outer.rotation * self.translation + outer.translation,
        }
    }

    /// Collapse a chain of nesting levels, innermost first, into one transform.
    pub fn chain<'a>(levels: impl IntoIterator<Item = &'a FrameTransform>) -> Self {
        levels
            .into_iter()
            .fold(Self::identity(), |acc, level| acc.then(level))
    }

    /// Scale the output uniformly, e.g. to convert between length units.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            rotation: self.rotation * factor,
            translation: self.translation * factor,
        }
    }

    /// Inverse of this transform, if the linear part is invertible.
    pub fn inverse(&self) -> Option<Self> {
        self.rotation.try_inverse().map(|inv| Self {
            rotation: inv,
            translation: -(inv * self.translation),
        })
    }
}

impl Default for FrameTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Rotation taking the projection of `vector` onto the plane orthogonal to
/// `plane_normal` onto the direction of `target`.
///
/// A projection already along `target` (or of zero length) yields the
/// identity. One pointing exactly away from `target` yields a half turn
/// about `plane_normal`.
fn single_axis_rotation(vector: &Vec3, plane_normal: &Vec3, target: &Vec3) -> Mat3 {
    let projected = project_onto_plane(vector, plane_normal);
    if projected.norm() < 1e-12 {
        return Mat3::identity();
    }
    match axis_angle_between(&projected, target) {
        Some((axis, angle)) => rotation_about_axis(&axis, angle),
        None if projected.dot(target) < 0.0 => {
            rotation_about_axis(&Dir3::new_normalize(*plane_normal), PI)
        }
        None => Mat3::identity(),
    }
}

/// Rotation and translation that bring the `moving` basis onto the
/// `stationary` basis, rotating about `rotation_center`.
///
/// Both bases are orthonormal, right-handed, with their axes as columns.
/// The rotation is built from three single-axis alignments:
///
/// 1. `Y` of the moving frame, projected onto the plane orthogonal to the
///    stationary `X`, is turned onto the stationary `Y`;
/// 2. the (rotated) moving `Y`, projected onto the plane orthogonal to the
///    stationary `Z`, is turned onto the stationary `Y`;
/// 3. the (rotated) moving `Z`, projected onto the plane orthogonal to the
///    stationary `Y`, is turned onto the stationary `Z`.
///
/// The returned transform applies stage 1 first. Its translation moves the
/// rotated `rotation_center` back to where it started, so
/// `result.apply_point(rotation_center) == rotation_center`.
pub fn align_frames(moving: &Mat3, stationary: &Mat3, rotation_center: &Point3) -> FrameTransform {
    let (x_g, y_g, z_g) = basis_columns(stationary);

    let r1 = single_axis_rotation(&moving.column(1).into_owned(), &x_g, &y_g);
    let moved = r1 * moving;

    let r2 = single_axis_rotation(&moved.column(1).into_owned(), &z_g, &y_g);
    let moved = r2 * moved;

    let r3 = single_axis_rotation(&moved.column(2).into_owned(), &y_g, &z_g);

    let rotation = r3 * r2 * r1;
    let translation = rotation_center.coords - rotation * rotation_center.coords;
    FrameTransform::new(rotation, translation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis_from_columns;
    use std::f64::consts::FRAC_PI_2;

    fn assert_mat_eq(a: &Mat3, b: &Mat3) {
        assert!((a - b).norm() < 1e-9, "matrices differ:\n{a}\n{b}");
    }

    fn arbitrary_rotation() -> Mat3 {
        let axis = Dir3::new_normalize(Vec3::new(0.3, -1.2, 0.7));
        rotation_about_axis(&axis, 2.1)
    }

    #[test]
    fn test_identity_transform() {
        let t = FrameTransform::identity();
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!((t.apply_point(&p) - p).norm() < 1e-12);
    }

    #[test]
    fn test_single_level() {
        // Local frame rotated 90° about Z, origin at (10, 0, 0)
        let rot = rotation_about_axis(&Dir3::new_normalize(Vec3::z()), FRAC_PI_2);
        let t = FrameTransform::new(rot, Vec3::new(10.0, 0.0, 0.0));
        let p = t.apply_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(10.0, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_chain_applies_innermost_first() {
        let inner = FrameTransform::new(
            rotation_about_axis(&Dir3::new_normalize(Vec3::z()), FRAC_PI_2),
            Vec3::new(1.0, 0.0, 0.0),
        );
        let outer = FrameTransform::new(
            rotation_about_axis(&Dir3::new_normalize(Vec3::x()), FRAC_PI_2),
            Vec3::new(0.0, 0.0, 5.0),
        );
        let chained = FrameTransform::chain([&inner, &outer]);

        let p = Point3::new(2.0, -1.0, 3.0);
        let step_by_step = outer.apply_point(&inner.apply_point(&p));
        assert!((chained.apply_point(&p) - step_by_step).norm() < 1e-12);
    }

    #[test]
    fn test_chain_of_nothing_is_identity() {
        let chained = FrameTransform::chain(std::iter::empty::<&FrameTransform>());
        assert_eq!(chained, FrameTransform::identity());
    }

    #[test]
    fn test_scaled_and_inverse() {
        let t = FrameTransform::new(arbitrary_rotation(), Vec3::new(1.0, 2.0, 3.0)).scaled(25.4);
        let inv = t.inverse().unwrap();
        let p = Point3::new(5.0, -6.0, 7.0);
        let back = inv.apply_point(&t.apply_point(&p));
        assert!((back - p).norm() < 1e-9);
    }

    #[test]
    fn test_align_to_identity() {
        let moving = arbitrary_rotation();
        let result = align_frames(&moving, &Mat3::identity(), &Point3::origin());
        assert_mat_eq(&(result.rotation * moving), &Mat3::identity());
        assert!(result.translation.norm() < 1e-12);
    }

    #[test]
    fn test_align_to_arbitrary_frame() {
        let stationary = arbitrary_rotation();
        let moving = rotation_about_axis(&Dir3::new_normalize(Vec3::new(1.0, 1.0, 1.0)), -0.8);
        let result = align_frames(&moving, &stationary, &Point3::origin());
        assert_mat_eq(&(result.rotation * moving), &stationary);
    }

    #[test]
    fn test_align_already_aligned_is_identity() {
        let frame = arbitrary_rotation();
        let result = align_frames(&frame, &frame, &Point3::new(4.0, 5.0, 6.0));
        assert_mat_eq(&result.rotation, &Mat3::identity());
        assert!(result.translation.norm() < 1e-9);
    }

    #[test]
    fn test_align_antiparallel_stage() {
        // Half turn about X: Y and Z point the wrong way
        let moving = basis_from_columns(&Vec3::x(), &-Vec3::y(), &-Vec3::z());
        let result = align_frames(&moving, &Mat3::identity(), &Point3::origin());
        assert_mat_eq(&(result.rotation * moving), &Mat3::identity());
    }

    #[test]
    fn test_align_keeps_rotation_center() {
        let center = Point3::new(3.0, -2.0, 8.0);
        let result = align_frames(&arbitrary_rotation(), &Mat3::identity(), &center);
        assert!((result.apply_point(&center) - center).norm() < 1e-9);
    }
}
