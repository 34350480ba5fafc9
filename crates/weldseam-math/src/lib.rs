#![warn(missing_docs)]

//! Math types for weld seam synthesis.
//!
//! Thin wrappers around nalgebra providing the value types every stage of
//! the seam pipeline shares: points, vectors, 3×3 bases, rigid frame
//! transforms, tolerances and length units.

mod frame;

pub use frame::{align_frames, FrameTransform};

use nalgebra::{Matrix3, Unit, Vector3};
use serde::{Deserialize, Serialize};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space (direction or displacement).
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A 3×3 matrix.
///
/// When it describes a coordinate frame, the columns are the frame's
/// X, Y and Z axes expressed in the parent frame.
pub type Mat3 = Matrix3<f64>;

/// Build a basis matrix from its three axis columns.
pub fn basis_from_columns(x: &Vec3, y: &Vec3, z: &Vec3) -> Mat3 {
    Mat3::from_columns(&[*x, *y, *z])
}

/// Split a basis matrix into its X, Y and Z axis columns.
pub fn basis_columns(m: &Mat3) -> (Vec3, Vec3, Vec3) {
    (
        m.column(0).into_owned(),
        m.column(1).into_owned(),
        m.column(2).into_owned(),
    )
}

/// Right-handed orthonormal basis whose Z axis is along `normal`.
///
/// The X axis is an arbitrary but consistent direction perpendicular to
/// `normal`, which must not be zero.
pub fn basis_from_normal(normal: &Vec3) -> Mat3 {
    let n = normal.normalize();
    let arbitrary = if n.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    let x = arbitrary.cross(&n).normalize();
    let y = n.cross(&x);
    basis_from_columns(&x, &y, &n)
}

/// Apply a 3×3 matrix to a point (`p' = M · p`).
pub fn transform_point(m: &Mat3, p: &Point3) -> Point3 {
    Point3::from(m * p.coords)
}

/// Project `v` onto the plane through the origin with the given normal.
///
/// The normal does not need to be unit length but must not be zero.
pub fn project_onto_plane(v: &Vec3, normal: &Vec3) -> Vec3 {
    v - normal * (v.dot(normal) / normal.norm_squared())
}

/// Rotation matrix about an arbitrary axis through the origin by `angle` radians.
///
/// Uses Rodrigues' rotation formula. The axis must be unit length.
pub fn rotation_about_axis(axis: &Dir3, angle: f64) -> Mat3 {
    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;
    let (x, y, z) = (axis.as_ref().x, axis.as_ref().y, axis.as_ref().z);
    Mat3::new(
        t * x * x + c,
        t * x * y - s * z,
        t * x * z + s * y,
        t * x * y + s * z,
        t * y * y + c,
        t * y * z - s * x,
        t * x * z - s * y,
        t * y * z + s * x,
        t * z * z + c,
    )
}

/// Axis and angle that rotate `moving` onto the direction of `stationary`.
///
/// The angle is counter-clockwise when looking from the tip of the axis.
/// Returns `None` when the cross product vanishes (the vectors are parallel,
/// antiparallel, or one of them is zero); callers decide what that means.
pub fn axis_angle_between(moving: &Vec3, stationary: &Vec3) -> Option<(Dir3, f64)> {
    let cross = moving.cross(stationary);
    let scale = moving.norm() * stationary.norm();
    if scale == 0.0 || cross.norm() <= scale * 1e-12 {
        return None;
    }
    let angle = cross.norm().atan2(moving.dot(stationary));
    Some((Dir3::new_normalize(cross), angle))
}

/// Distance tolerance for point comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Linear distance tolerance.
    pub linear: f64,
}

impl Tolerance {
    /// Tolerance with the given linear distance.
    pub fn linear(linear: f64) -> Self {
        Self { linear }
    }

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }
}

/// Linear unit that lengths and coordinates are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Millimeters.
    #[default]
    Millimeter,
    /// Centimeters.
    Centimeter,
    /// Meters.
    Meter,
    /// Inches.
    Inch,
}

impl LengthUnit {
    fn in_millimeters(self) -> f64 {
        match self {
            LengthUnit::Millimeter => 1.0,
            LengthUnit::Centimeter => 10.0,
            LengthUnit::Meter => 1000.0,
            LengthUnit::Inch => 25.4,
        }
    }

    /// Factor that converts a value in `self` into `other`.
    pub fn factor_to(self, other: LengthUnit) -> f64 {
        if self == other {
            1.0
        } else {
            self.in_millimeters() / other.in_millimeters()
        }
    }

    /// Convert `value` expressed in `from` into `self`.
    pub fn convert(self, value: f64, from: LengthUnit) -> f64 {
        value * from.factor_to(self)
    }
}
