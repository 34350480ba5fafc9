#![warn(missing_docs)]

//! Parametric curve types for weld seam synthesis.
//!
//! Provides a trait-based abstraction over the curves a host model exposes
//! for its edges, concrete analytic implementations (line segments,
//! circles and arcs, ellipses and elliptic arcs), and an adaptive
//! discretizer that turns any of them into a polyline with a bounded
//! chordal deviation.

mod discretize;

pub use discretize::{discretize, recommended_step, CurveError, SamplingParams};

use std::f64::consts::PI;
use weldseam_math::{basis_columns, basis_from_normal, Dir3, LengthUnit, Point3, Vec3};

/// Angular spans at least this close to a full turn count as closed.
const FULL_TURN_EPS: f64 = 1e-9;

// =============================================================================
// Curve trait
// =============================================================================

/// The kind of a curve (for match-based dispatch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    /// Straight line segment.
    Line,
    /// Circular arc (less than a full turn).
    Arc,
    /// Full circle.
    Circle,
    /// Ellipse or elliptic arc.
    Ellipse,
    /// Anything else (splines, intersection curves, ...).
    Other,
}

/// A parametric curve in 3D space, as read from a host model.
///
/// Points are in the curve's local frame. The parameter is not assumed to
/// be proportional to arc length.
pub trait ParametricCurve: Send + Sync + std::fmt::Debug {
    /// Parameter domain `(t_min, t_max)`.
    fn domain(&self) -> (f64, f64);

    /// Evaluate the curve at parameter `t`.
    fn point_at(&self, t: f64) -> Point3;

    /// Total arc length in [`ParametricCurve::native_unit`].
    fn arc_length(&self) -> f64;

    /// The kind of this curve.
    fn kind(&self) -> CurveKind;

    /// Whether the curve ends where it starts.
    fn is_closed(&self) -> bool;

    /// Representative radius in the native unit: the radius of arcs and
    /// circles, the minor radius of ellipses, `None` otherwise.
    fn radius(&self) -> Option<f64> {
        None
    }

    /// Unit that coordinates, lengths and radii are expressed in.
    fn native_unit(&self) -> LengthUnit {
        LengthUnit::Millimeter
    }

    /// Total arc length converted into `unit`.
    fn length(&self, unit: LengthUnit) -> f64 {
        unit.convert(self.arc_length(), self.native_unit())
    }

    /// Is this a straight segment?
    fn is_line(&self) -> bool {
        self.kind() == CurveKind::Line
    }

    /// Is this a circular arc or a full circle?
    fn is_arc_or_circle(&self) -> bool {
        matches!(self.kind(), CurveKind::Arc | CurveKind::Circle)
    }

    /// Is this an ellipse or elliptic arc?
    fn is_ellipse(&self) -> bool {
        self.kind() == CurveKind::Ellipse
    }
}

impl<C: ParametricCurve + ?Sized> ParametricCurve for &C {
    fn domain(&self) -> (f64, f64) {
        (**self).domain()
    }

    fn point_at(&self, t: f64) -> Point3 {
        (**self).point_at(t)
    }

    fn arc_length(&self) -> f64 {
        (**self).arc_length()
    }

    fn kind(&self) -> CurveKind {
        (**self).kind()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn radius(&self) -> Option<f64> {
        (**self).radius()
    }

    fn native_unit(&self) -> LengthUnit {
        (**self).native_unit()
    }
}

/// Estimate arc length by summing `samples` chords at uniform parameter spacing.
pub fn estimate_length(curve: &dyn ParametricCurve, samples: usize) -> f64 {
    let (t_min, t_max) = curve.domain();
    let n = samples.max(1);
    let mut length = 0.0;
    let mut prev = curve.point_at(t_min);
    for i in 1..=n {
        let t = t_min + (t_max - t_min) * i as f64 / n as f64;
        let p = curve.point_at(t);
        length += (p - prev).norm();
        prev = p;
    }
    length
}

/// In-plane axes and unit normal of the plane orthogonal to `normal`.
fn plane_axes(normal: &Vec3) -> (Dir3, Dir3, Dir3) {
    let (x, y, n) = basis_columns(&basis_from_normal(normal));
    (
        Dir3::new_unchecked(x),
        Dir3::new_unchecked(y),
        Dir3::new_unchecked(n),
    )
}

// =============================================================================
// Segment3d
// =============================================================================

/// A straight segment between two points.
///
/// Parameterization: `P(t) = start + t * (end - start)`, `t ∈ [0, 1]`.
#[derive(Debug, Clone)]
pub struct Segment3d {
    /// Starting point.
    pub start: Point3,
    /// End point.
    pub end: Point3,
}

impl Segment3d {
    /// Create a segment from two endpoints.
    pub fn from_points(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }
}

impl ParametricCurve for Segment3d {
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn point_at(&self, t: f64) -> Point3 {
        self.start + t * (self.end - self.start)
    }

    fn arc_length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    fn kind(&self) -> CurveKind {
        CurveKind::Line
    }

    fn is_closed(&self) -> bool {
        false
    }
}

// =============================================================================
// Circle3d
// =============================================================================

/// A circle or circular arc in 3D space.
///
/// Parameterization: `P(t) = center + radius * (cos(t) * x_dir + sin(t) * y_dir)`
/// with `t ∈ [start_angle, end_angle]`.
#[derive(Debug, Clone)]
pub struct Circle3d {
    /// Center of the circle.
    pub center: Point3,
    /// Radius.
    pub radius: f64,
    /// Reference direction for t=0.
    pub x_dir: Dir3,
    /// Second in-plane direction (perpendicular to x_dir and normal).
    pub y_dir: Dir3,
    /// Normal to the circle plane.
    pub normal: Dir3,
    /// Parameter at the start of the arc (radians).
    pub start_angle: f64,
    /// Parameter at the end of the arc (radians).
    pub end_angle: f64,
}

impl Circle3d {
    /// Create a full circle in the XY plane centered at the given point.
    pub fn new(center: Point3, radius: f64) -> Self {
        Self {
            center,
            radius,
            x_dir: Dir3::new_normalize(Vec3::x()),
            y_dir: Dir3::new_normalize(Vec3::y()),
            normal: Dir3::new_normalize(Vec3::z()),
            start_angle: 0.0,
            end_angle: 2.0 * PI,
        }
    }

    /// Create a full circle with a custom normal direction.
    pub fn with_normal(center: Point3, radius: f64, normal: Vec3) -> Self {
        let (x_dir, y_dir, normal) = plane_axes(&normal);
        Self {
            center,
            radius,
            x_dir,
            y_dir,
            normal,
            start_angle: 0.0,
            end_angle: 2.0 * PI,
        }
    }

    /// Restrict the circle to the arc between two angles (radians, CCW about the normal).
    ///
    /// An `end_angle` below `start_angle` is a clockwise arc. It is stored
    /// as the same arc running CCW about the flipped normal, so the domain
    /// always increases and `point_at` still starts at `start_angle`.
    pub fn arc(mut self, start_angle: f64, end_angle: f64) -> Self {
        if end_angle < start_angle {
            self.y_dir = -self.y_dir;
            self.normal = -self.normal;
            self.start_angle = -start_angle;
            self.end_angle = -end_angle;
        } else {
            self.start_angle = start_angle;
            self.end_angle = end_angle;
        }
        self
    }

    /// Angular span of the arc.
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

impl ParametricCurve for Circle3d {
    fn domain(&self) -> (f64, f64) {
        (self.start_angle, self.end_angle)
    }

    fn point_at(&self, t: f64) -> Point3 {
        let (sin_t, cos_t) = t.sin_cos();
        self.center + self.radius * (cos_t * self.x_dir.as_ref() + sin_t * self.y_dir.as_ref())
    }

    fn arc_length(&self) -> f64 {
        self.radius * self.span()
    }

    fn kind(&self) -> CurveKind {
        if self.is_closed() {
            CurveKind::Circle
        } else {
            CurveKind::Arc
        }
    }

    fn is_closed(&self) -> bool {
        self.span() >= 2.0 * PI - FULL_TURN_EPS
    }

    fn radius(&self) -> Option<f64> {
        Some(self.radius)
    }
}

// =============================================================================
// Ellipse3d
// =============================================================================

/// An ellipse or elliptic arc in 3D space.
///
/// Parameterization: `P(t) = center + major * cos(t) * x_dir + minor * sin(t) * y_dir`
/// with `t ∈ [start_angle, end_angle]`.
#[derive(Debug, Clone)]
pub struct Ellipse3d {
    /// Center of the ellipse.
    pub center: Point3,
    /// Semi-major radius (along x_dir).
    pub major_radius: f64,
    /// Semi-minor radius (along y_dir).
    pub minor_radius: f64,
    /// Direction of the major axis.
    pub x_dir: Dir3,
    /// Direction of the minor axis.
    pub y_dir: Dir3,
    /// Parameter at the start of the arc (radians).
    pub start_angle: f64,
    /// Parameter at the end of the arc (radians).
    pub end_angle: f64,
}

impl Ellipse3d {
    /// Create a full ellipse in the XY plane with its major axis along X.
    pub fn new(center: Point3, major_radius: f64, minor_radius: f64) -> Self {
        Self {
            center,
            major_radius,
            minor_radius,
            x_dir: Dir3::new_normalize(Vec3::x()),
            y_dir: Dir3::new_normalize(Vec3::y()),
            start_angle: 0.0,
            end_angle: 2.0 * PI,
        }
    }

    /// Restrict the ellipse to the arc between two parameters.
    ///
    /// A decreasing parameter range is mirrored onto an increasing one by
    /// flipping the minor axis.
    pub fn arc(mut self, start_angle: f64, end_angle: f64) -> Self {
        if end_angle < start_angle {
            self.y_dir = -self.y_dir;
            self.start_angle = -start_angle;
            self.end_angle = -end_angle;
        } else {
            self.start_angle = start_angle;
            self.end_angle = end_angle;
        }
        self
    }
}

impl ParametricCurve for Ellipse3d {
    fn domain(&self) -> (f64, f64) {
        (self.start_angle, self.end_angle)
    }

    fn point_at(&self, t: f64) -> Point3 {
        let (sin_t, cos_t) = t.sin_cos();
        self.center
            + self.major_radius * cos_t * self.x_dir.as_ref()
            + self.minor_radius * sin_t * self.y_dir.as_ref()
    }

    fn arc_length(&self) -> f64 {
        if self.is_closed() {
            // Ramanujan's second approximation
            let (a, b) = (self.major_radius, self.minor_radius);
            let h = ((a - b) / (a + b)).powi(2);
            PI * (a + b) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()))
        } else {
            estimate_length(self, 1024)
        }
    }

    fn kind(&self) -> CurveKind {
        CurveKind::Ellipse
    }

    fn is_closed(&self) -> bool {
        self.end_angle - self.start_angle >= 2.0 * PI - FULL_TURN_EPS
    }

    fn radius(&self) -> Option<f64> {
        Some(self.minor_radius.min(self.major_radius))
    }
}

// =============================================================================
// Unit override
// =============================================================================

/// Wraps a curve whose coordinates are in a unit other than millimeters.
#[derive(Debug, Clone)]
pub struct InUnit<C> {
    /// The wrapped curve.
    pub curve: C,
    /// Unit of the wrapped curve's coordinates.
    pub unit: LengthUnit,
}

impl<C: ParametricCurve> InUnit<C> {
    /// Tag `curve` as being expressed in `unit`.
    pub fn new(curve: C, unit: LengthUnit) -> Self {
        Self { curve, unit }
    }
}

impl<C: ParametricCurve> ParametricCurve for InUnit<C> {
    fn domain(&self) -> (f64, f64) {
        self.curve.domain()
    }

    fn point_at(&self, t: f64) -> Point3 {
        self.curve.point_at(t)
    }

    fn arc_length(&self) -> f64 {
        self.curve.arc_length()
    }

    fn kind(&self) -> CurveKind {
        self.curve.kind()
    }

    fn is_closed(&self) -> bool {
        self.curve.is_closed()
    }

    fn radius(&self) -> Option<f64> {
        self.curve.radius()
    }

    fn native_unit(&self) -> LengthUnit {
        self.unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_segment() {
        let line = Segment3d::from_points(Point3::origin(), Point3::new(10.0, 0.0, 0.0));
        let mid = line.point_at(0.5);
        assert!((mid.x - 5.0).abs() < 1e-12);
        assert_relative_eq!(line.arc_length(), 10.0);
        assert!(line.is_line());
        assert!(!line.is_closed());
    }

    #[test]
    fn test_circle() {
        let circle = Circle3d::new(Point3::origin(), 5.0);
        let pt = circle.point_at(0.0);
        assert!((pt.x - 5.0).abs() < 1e-12);
        let pt90 = circle.point_at(FRAC_PI_2);
        assert!(pt90.x.abs() < 1e-12);
        assert!((pt90.y - 5.0).abs() < 1e-12);
        assert_eq!(circle.kind(), CurveKind::Circle);
        assert!(circle.is_closed());
        assert!(circle.is_arc_or_circle());
        assert_relative_eq!(circle.arc_length(), 10.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_arc() {
        let arc = Circle3d::new(Point3::origin(), 2.0).arc(0.0, FRAC_PI_2);
        assert_eq!(arc.kind(), CurveKind::Arc);
        assert!(!arc.is_closed());
        assert_relative_eq!(arc.arc_length(), PI, epsilon = 1e-12);
        assert_eq!(arc.radius(), Some(2.0));
    }

    #[test]
    fn test_clockwise_arc() {
        let cw = Circle3d::new(Point3::origin(), 2.0).arc(FRAC_PI_2, 0.0);
        let (t0, t1) = cw.domain();
        assert!(t0 < t1);
        assert_relative_eq!(cw.span(), FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(cw.arc_length(), PI, epsilon = 1e-12);
        assert!((cw.point_at(t0) - Point3::new(0.0, 2.0, 0.0)).norm() < 1e-12);
        assert!((cw.point_at(t1) - Point3::new(2.0, 0.0, 0.0)).norm() < 1e-12);
        // Midpoint stays in the first quadrant
        let mid = cw.point_at((t0 + t1) / 2.0);
        assert!(mid.x > 0.0 && mid.y > 0.0);
        assert_relative_eq!(cw.normal.z, -1.0, epsilon = 1e-12);

        let ellipse = Ellipse3d::new(Point3::origin(), 10.0, 4.0).arc(FRAC_PI_2, 0.0);
        let (e0, e1) = ellipse.domain();
        assert!(e0 < e1);
        assert!((ellipse.point_at(e0) - Point3::new(0.0, 4.0, 0.0)).norm() < 1e-12);
        assert!((ellipse.point_at(e1) - Point3::new(10.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_circle_with_normal() {
        let circle = Circle3d::with_normal(Point3::new(1.0, 2.0, 3.0), 4.0, Vec3::new(0.0, 0.0, -2.0));
        for i in 0..8 {
            let p = circle.point_at(i as f64 * PI / 4.0);
            assert_relative_eq!((p - circle.center).norm(), 4.0, epsilon = 1e-12);
            assert!((p.z - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_ellipse_length() {
        // Degenerate ellipse with equal radii is a circle
        let round = Ellipse3d::new(Point3::origin(), 3.0, 3.0);
        assert_relative_eq!(round.arc_length(), 6.0 * PI, epsilon = 1e-9);

        let flat = Ellipse3d::new(Point3::origin(), 10.0, 4.0);
        let estimate = estimate_length(&flat, 4096);
        assert_relative_eq!(flat.arc_length(), estimate, max_relative = 1e-4);
        assert_eq!(flat.radius(), Some(4.0));
        assert!(flat.is_ellipse());
    }

    #[test]
    fn test_elliptic_arc_length() {
        let quarter = Ellipse3d::new(Point3::origin(), 10.0, 4.0).arc(0.0, FRAC_PI_2);
        let full = Ellipse3d::new(Point3::origin(), 10.0, 4.0);
        assert!(!quarter.is_closed());
        assert_relative_eq!(quarter.arc_length() * 4.0, full.arc_length(), max_relative = 1e-3);
    }

    #[test]
    fn test_length_in_other_unit() {
        let line = InUnit::new(
            Segment3d::from_points(Point3::origin(), Point3::new(2.0, 0.0, 0.0)),
            LengthUnit::Inch,
        );
        assert_relative_eq!(line.length(LengthUnit::Millimeter), 50.8, epsilon = 1e-12);
        assert_relative_eq!(line.length(LengthUnit::Inch), 2.0);
    }

    #[test]
    fn test_reference_forwards() {
        let circle = Circle3d::new(Point3::origin(), 1.0);
        let by_ref: &dyn ParametricCurve = &&circle;
        assert_eq!(by_ref.kind(), CurveKind::Circle);
        assert_eq!(by_ref.radius(), Some(1.0));
    }
}
