//! Adaptive curve discretization with a bounded chordal deviation.

use thiserror::Error;
use weldseam_math::{LengthUnit, Point3};

use crate::{CurveKind, ParametricCurve};

/// Errors for curves the discretizer cannot sample.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// A conic curve reported no usable radius.
    #[error("{0:?} curve has no usable radius")]
    MissingRadius(CurveKind),

    /// The curve length is not a positive finite number.
    #[error("curve length {0} is not a positive finite number")]
    InvalidLength(f64),

    /// The parameter domain is empty or not finite.
    #[error("empty parameter domain [{0}, {1}]")]
    EmptyDomain(f64, f64),

    /// The sampling step is not a positive finite number.
    #[error("sampling step {0} is not a positive finite number")]
    InvalidStep(f64),
}

/// Sampling parameters for [`discretize`], all lengths in `unit`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Step for non-conic curves and arcs too tight for the deviation bound.
    pub default_step: f64,
    /// Lower bound on the step derived from the deviation bound.
    pub min_step: f64,
    /// Maximum distance between a chord and the arc it replaces (sagitta).
    pub max_deviation: f64,
    /// Minimum number of segments for a closed curve.
    pub closed_min_segments: usize,
    /// Unit the lengths above are expressed in.
    pub unit: LengthUnit,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            default_step: 16.0,
            min_step: 1.0,
            max_deviation: 0.5,
            closed_min_segments: 3,
            unit: LengthUnit::Millimeter,
        }
    }
}

/// Recommended step length along `curve`, in `params.unit`.
///
/// Arcs, circles and ellipses whose radius `r` exceeds half the deviation
/// bound `d` use the chord whose sagitta is exactly `d`,
/// `sqrt(8·r·d − 4·d²)`, but never less than `min_step`. Everything else
/// uses `default_step`.
pub fn recommended_step(curve: &dyn ParametricCurve, params: &SamplingParams) -> Result<f64, CurveError> {
    if !(curve.is_arc_or_circle() || curve.is_ellipse()) {
        return Ok(params.default_step);
    }

    let radius = curve
        .radius()
        .filter(|r| r.is_finite() && *r > 0.0)
        .ok_or(CurveError::MissingRadius(curve.kind()))?;
    let r = params.unit.convert(radius, curve.native_unit());
    let d = params.max_deviation;

    if r > d / 2.0 {
        Ok((8.0 * r * d - 4.0 * d * d).sqrt().max(params.min_step))
    } else {
        Ok(params.default_step)
    }
}

/// Approximate `curve` by a polyline and map every point through `transform`.
///
/// Straight segments yield exactly their two endpoints. Other curves are cut
/// into `max(1, ceil(length / step))` pieces of equal arc length (at least
/// `closed_min_segments` when the curve is closed), so a closed curve comes
/// back with its first point repeated at the end.
pub fn discretize<F>(
    curve: &dyn ParametricCurve,
    params: &SamplingParams,
    transform: F,
) -> Result<Vec<Point3>, CurveError>
where
    F: Fn(&Point3) -> Point3,
{
    let (t_min, t_max) = curve.domain();
    if !(t_min.is_finite() && t_max.is_finite()) || t_max <= t_min {
        return Err(CurveError::EmptyDomain(t_min, t_max));
    }

    if curve.is_line() {
        return Ok(vec![
            transform(&curve.point_at(t_min)),
            transform(&curve.point_at(t_max)),
        ]);
    }

    let length = curve.length(params.unit);
    if !length.is_finite() || length <= 0.0 {
        return Err(CurveError::InvalidLength(length));
    }

    let step = recommended_step(curve, params)?;
    if !step.is_finite() || step <= 0.0 {
        return Err(CurveError::InvalidStep(step));
    }

    let mut segments = ((length / step).ceil() as usize).max(1);
    if curve.is_closed() {
        segments = segments.max(params.closed_min_segments);
    }
    let step_real = length / segments as f64;

    // Uniform arc-length spacing mapped linearly onto the parameter range
    let t_of_length = |s: f64| t_min + (t_max - t_min) * (s / length);

    let mut points = Vec::with_capacity(segments + 1);
    points.push(transform(&curve.point_at(t_min)));
    for i in 1..segments {
        points.push(transform(&curve.point_at(t_of_length(step_real * i as f64))));
    }
    points.push(transform(&curve.point_at(t_max)));
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Circle3d, Ellipse3d, InUnit, Segment3d};
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};
    use weldseam_math::Vec3;

    fn identity(p: &Point3) -> Point3 {
        *p
    }

    /// A wavy curve that is neither a line nor a conic.
    #[derive(Debug)]
    struct Wave;

    impl ParametricCurve for Wave {
        fn domain(&self) -> (f64, f64) {
            (0.0, 1.0)
        }
        fn point_at(&self, t: f64) -> Point3 {
            Point3::new(100.0 * t, (10.0 * t).sin(), 0.0)
        }
        fn arc_length(&self) -> f64 {
            crate::estimate_length(self, 512)
        }
        fn kind(&self) -> CurveKind {
            CurveKind::Other
        }
        fn is_closed(&self) -> bool {
            false
        }
    }

    #[test]
    fn test_line_yields_endpoints() {
        let line = Segment3d::from_points(Point3::new(1.0, 2.0, 3.0), Point3::new(400.0, 0.0, 0.0));
        let points = discretize(&line, &SamplingParams::default(), identity).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], Point3::new(1.0, 2.0, 3.0));
        assert_eq!(points[1], Point3::new(400.0, 0.0, 0.0));
    }

    #[test]
    fn test_step_for_large_arc() {
        let params = SamplingParams {
            min_step: 0.01,
            max_deviation: 0.5,
            ..Default::default()
        };
        let circle = Circle3d::new(Point3::origin(), 100.0);
        let step = recommended_step(&circle, &params).unwrap();
        assert_relative_eq!(step, (8.0 * 100.0 * 0.5 - 4.0 * 0.25f64).sqrt());
    }

    #[test]
    fn test_step_clamped_by_min_step() {
        let params = SamplingParams {
            min_step: 50.0,
            ..Default::default()
        };
        let circle = Circle3d::new(Point3::origin(), 100.0);
        assert_relative_eq!(recommended_step(&circle, &params).unwrap(), 50.0);
    }

    #[test]
    fn test_small_radius_uses_default_step() {
        let params = SamplingParams::default();
        let tiny = Circle3d::new(Point3::origin(), 0.1);
        assert_relative_eq!(recommended_step(&tiny, &params).unwrap(), params.default_step);
    }

    #[test]
    fn test_closed_curve_has_minimum_segments() {
        // Circumference well below one default step
        let params = SamplingParams {
            min_step: 100.0,
            ..Default::default()
        };
        let circle = Circle3d::new(Point3::new(5.0, 5.0, 0.0), 1.0);
        let points = discretize(&circle, &params, identity).unwrap();
        assert_eq!(points.len(), 4);
        assert!((points[0] - points[3]).norm() < 1e-9);
    }

    #[test]
    fn test_configurable_closed_minimum() {
        let params = SamplingParams {
            min_step: 100.0,
            closed_min_segments: 6,
            ..Default::default()
        };
        let circle = Circle3d::new(Point3::origin(), 1.0);
        assert_eq!(discretize(&circle, &params, identity).unwrap().len(), 7);
    }

    #[test]
    fn test_arc_points_lie_on_arc() {
        let arc = Circle3d::new(Point3::origin(), 10.0).arc(0.0, FRAC_PI_2);
        let params = SamplingParams {
            min_step: 0.1,
            ..Default::default()
        };
        let points = discretize(&arc, &params, identity).unwrap();
        assert!(points.len() > 2);
        for p in &points {
            assert_relative_eq!(p.coords.norm(), 10.0, epsilon = 1e-9);
        }
        assert!((points[0] - Point3::new(10.0, 0.0, 0.0)).norm() < 1e-9);
        assert!((points[points.len() - 1] - Point3::new(0.0, 10.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_clockwise_arc_runs_from_start_to_end() {
        let arc = Circle3d::new(Point3::origin(), 10.0).arc(FRAC_PI_2, 0.0);
        let params = SamplingParams {
            min_step: 0.1,
            ..Default::default()
        };
        let points = discretize(&arc, &params, identity).unwrap();
        assert!(points.len() > 2);
        assert!((points[0] - Point3::new(0.0, 10.0, 0.0)).norm() < 1e-9);
        assert!((points[points.len() - 1] - Point3::new(10.0, 0.0, 0.0)).norm() < 1e-9);
        assert!(points.iter().all(|p| p.x > -1e-9 && p.y > -1e-9));
    }

    #[test]
    fn test_transform_is_applied() {
        let arc = Circle3d::new(Point3::origin(), 10.0).arc(0.0, PI);
        let shift = Vec3::new(0.0, 0.0, 7.0);
        let points = discretize(&arc, &SamplingParams::default(), |p| p + shift).unwrap();
        assert!(points.iter().all(|p| (p.z - 7.0).abs() < 1e-12));
    }

    #[test]
    fn test_generic_curve_uses_default_step() {
        let params = SamplingParams::default();
        let points = discretize(&Wave, &params, identity).unwrap();
        let expected = (Wave.length(params.unit) / params.default_step).ceil() as usize + 1;
        assert_eq!(points.len(), expected);
    }

    #[test]
    fn test_ellipse_uses_minor_radius() {
        let params = SamplingParams {
            min_step: 0.01,
            ..Default::default()
        };
        let ellipse = Ellipse3d::new(Point3::origin(), 50.0, 5.0);
        let step = recommended_step(&ellipse, &params).unwrap();
        assert_relative_eq!(step, (8.0 * 5.0 * 0.5 - 4.0 * 0.25f64).sqrt());
    }

    #[test]
    fn test_radius_converted_to_sampling_unit() {
        let params = SamplingParams {
            min_step: 0.01,
            ..Default::default()
        };
        // 4 inch radius is 101.6 mm
        let circle = InUnit::new(Circle3d::new(Point3::origin(), 4.0), LengthUnit::Inch);
        let step = recommended_step(&circle, &params).unwrap();
        assert_relative_eq!(step, (8.0 * 101.6 * 0.5 - 4.0 * 0.25f64).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_conic_without_radius_is_unsupported() {
        #[derive(Debug)]
        struct Faceless;
        impl ParametricCurve for Faceless {
            fn domain(&self) -> (f64, f64) {
                (0.0, 1.0)
            }
            fn point_at(&self, t: f64) -> Point3 {
                Point3::new(t, 0.0, 0.0)
            }
            fn arc_length(&self) -> f64 {
                1.0
            }
            fn kind(&self) -> CurveKind {
                CurveKind::Arc
            }
            fn is_closed(&self) -> bool {
                false
            }
        }
        let err = discretize(&Faceless, &SamplingParams::default(), identity).unwrap_err();
        assert_eq!(err, CurveError::MissingRadius(CurveKind::Arc));
    }

    #[test]
    fn test_empty_domain_is_rejected() {
        let arc = Circle3d::new(Point3::origin(), 1.0).arc(1.0, 1.0);
        let err = discretize(&arc, &SamplingParams::default(), identity).unwrap_err();
        assert_eq!(err, CurveError::EmptyDomain(1.0, 1.0));
    }
}
