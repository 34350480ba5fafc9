//! Weld line settings and their TOML configuration form.

use serde::{Deserialize, Serialize};
use weldseam_geom::SamplingParams;
use weldseam_math::LengthUnit;

use crate::error::{Result, SeamError};

/// Bead diameter used by [`WeldLineSettings::default`].
pub const DEFAULT_DIAMETER: f64 = 10.0;

/// Per-run settings for seam synthesis and body authoring.
///
/// Every length is in `unit`. Steps and tolerances scale with the bead
/// diameter unless set explicitly, so one number sizes the whole pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WeldLineConfig", into = "WeldLineConfig")]
pub struct WeldLineSettings {
    /// Bead diameter.
    pub diameter: f64,
    /// Sampling step for curves without a usable radius.
    pub default_step: f64,
    /// Lower bound on the sampling step of arcs.
    pub min_step: f64,
    /// Maximum chordal deviation (sagitta) of sampled arcs.
    pub max_deviation: f64,
    /// Distance under which two points count as the same.
    pub merge_tolerance: f64,
    /// Sides of the cross-section polygon, 0 for a circle.
    pub profile_sides: u32,
    /// Minimum number of segments a closed curve is cut into.
    pub closed_min_segments: usize,
    /// Unit of every length above and of the produced paths.
    pub unit: LengthUnit,
}

impl WeldLineSettings {
    /// Settings derived from a bead diameter.
    pub fn for_diameter(diameter: f64) -> Self {
        Self {
            diameter,
            default_step: 1.6 * diameter,
            min_step: 0.1 * diameter,
            max_deviation: 0.05 * diameter,
            merge_tolerance: 0.2 * diameter,
            profile_sides: 0,
            closed_min_segments: 3,
            unit: LengthUnit::Millimeter,
        }
    }

    /// Parse and validate settings from a TOML document.
    ///
    /// Only `diameter` is required:
    ///
    /// ```toml
    /// diameter = 6.0
    /// max_deviation = 0.1
    /// unit = "millimeter"
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e: toml::de::Error| SeamError::InvalidSettings(e.to_string()))
    }

    /// Serialize to a TOML document with every field spelled out.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| SeamError::InvalidSettings(e.to_string()))
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("diameter", self.diameter),
            ("default_step", self.default_step),
            ("min_step", self.min_step),
            ("max_deviation", self.max_deviation),
            ("merge_tolerance", self.merge_tolerance),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(SeamError::InvalidSettings(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        if self.min_step > self.default_step {
            return Err(SeamError::InvalidSettings(
                "min_step must not exceed default_step".into(),
            ));
        }
        if self.profile_sides == 1 || self.profile_sides == 2 {
            return Err(SeamError::InvalidSettings(
                "profile_sides must be 0 (circle) or at least 3".into(),
            ));
        }
        if self.closed_min_segments < 3 {
            return Err(SeamError::InvalidSettings(
                "closed_min_segments must be at least 3".into(),
            ));
        }
        Ok(())
    }

    /// Discretizer parameters for these settings.
    pub fn sampling(&self) -> SamplingParams {
        SamplingParams {
            default_step: self.default_step,
            min_step: self.min_step,
            max_deviation: self.max_deviation,
            closed_min_segments: self.closed_min_segments,
            unit: self.unit,
        }
    }

    /// Cross-section radius.
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }
}

impl Default for WeldLineSettings {
    fn default() -> Self {
        Self::for_diameter(DEFAULT_DIAMETER)
    }
}

/// Serialized form of [`WeldLineSettings`]: a diameter plus optional overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeldLineConfig {
    /// Bead diameter.
    pub diameter: f64,
    /// Overrides `1.6 × diameter`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_step: Option<f64>,
    /// Overrides `0.1 × diameter`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_step: Option<f64>,
    /// Overrides `0.05 × diameter`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_deviation: Option<f64>,
    /// Overrides `0.2 × diameter`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_tolerance: Option<f64>,
    /// Overrides the circular profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_sides: Option<u32>,
    /// Overrides the minimum of 3 segments per closed curve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_min_segments: Option<usize>,
    /// Overrides millimeters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<LengthUnit>,
}

impl TryFrom<WeldLineConfig> for WeldLineSettings {
    type Error = SeamError;

    fn try_from(config: WeldLineConfig) -> Result<Self> {
        let base = Self::for_diameter(config.diameter);
        let settings = Self {
            default_step: config.default_step.unwrap_or(base.default_step),
            min_step: config.min_step.unwrap_or(base.min_step),
            max_deviation: config.max_deviation.unwrap_or(base.max_deviation),
            merge_tolerance: config.merge_tolerance.unwrap_or(base.merge_tolerance),
            profile_sides: config.profile_sides.unwrap_or(base.profile_sides),
            closed_min_segments: config
                .closed_min_segments
                .unwrap_or(base.closed_min_segments),
            unit: config.unit.unwrap_or(base.unit),
            ..base
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl From<WeldLineSettings> for WeldLineConfig {
    fn from(settings: WeldLineSettings) -> Self {
        Self {
            diameter: settings.diameter,
            default_step: Some(settings.default_step),
            min_step: Some(settings.min_step),
            max_deviation: Some(settings.max_deviation),
            merge_tolerance: Some(settings.merge_tolerance),
            profile_sides: Some(settings.profile_sides),
            closed_min_segments: Some(settings.closed_min_segments),
            unit: Some(settings.unit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_derived_from_diameter() {
        let s = WeldLineSettings::for_diameter(5.0);
        assert_relative_eq!(s.default_step, 8.0);
        assert_relative_eq!(s.min_step, 0.5);
        assert_relative_eq!(s.max_deviation, 0.25);
        assert_relative_eq!(s.merge_tolerance, 1.0);
        assert_relative_eq!(s.radius(), 2.5);
        assert_eq!(s.profile_sides, 0);
        assert_eq!(s.closed_min_segments, 3);
        assert_eq!(s.unit, LengthUnit::Millimeter);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_default_is_valid() {
        let s = WeldLineSettings::default();
        assert_relative_eq!(s.diameter, DEFAULT_DIAMETER);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut s = WeldLineSettings::for_diameter(4.0);
        s.max_deviation = 0.0;
        assert!(matches!(s.validate(), Err(SeamError::InvalidSettings(_))));

        let mut s = WeldLineSettings::for_diameter(4.0);
        s.merge_tolerance = f64::NAN;
        assert!(s.validate().is_err());

        let mut s = WeldLineSettings::for_diameter(4.0);
        s.min_step = s.default_step * 2.0;
        assert!(s.validate().is_err());

        let mut s = WeldLineSettings::for_diameter(4.0);
        s.profile_sides = 2;
        assert!(s.validate().is_err());
        s.profile_sides = 3;
        assert!(s.validate().is_ok());

        let mut s = WeldLineSettings::for_diameter(4.0);
        for too_few in [0, 1, 2] {
            s.closed_min_segments = too_few;
            assert!(matches!(s.validate(), Err(SeamError::InvalidSettings(_))));
        }
        s.closed_min_segments = 3;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_toml_with_overrides() {
        let s = WeldLineSettings::from_toml_str(
            r#"
            diameter = 6.0
            max_deviation = 0.1
            profile_sides = 6
            unit = "inch"
            "#,
        )
        .unwrap();
        assert_relative_eq!(s.diameter, 6.0);
        assert_relative_eq!(s.max_deviation, 0.1);
        assert_relative_eq!(s.default_step, 9.6);
        assert_eq!(s.profile_sides, 6);
        assert_eq!(s.unit, LengthUnit::Inch);
    }

    #[test]
    fn test_toml_rejects_invalid() {
        let err = WeldLineSettings::from_toml_str("diameter = -1.0").unwrap_err();
        assert!(err.to_string().contains("diameter must be positive"));

        assert!(WeldLineSettings::from_toml_str("max_deviation = 0.1").is_err());
        assert!(WeldLineSettings::from_toml_str("diameter = 2.0\nbogus = 1").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut s = WeldLineSettings::for_diameter(3.0);
        s.closed_min_segments = 8;
        let text = s.to_toml_string().unwrap();
        assert_eq!(WeldLineSettings::from_toml_str(&text).unwrap(), s);
    }

    #[test]
    fn test_sampling_params() {
        let s = WeldLineSettings::for_diameter(2.0);
        let p = s.sampling();
        assert_relative_eq!(p.default_step, s.default_step);
        assert_relative_eq!(p.min_step, s.min_step);
        assert_relative_eq!(p.max_deviation, s.max_deviation);
        assert_eq!(p.closed_min_segments, 3);
    }
}
