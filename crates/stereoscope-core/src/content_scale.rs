//! Content scale: how many physical meters one world unit represents.

use serde::{Deserialize, Serialize};

use crate::units::LengthUnit;

/// Smallest positive value any scale denominator is clamped to.
pub const SCALE_EPSILON: f32 = 1e-6;

/// Clamps a scale factor to be finite and strictly positive.
///
/// Returns the clamped value and whether clamping was needed.
#[must_use]
pub fn clamp_scale(value: f32) -> (f32, bool) {
    if value.is_finite() && value >= SCALE_EPSILON {
        (value, false)
    } else if value.is_finite() && value > 0.0 {
        (SCALE_EPSILON, true)
    } else if value == f32::INFINITY {
        (f32::MAX, true)
    } else {
        (SCALE_EPSILON, true)
    }
}

/// Persistent content scale configuration.
///
/// One world unit corresponds to `ratio` of `unit`, e.g. a ratio of 2 in
/// centimeters means one world unit is two physical centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentScale {
    /// Number of `unit`s per world unit. Expected positive.
    pub ratio: f32,
    /// Physical unit the ratio is expressed in.
    pub unit: LengthUnit,
}

impl Default for ContentScale {
    fn default() -> Self {
        Self {
            ratio: 1.0,
            unit: LengthUnit::Meters,
        }
    }
}

impl ContentScale {
    /// Creates a new content scale.
    #[must_use]
    pub fn new(ratio: f32, unit: LengthUnit) -> Self {
        Self { ratio, unit }
    }

    /// Sets the ratio.
    #[must_use]
    pub fn with_ratio(mut self, ratio: f32) -> Self {
        self.ratio = ratio;
        self
    }

    /// Sets the unit.
    #[must_use]
    pub fn with_unit(mut self, unit: LengthUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Physical length in meters of one content unit.
    #[must_use]
    pub fn meters_per_content_unit(&self) -> f32 {
        self.unit.meters_per_unit()
    }

    /// Physical meters represented by one world unit. Always finite and > 0.
    #[must_use]
    pub fn physical_meters_per_world_unit(&self) -> f32 {
        clamp_scale(self.ratio * self.meters_per_content_unit()).0
    }

    /// World units per physical meter. Always finite and > 0.
    #[must_use]
    pub fn world_units_per_physical_meter(&self) -> f32 {
        clamp_scale(1.0 / self.physical_meters_per_world_unit()).0
    }

    /// Returns whether the configured ratio is usable without clamping.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.ratio.is_finite() && self.ratio > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one_meter() {
        let scale = ContentScale::default();
        assert_eq!(scale.physical_meters_per_world_unit(), 1.0);
        assert_eq!(scale.world_units_per_physical_meter(), 1.0);
    }

    #[test]
    fn test_centimeter_scale() {
        let scale = ContentScale::new(2.0, LengthUnit::Centimeters);
        assert!((scale.physical_meters_per_world_unit() - 0.02).abs() < 1e-6);
        assert!((scale.world_units_per_physical_meter() - 50.0).abs() < 1e-3);
        assert!((scale.meters_per_content_unit() - 0.01).abs() < 1e-7);
    }

    #[test]
    fn test_zero_and_negative_ratio_clamped() {
        for ratio in [0.0, -1.0, -0.0, f32::NAN, f32::NEG_INFINITY] {
            let scale = ContentScale::new(ratio, LengthUnit::Meters);
            let m = scale.physical_meters_per_world_unit();
            assert!(m > 0.0 && m.is_finite(), "ratio {ratio} gave {m}");
            let inv = scale.world_units_per_physical_meter();
            assert!(inv > 0.0 && inv.is_finite(), "ratio {ratio} gave {inv}");
            assert!(!scale.is_valid());
        }
    }

    #[test]
    fn test_clamp_scale_reports_clamping() {
        assert_eq!(clamp_scale(2.0), (2.0, false));
        assert_eq!(clamp_scale(0.0), (SCALE_EPSILON, true));
        assert_eq!(clamp_scale(-3.0), (SCALE_EPSILON, true));
        assert_eq!(clamp_scale(SCALE_EPSILON * 0.5), (SCALE_EPSILON, true));
        assert_eq!(clamp_scale(SCALE_EPSILON), (SCALE_EPSILON, false));
    }
}
