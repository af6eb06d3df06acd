//! Physical length units.

use serde::{Deserialize, Serialize};

/// A physical unit of length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LengthUnit {
    Kilometers,
    #[default]
    Meters,
    Centimeters,
    Millimeters,
    Miles,
    Yards,
    Feet,
    Inches,
}

impl LengthUnit {
    /// All supported units, metric first.
    pub const ALL: [LengthUnit; 8] = [
        LengthUnit::Kilometers,
        LengthUnit::Meters,
        LengthUnit::Centimeters,
        LengthUnit::Millimeters,
        LengthUnit::Miles,
        LengthUnit::Yards,
        LengthUnit::Feet,
        LengthUnit::Inches,
    ];

    /// Returns the length of one of this unit in meters.
    #[must_use]
    pub const fn meters_per_unit(self) -> f32 {
        match self {
            LengthUnit::Kilometers => 1000.0,
            LengthUnit::Meters => 1.0,
            LengthUnit::Centimeters => 0.01,
            LengthUnit::Millimeters => 0.001,
            LengthUnit::Miles => 1609.344,
            LengthUnit::Yards => 0.9144,
            LengthUnit::Feet => 0.3048,
            LengthUnit::Inches => 0.0254,
        }
    }

    /// Returns the unit's abbreviation.
    #[must_use]
    pub fn abbreviation(self) -> &'static str {
        match self {
            LengthUnit::Kilometers => "km",
            LengthUnit::Meters => "m",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Millimeters => "mm",
            LengthUnit::Miles => "mi",
            LengthUnit::Yards => "yd",
            LengthUnit::Feet => "ft",
            LengthUnit::Inches => "in",
        }
    }

    /// Returns whether this is a metric unit.
    #[must_use]
    pub fn is_metric(self) -> bool {
        matches!(
            self,
            LengthUnit::Kilometers
                | LengthUnit::Meters
                | LengthUnit::Centimeters
                | LengthUnit::Millimeters
        )
    }
}

/// Converts `value` expressed in `unit` to meters.
#[must_use]
pub fn to_meters(value: f32, unit: LengthUnit) -> f32 {
    value * unit.meters_per_unit()
}

/// Converts `meters` to the given unit.
#[must_use]
pub fn from_meters(meters: f32, unit: LengthUnit) -> f32 {
    meters / unit.meters_per_unit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters_is_identity() {
        assert_eq!(to_meters(3.5, LengthUnit::Meters), 3.5);
    }

    #[test]
    fn test_imperial_conversions() {
        assert!((to_meters(1.0, LengthUnit::Feet) - 0.3048).abs() < 1e-6);
        assert!((to_meters(12.0, LengthUnit::Inches) - 0.3048).abs() < 1e-6);
        assert!((to_meters(1.0, LengthUnit::Miles) - 1609.344).abs() < 1e-3);
    }

    #[test]
    fn test_from_meters_inverts_to_meters() {
        for unit in LengthUnit::ALL {
            let back = from_meters(to_meters(2.5, unit), unit);
            assert!((back - 2.5).abs() < 1e-4, "{}", unit.abbreviation());
        }
    }

    #[test]
    fn test_metric_flag() {
        assert!(LengthUnit::Millimeters.is_metric());
        assert!(!LengthUnit::Yards.is_metric());
    }
}
