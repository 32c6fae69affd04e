//! Unit conversion at the communicator boundary.
//!
//! Callers pick the units they like; the wire always carries radians for
//! position and revolutions per second for velocity.

use serde::{Deserialize, Serialize};

/// Unit for positions passed to and from the communicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PositionUnit {
    /// Radians (wire unit).
    #[default]
    Radians,
    /// Degrees.
    Degrees,
}

/// Unit for velocities passed to and from the communicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VelocityUnit {
    /// Revolutions per second (wire unit).
    #[default]
    Rps,
    /// Revolutions per minute.
    Rpm,
}

/// Convert a position in `unit` to radians.
pub fn to_wire_position(value: f64, unit: PositionUnit) -> f64 {
    match unit {
        PositionUnit::Radians => value,
        PositionUnit::Degrees => value.to_radians(),
    }
}

/// Convert a position in radians to `unit`.
pub fn from_wire_position(value: f64, unit: PositionUnit) -> f64 {
    match unit {
        PositionUnit::Radians => value,
        PositionUnit::Degrees => value.to_degrees(),
    }
}

/// Convert a velocity in `unit` to revolutions per second.
pub fn to_wire_velocity(value: f64, unit: VelocityUnit) -> f64 {
    match unit {
        VelocityUnit::Rps => value,
        VelocityUnit::Rpm => value / 60.0,
    }
}

/// Convert a velocity in revolutions per second to `unit`.
pub fn from_wire_velocity(value: f64, unit: VelocityUnit) -> f64 {
    match unit {
        VelocityUnit::Rps => value,
        VelocityUnit::Rpm => value * 60.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_degrees_to_radians() {
        assert_relative_eq!(to_wire_position(180.0, PositionUnit::Degrees), PI);
        assert_relative_eq!(to_wire_position(-90.0, PositionUnit::Degrees), -PI / 2.0);
    }

    #[test]
    fn test_radians_pass_through_exactly() {
        for x in [0.0, -0.0, 1.0, PI, 1e-300, 12345.678] {
            assert_eq!(to_wire_position(x, PositionUnit::Radians).to_bits(), x.to_bits());
        }
    }

    #[test]
    fn test_large_finite_degrees_stay_finite() {
        let wire = to_wire_position(1e308, PositionUnit::Degrees);
        assert!(wire.is_finite());
        assert_relative_eq!(wire, 1e308 * (PI / 180.0));
        assert!(to_wire_position(f64::MAX, PositionUnit::Degrees).is_finite());
        assert!(from_wire_position(1e306, PositionUnit::Degrees).is_finite());
    }

    #[test]
    fn test_rpm_to_rps() {
        assert_relative_eq!(to_wire_velocity(60.0, VelocityUnit::Rpm), 1.0);
        assert_eq!(to_wire_velocity(50.0, VelocityUnit::Rps), 50.0);
    }

    #[test]
    fn test_back_conversion() {
        assert_relative_eq!(from_wire_position(PI, PositionUnit::Degrees), 180.0);
        assert_relative_eq!(from_wire_velocity(0.5, VelocityUnit::Rpm), 30.0);
        let deg = 37.5;
        assert_relative_eq!(
            from_wire_position(to_wire_position(deg, PositionUnit::Degrees), PositionUnit::Degrees),
            deg,
            epsilon = 1e-12
        );
    }
}
