//! Angular output units shared by slope and aspect

use rasterforge_core::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Units for angular terrain products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleUnits {
    /// Degrees (slope 0-90, aspect -180..180)
    #[default]
    Degrees,
    /// Radians (slope 0-π/2, aspect -π..π)
    Radians,
}

impl AngleUnits {
    /// Convert an angle computed in radians
    #[inline]
    pub fn convert_radians(self, value: f64) -> f64 {
        match self {
            AngleUnits::Degrees => value.to_degrees(),
            AngleUnits::Radians => value,
        }
    }
}

impl FromStr for AngleUnits {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "degrees" | "deg" => Ok(AngleUnits::Degrees),
            "radians" | "rad" => Ok(AngleUnits::Radians),
            _ => Err(Error::InvalidUnit {
                name: "units",
                value: s.to_string(),
                expected: "'degrees' or 'radians'",
            }),
        }
    }
}

impl fmt::Display for AngleUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngleUnits::Degrees => f.write_str("degrees"),
            AngleUnits::Radians => f.write_str("radians"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!("degrees".parse::<AngleUnits>().unwrap(), AngleUnits::Degrees);
        assert_eq!("Radians".parse::<AngleUnits>().unwrap(), AngleUnits::Radians);

        assert_eq!(AngleUnits::Radians.convert_radians(1.5), 1.5);
        approx::assert_relative_eq!(AngleUnits::Degrees.convert_radians(std::f64::consts::PI), 180.0);

        let err = "furlongs".parse::<AngleUnits>().unwrap_err();
        assert!(matches!(err, Error::InvalidUnit { ref value, .. } if value == "furlongs"));
    }
}
