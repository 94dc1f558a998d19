//! Foreground selection for the distance transform

use rasterforge_core::{Error, Result};

/// Rule deciding which pixels are foreground
#[derive(Debug, Clone, Copy)]
pub enum Thresholds {
    /// Inclusive value range `lower..=upper`
    Range { lower: f64, upper: f64 },
    /// Arbitrary per-pixel test
    Predicate(fn(f64) -> bool),
}

impl Thresholds {
    /// A validated inclusive range
    pub fn range(lower: f64, upper: f64) -> Result<Self> {
        let t = Thresholds::Range { lower, upper };
        t.validate()?;
        Ok(t)
    }

    /// Reject NaN or reversed bounds
    pub fn validate(&self) -> Result<()> {
        match *self {
            Thresholds::Range { lower, upper } if lower.is_nan() || upper.is_nan() || lower > upper => {
                Err(Error::validation(
                    "thresholds",
                    format!("bounds ({lower}, {upper}) are not ordered"),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Whether `value` is foreground. NaN never falls inside a range.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            Thresholds::Range { lower, upper } => value >= lower && value <= upper,
            Thresholds::Predicate(test) => test(value),
        }
    }
}

impl TryFrom<(f64, f64)> for Thresholds {
    type Error = Error;

    fn try_from((lower, upper): (f64, f64)) -> Result<Self> {
        Thresholds::range(lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_inclusive() {
        let t = Thresholds::range(2.0, 4.0).unwrap();
        assert!(t.contains(2.0));
        assert!(t.contains(4.0));
        assert!(!t.contains(4.5));
        assert!(!t.contains(f64::NAN));
    }

    #[test]
    fn test_malformed_ranges() {
        assert!(Thresholds::range(5.0, 1.0).unwrap_err().is_validation());
        assert!(Thresholds::try_from((f64::NAN, 1.0)).is_err());
        assert!(Thresholds::Range { lower: 3.0, upper: 3.0 }.validate().is_ok());
    }

    #[test]
    fn test_predicate() {
        let t = Thresholds::Predicate(|v| v < 0.0);
        assert!(t.contains(-1.0));
        assert!(!t.contains(1.0));
    }
}
