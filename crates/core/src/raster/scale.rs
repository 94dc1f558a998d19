//! Bit-depth descriptor of a container

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Bit depth governing the storage type of absolute imports.
///
/// The scale is fixed when a [`Raster`](super::Raster) is constructed.
/// Relative imports always land in 8-bit storage regardless of scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Scale {
    /// Unsigned 8-bit
    #[default]
    Bits8,
    /// Unsigned 16-bit
    Bits16,
    /// Unsigned 32-bit
    Bits32,
    /// 64-bit float, used for derived products
    Float,
}

impl Scale {
    /// Parse a bit depth (8, 16, 32 or 64).
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            8 => Ok(Scale::Bits8),
            16 => Ok(Scale::Bits16),
            32 => Ok(Scale::Bits32),
            64 => Ok(Scale::Float),
            other => Err(Error::validation(
                "scale",
                format!("unsupported bit depth {other}, expected 8, 16, 32 or 64"),
            )),
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            Scale::Bits8 => 8,
            Scale::Bits16 => 16,
            Scale::Bits32 => 32,
            Scale::Float => 64,
        }
    }

    /// Largest representable value for integer scales
    pub fn max_value(self) -> f64 {
        match self {
            Scale::Bits8 => f64::from(u8::MAX),
            Scale::Bits16 => f64::from(u16::MAX),
            Scale::Bits32 => f64::from(u32::MAX),
            Scale::Float => f64::MAX,
        }
    }

    pub fn is_integer(self) -> bool {
        !matches!(self, Scale::Float)
    }
}

impl TryFrom<u32> for Scale {
    type Error = Error;

    fn try_from(bits: u32) -> Result<Self> {
        Scale::from_bits(bits)
    }
}

impl From<Scale> for u32 {
    fn from(scale: Scale) -> u32 {
        scale.bits()
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Float => write!(f, "float64"),
            other => write!(f, "{}-bit", other.bits()),
        }
    }
}
