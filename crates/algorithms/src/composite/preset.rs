//! Named spectral index presets
//!
//! Each preset is a formula over lowercase canonical band names: `blue`,
//! `green`, `red`, `nir`, `swir` (~1.6 µm) and `swir2` (~2.2 µm).

use rasterforge_core::{Error, Result};
use std::fmt;
use std::str::FromStr;

use super::formula::Formula;

/// Well-known normalized-difference and vegetation indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Normalized Difference Vegetation Index
    Ndvi,
    /// Normalized Difference Water Index (McFeeters)
    Ndwi,
    /// Modified NDWI (Xu)
    Mndwi,
    /// Normalized Burn Ratio
    Nbr,
    /// Normalized Difference Moisture Index
    Ndmi,
    /// Soil Adjusted Vegetation Index, L = 0.5
    Savi,
    /// Enhanced Vegetation Index
    Evi,
}

impl Preset {
    pub const ALL: [Preset; 7] = [
        Preset::Ndvi,
        Preset::Ndwi,
        Preset::Mndwi,
        Preset::Nbr,
        Preset::Ndmi,
        Preset::Savi,
        Preset::Evi,
    ];

    pub fn expression(self) -> &'static str {
        match self {
            Preset::Ndvi => "(nir - red) / (nir + red)",
            Preset::Ndwi => "(green - nir) / (green + nir)",
            Preset::Mndwi => "(green - swir) / (green + swir)",
            Preset::Nbr => "(nir - swir2) / (nir + swir2)",
            Preset::Ndmi => "(nir - swir) / (nir + swir)",
            Preset::Savi => "1.5 * (nir - red) / (nir + red + 0.5)",
            Preset::Evi => "2.5 * (nir - red) / (nir + 6 * red - 7.5 * blue + 1)",
        }
    }

    pub fn formula(self) -> Result<Formula> {
        Formula::parse(self.expression())
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Ndvi => "ndvi",
            Preset::Ndwi => "ndwi",
            Preset::Mndwi => "mndwi",
            Preset::Nbr => "nbr",
            Preset::Ndmi => "ndmi",
            Preset::Savi => "savi",
            Preset::Evi => "evi",
        }
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| Error::validation("preset", format!("unknown preset '{s}'")))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
