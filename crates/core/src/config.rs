//! Band import configuration
//!
//! Import records are plain serde structs so a host can keep them in a
//! JSON file next to the imagery:
//!
//! ```json
//! {
//!   "scale": 8,
//!   "bands": [
//!     { "id": 1, "name": "red", "type": "relative" },
//!     { "id": 4, "name": "elevation", "type": "absolute", "min": 0, "max": 255 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::raster::Scale;

/// How a band's values are brought onto the container scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Rescale the band's observed min/max to the configured range (8-bit)
    Relative,
    /// Trust the values and cast to the container scale
    Absolute,
}

impl FromStr for ImportMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "relative" => Ok(ImportMode::Relative),
            "absolute" => Ok(ImportMode::Absolute),
            other => Err(Error::validation(
                "type",
                format!("'{other}' is neither 'relative' nor 'absolute'"),
            )),
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportMode::Relative => f.write_str("relative"),
            ImportMode::Absolute => f.write_str("absolute"),
        }
    }
}

fn default_min() -> f64 {
    0.0
}

fn default_max() -> f64 {
    255.0
}

/// One band to read from a raster source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandConfig {
    /// 1-based band index in the source
    pub id: usize,
    /// Name of the layer created in the container
    pub name: String,
    #[serde(rename = "type")]
    pub mode: ImportMode,
    /// Lower bound of the target range
    #[serde(default = "default_min")]
    pub min: f64,
    /// Upper bound of the target range
    #[serde(default = "default_max")]
    pub max: f64,
}

impl BandConfig {
    /// Relative import onto the full 8-bit range
    pub fn relative(id: usize, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            mode: ImportMode::Relative,
            min: default_min(),
            max: default_max(),
        }
    }

    /// Absolute import, values cast to the container scale
    pub fn absolute(id: usize, name: impl Into<String>) -> Self {
        Self {
            mode: ImportMode::Absolute,
            ..Self::relative(id, name)
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

/// A complete import request: container scale plus band records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default)]
    pub scale: Scale,
    pub bands: Vec<BandConfig>,
}

impl ImportConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }
}
