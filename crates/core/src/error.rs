//! Error types for RasterForge

use thiserror::Error;

/// Main error type for RasterForge operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An argument is neither a container nor a usable raw array.
    #[error("bad input for '{name}': expected {expected}")]
    BadInputType { name: &'static str, expected: String },

    #[error("invalid value for '{name}': {reason}")]
    Validation { name: &'static str, reason: String },

    #[error("shape mismatch for '{name}': expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch {
        name: &'static str,
        er: usize,
        ec: usize,
        ar: usize,
        ac: usize,
    },

    #[error("invalid units for '{name}': got '{value}', expected {expected}")]
    InvalidUnit {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("band '{name}' not found (available: {available:?})")]
    MissingBand { name: String, available: Vec<String> },

    #[error("formula error: {0}")]
    Formula(String),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("raster decode error: {0}")]
    Decode(String),

    #[error("GDAL error: {0}")]
    #[cfg(feature = "gdal")]
    Gdal(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error belongs to the validation class: shape mismatch,
    /// out-of-range values, malformed parameters or formulas.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::Validation { .. } | Error::SizeMismatch { .. } | Error::Formula(_)
        )
    }

    pub fn validation(name: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            name,
            reason: reason.into(),
        }
    }

    pub fn size_mismatch(
        name: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> Self {
        Error::SizeMismatch {
            name,
            er: expected.0,
            ec: expected.1,
            ar: actual.0,
            ac: actual.1,
        }
    }
}

#[cfg(feature = "gdal")]
impl From<gdal::errors::GdalError> for Error {
    fn from(e: gdal::errors::GdalError) -> Self {
        Error::Gdal(e.to_string())
    }
}

/// Result type alias for RasterForge operations
pub type Result<T> = std::result::Result<T, Error>;
