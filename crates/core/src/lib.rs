//! # RasterForge Core
//!
//! Core types and I/O for the RasterForge terrain library.
//!
//! This crate provides:
//! - `Raster`: georeferenced container of a primary array and named layers
//! - `Band` and `Scale`: typed layer storage and its bit depth
//! - `GeoTransform` / `Georeference`: affine transform, projection, metadata
//! - `RasterSource`: read-by-index access to imagery, with in-memory, TIFF
//!   and (feature `gdal`) GDAL backends
//! - `LayerInput` and `check_layer`: input normalization for processors

pub mod config;
pub mod error;
pub mod io;
pub mod raster;
pub mod validation;

pub use config::{BandConfig, ImportConfig, ImportMode};
pub use error::{Error, Result};
pub use io::RasterSource;
pub use raster::{Band, GeoTransform, Georeference, PixelElement, Raster, Scale};
pub use validation::LayerInput;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{BandConfig, ImportConfig, ImportMode};
    pub use crate::error::{Error, Result};
    pub use crate::io::{MemorySource, RasterSource, TiffSource};
    pub use crate::raster::{Band, GeoTransform, Georeference, Raster, Scale};
    pub use crate::validation::LayerInput;
}
