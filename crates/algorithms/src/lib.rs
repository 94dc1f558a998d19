//! # RasterForge Algorithms
//!
//! Derived products over RasterForge containers and raw arrays.
//!
//! ## Available Algorithm Categories
//!
//! - **terrain**: Slope, aspect
//! - **distance**: Thresholded distance transform (chamfer or exact)
//! - **composite**: Band formulas and spectral index presets
//! - **fuel**: Fuel-model classification
//!
//! Every processor validates its inputs before computing, optionally
//! stacks an alpha channel as the last band, and returns a [`Product`]
//! that is either a raw array or a new container carrying the input's
//! georeference.

pub mod composite;
pub mod distance;
pub mod fuel;
pub(crate) mod maybe_rayon;
pub mod output;
pub mod terrain;

pub use output::Product;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::composite::{composite, composite_layers, CompositeParams, Formula, Preset};
    pub use crate::distance::{distance, DistanceParams, MaskSize, Thresholds};
    pub use crate::fuel::{fuel_map, FuelLayers, FuelParams};
    pub use crate::output::Product;
    pub use crate::terrain::{aspect, slope, AngleUnits, AspectParams, SlopeParams};
    pub use rasterforge_core::prelude::*;
}
