//! Raster container and its building blocks

mod band;
mod element;
mod geotransform;
mod grid;
mod import;
mod scale;

pub use band::Band;
pub use element::{cast_band, PixelElement};
pub use geotransform::{GeoTransform, Georeference};
pub use grid::Raster;
pub use scale::Scale;
