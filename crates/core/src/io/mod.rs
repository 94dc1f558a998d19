//! Raster sources consumed by [`Raster::import_layers`](crate::Raster::import_layers)
//!
//! The core only needs read-by-index access to bands plus the dataset
//! georeference; format parsing lives behind [`RasterSource`].

#[cfg(feature = "gdal")]
mod gdal_io;
mod memory;
mod native;

#[cfg(feature = "gdal")]
pub use gdal_io::GdalSource;
pub use memory::MemorySource;
pub use native::TiffSource;

use ndarray::Array2;

use crate::error::Result;
use crate::raster::Georeference;

/// Read access to a multi-band raster dataset.
pub trait RasterSource {
    /// Number of bands available
    fn band_count(&self) -> usize;

    /// Read one band by its 1-based index
    fn read_band(&self, id: usize) -> Result<Array2<f64>>;

    /// Transform, projection and metadata of the dataset
    fn georeference(&self) -> Georeference {
        Georeference::default()
    }
}

pub(crate) fn band_out_of_range(id: usize, count: usize) -> crate::Error {
    crate::Error::validation(
        "id",
        format!("band {id} is out of range for a source with {count} band(s)"),
    )
}
