//! Raster source backed by GDAL
//!
//! Any format GDAL can open works here, GeoTIFF included. Bands are read
//! lazily, one full-extent window per call.

use gdal::{Dataset, Metadata};
use ndarray::Array2;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use super::{band_out_of_range, RasterSource};
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Georeference};

/// An open GDAL dataset
pub struct GdalSource {
    dataset: Dataset,
}

impl GdalSource {
    /// Open a dataset
    ///
    /// # Example
    /// ```ignore
    /// let source = GdalSource::open("scene.tif")?;
    /// raster.import_layers(&source, &config.bands)?;
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let dataset = Dataset::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), bands = dataset.raster_count(), "opened dataset");
        Ok(Self { dataset })
    }
}

impl RasterSource for GdalSource {
    fn band_count(&self) -> usize {
        self.dataset.raster_count()
    }

    fn read_band(&self, id: usize) -> Result<Array2<f64>> {
        if id == 0 || id > self.band_count() {
            return Err(band_out_of_range(id, self.band_count()));
        }
        let (cols, rows) = self.dataset.raster_size();
        let band = self.dataset.rasterband(id)?;
        let buffer = band.read_as::<f64>((0, 0), (cols, rows), (cols, rows), None)?;
        Array2::from_shape_vec((rows, cols), buffer.data().to_vec())
            .map_err(|e| Error::Other(e.to_string()))
    }

    fn georeference(&self) -> Georeference {
        let projection = Some(self.dataset.projection()).filter(|p| !p.is_empty());
        let metadata = self.dataset.metadata_domain("").map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.split_once('='))
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>()
        });

        Georeference {
            transform: self.dataset.geo_transform().ok().map(GeoTransform::from_coefficients),
            projection,
            metadata,
        }
    }
}
