//! In-memory raster source for synthetic data

use ndarray::Array2;
use std::collections::BTreeMap;

use super::{band_out_of_range, RasterSource};
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Georeference};

/// Bands held in memory, all of the same shape.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    bands: Vec<Array2<f64>>,
    georef: Georeference,
}

impl MemorySource {
    pub fn new(bands: Vec<Array2<f64>>) -> Self {
        Self {
            bands,
            georef: Georeference::default(),
        }
    }

    /// Build a source, rejecting bands that disagree on shape
    pub fn try_new(bands: Vec<Array2<f64>>) -> Result<Self> {
        if let Some(first) = bands.first() {
            let shape = first.dim();
            if let Some(bad) = bands.iter().find(|b| b.dim() != shape) {
                return Err(Error::size_mismatch("bands", shape, bad.dim()));
            }
        }
        Ok(Self::new(bands))
    }

    pub fn with_transform(mut self, transform: GeoTransform) -> Self {
        self.georef.transform = Some(transform);
        self
    }

    pub fn with_projection(mut self, projection: impl Into<String>) -> Self {
        self.georef.projection = Some(projection.into());
        self
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.georef.metadata = Some(metadata);
        self
    }
}

impl RasterSource for MemorySource {
    fn band_count(&self) -> usize {
        self.bands.len()
    }

    fn read_band(&self, id: usize) -> Result<Array2<f64>> {
        id.checked_sub(1)
            .and_then(|i| self.bands.get(i))
            .cloned()
            .ok_or_else(|| band_out_of_range(id, self.bands.len()))
    }

    fn georeference(&self) -> Georeference {
        self.georef.clone()
    }
}
