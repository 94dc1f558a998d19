//! Processor results

use ndarray::{ArrayD, ArrayView2, Axis};
use rasterforge_core::validation::stack_alpha;
use rasterforge_core::{Georeference, Raster, Result};

/// The result of a processor: a raw array or a new container.
///
/// Containers are float-scaled and carry the georeference of the primary
/// input when that input was itself a container.
#[derive(Debug, Clone, PartialEq)]
pub enum Product {
    Array(ArrayD<f64>),
    Raster(Raster),
}

impl Product {
    pub fn data(&self) -> Option<&ArrayD<f64>> {
        match self {
            Product::Array(a) => Some(a),
            Product::Raster(r) => r.data(),
        }
    }

    /// Bands in the result, alpha included
    pub fn band_count(&self) -> usize {
        match self.data() {
            Some(d) if d.ndim() == 3 => d.len_of(Axis(2)),
            Some(_) => 1,
            None => 0,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Product::Array(_))
    }

    pub fn as_raster(&self) -> Option<&Raster> {
        match self {
            Product::Raster(r) => Some(r),
            Product::Array(_) => None,
        }
    }

    pub fn into_array(self) -> Option<ArrayD<f64>> {
        match self {
            Product::Array(a) => Some(a),
            Product::Raster(r) => r.into_data(),
        }
    }

    /// Wrap an array result into a container with no georeference
    pub fn into_raster(self) -> Result<Raster> {
        match self {
            Product::Array(a) => Raster::from_array(a),
            Product::Raster(r) => Ok(r),
        }
    }
}

/// Stack the optional alpha and wrap the result as the caller asked.
pub(crate) fn finish(
    result: ArrayD<f64>,
    alpha: Option<ArrayView2<'_, f64>>,
    georef: Option<&Georeference>,
    as_array: bool,
) -> Result<Product> {
    let result = match alpha {
        Some(alpha) => stack_alpha(result, alpha)?,
        None => result,
    };
    if as_array {
        return Ok(Product::Array(result));
    }
    let georef = georef.cloned().unwrap_or_default();
    Ok(Product::Raster(Raster::derived(result, georef)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rasterforge_core::{GeoTransform, Scale};

    #[test]
    fn test_finish_wraps_with_georeference() {
        let georef = Georeference {
            transform: Some(GeoTransform::north_up(10.0, 20.0, 1.0, -1.0)),
            projection: Some("EPSG:4326".into()),
            metadata: None,
        };
        let product = finish(array![[1.0, 2.0]].into_dyn(), None, Some(&georef), false).unwrap();
        let raster = product.as_raster().unwrap();
        assert_eq!(raster.georeference(), &georef);
        assert_eq!(raster.scale(), Scale::Float);
        assert_eq!(product.band_count(), 1);
    }

    #[test]
    fn test_finish_stacks_alpha() {
        let alpha = array![[1.0, 0.0]];
        let product = finish(array![[1.0, 2.0]].into_dyn(), Some(alpha.view()), None, true).unwrap();
        assert!(product.is_array());
        assert_eq!(product.band_count(), 2);
        let data = product.into_array().unwrap();
        assert_eq!(data[[0, 1, 1]], 0.0);
    }
}
