//! The georeferenced layer container

use ndarray::{Array3, ArrayD, ArrayViewD, Axis};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::error::{Error, Result};
use crate::raster::{Band, GeoTransform, Georeference, Scale};

/// A georeferenced container of raster data.
///
/// A `Raster` holds an optional primary array (2-D for a single band, 3-D
/// with bands on the trailing axis), a fixed [`Scale`], the three
/// georeferencing fields and an instance-owned set of named [`Band`]s.
///
/// # Example
///
/// ```ignore
/// use rasterforge_core::{Raster, Scale};
///
/// let mut raster = Raster::new(Scale::Bits8);
/// raster.add_layer(ndarray::Array2::<u8>::zeros((4, 4)), "mask");
/// raster.rename_layer("mask", "water");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    data: Option<ArrayD<f64>>,
    scale: Scale,
    georef: Georeference,
    layers: HashMap<String, Band>,
}

impl Raster {
    /// Create an empty container with the given scale
    pub fn new(scale: Scale) -> Self {
        Self {
            data: None,
            scale,
            georef: Georeference::default(),
            layers: HashMap::new(),
        }
    }

    /// Wrap a derived 2-D or 3-D array. The scale is [`Scale::Float`].
    pub fn from_array(data: ArrayD<f64>) -> Result<Self> {
        check_dimensionality(&data)?;
        Ok(Self {
            data: Some(data),
            ..Self::new(Scale::Float)
        })
    }

    /// Wrap a derived array and carry forward a georeference
    pub fn derived(data: ArrayD<f64>, georef: Georeference) -> Result<Self> {
        let mut raster = Self::from_array(data)?;
        raster.georef = georef;
        Ok(raster)
    }

    // Primary array

    pub fn data(&self) -> Option<&ArrayD<f64>> {
        self.data.as_ref()
    }

    pub fn view(&self) -> Option<ArrayViewD<'_, f64>> {
        self.data.as_ref().map(|d| d.view())
    }

    /// Replace the primary array
    pub fn set_data(&mut self, data: ArrayD<f64>) -> Result<()> {
        check_dimensionality(&data)?;
        self.data = Some(data);
        Ok(())
    }

    pub fn into_data(self) -> Option<ArrayD<f64>> {
        self.data
    }

    /// Number of bands in the primary array (0 when there is none)
    pub fn count(&self) -> usize {
        match &self.data {
            Some(d) if d.ndim() == 3 => d.len_of(Axis(2)),
            Some(_) => 1,
            None => 0,
        }
    }

    /// Rows of the primary array, falling back to any named layer
    pub fn height(&self) -> usize {
        self.spatial_shape().map_or(0, |(rows, _)| rows)
    }

    /// Columns of the primary array, falling back to any named layer
    pub fn width(&self) -> usize {
        self.spatial_shape().map_or(0, |(_, cols)| cols)
    }

    fn spatial_shape(&self) -> Option<(usize, usize)> {
        match &self.data {
            Some(d) => Some((d.shape()[0], d.shape()[1])),
            None => self.layers.values().next().map(Band::shape),
        }
    }

    // Scale and georeferencing

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn georeference(&self) -> &Georeference {
        &self.georef
    }

    pub fn set_georeference(&mut self, georef: Georeference) {
        self.georef = georef;
    }

    pub fn transform(&self) -> Option<&GeoTransform> {
        self.georef.transform.as_ref()
    }

    pub fn set_transform(&mut self, transform: Option<GeoTransform>) {
        self.georef.transform = transform;
    }

    pub fn projection(&self) -> Option<&str> {
        self.georef.projection.as_deref()
    }

    pub fn set_projection(&mut self, projection: Option<String>) {
        self.georef.projection = projection;
    }

    pub fn metadata(&self) -> Option<&BTreeMap<String, String>> {
        self.georef.metadata.as_ref()
    }

    pub fn set_metadata(&mut self, metadata: Option<BTreeMap<String, String>>) {
        self.georef.metadata = metadata;
    }

    // Named layers

    pub fn layer(&self, name: &str) -> Option<&Band> {
        self.layers.get(name)
    }

    pub fn contains_layer(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Layer names in sorted order
    pub fn layer_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.layers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn layers(&self) -> impl Iterator<Item = (&str, &Band)> {
        self.layers.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Insert a layer unless the name is taken.
    ///
    /// A duplicate name is a no-op, not an error. Returns whether the layer
    /// was inserted.
    pub fn add_layer(&mut self, data: impl Into<Band>, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.layers.contains_key(&name) {
            return false;
        }
        self.layers.insert(name, data.into());
        true
    }

    /// Remove a layer if present
    pub fn remove_layer(&mut self, name: &str) -> Option<Band> {
        self.layers.remove(name)
    }

    /// Move the band stored under `old` to `new`.
    ///
    /// Overwrite wins: an existing layer called `new` is replaced. Returns
    /// false when `old` does not exist.
    pub fn rename_layer(&mut self, old: &str, new: impl Into<String>) -> bool {
        let new = new.into();
        if old == new {
            return self.layers.contains_key(old);
        }
        let Some(band) = self.layers.remove(old) else {
            return false;
        };
        if self.layers.insert(new.clone(), band).is_some() {
            warn!(from = old, to = %new, "rename_layer replaced an existing layer");
        }
        true
    }

    pub(crate) fn insert_layer(&mut self, name: String, band: Band) -> Option<Band> {
        self.layers.insert(name, band)
    }

    /// Combine named layers into one (rows, cols, bands) float array.
    ///
    /// Fails with [`Error::MissingBand`] for an unknown name and
    /// [`Error::SizeMismatch`] when the layers do not share spatial
    /// dimensions.
    pub fn stack_layers(&self, names: &[&str]) -> Result<Array3<f64>> {
        let mut bands = Vec::with_capacity(names.len());
        for name in names {
            let band = self.layers.get(*name).ok_or_else(|| Error::MissingBand {
                name: (*name).to_string(),
                available: self.layer_names().iter().map(|s| s.to_string()).collect(),
            })?;
            bands.push(band);
        }

        let Some(first) = bands.first() else {
            return Err(Error::validation("names", "at least one layer name is required"));
        };
        let shape = first.shape();
        for band in &bands[1..] {
            if band.shape() != shape {
                return Err(Error::size_mismatch("layers", shape, band.shape()));
            }
        }

        let mut out = Array3::zeros((shape.0, shape.1, bands.len()));
        for (i, band) in bands.iter().enumerate() {
            out.index_axis_mut(Axis(2), i).assign(&band.to_f64());
        }
        Ok(out)
    }
}

fn check_dimensionality(data: &ArrayD<f64>) -> Result<()> {
    match data.ndim() {
        2 | 3 => Ok(()),
        n => Err(Error::BadInputType {
            name: "data",
            expected: format!("a 2-D or 3-D array, got {n}-D"),
        }),
    }
}

impl TryFrom<ArrayD<f64>> for Raster {
    type Error = Error;

    fn try_from(data: ArrayD<f64>) -> Result<Self> {
        Raster::from_array(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2, IxDyn};

    #[test]
    fn test_layers_are_instance_owned() {
        let mut a = Raster::new(Scale::Bits8);
        let b = Raster::new(Scale::Bits8);
        a.add_layer(Array2::<u8>::zeros((2, 2)), "red");
        assert_eq!(a.layer_count(), 1);
        assert_eq!(b.layer_count(), 0);
    }

    #[test]
    fn test_add_layer_is_idempotent() {
        let mut raster = Raster::new(Scale::Bits8);
        assert!(raster.add_layer(array![[1u8, 2]], "red"));
        assert!(!raster.add_layer(array![[9u8, 9]], "red"));
        assert_eq!(raster.layer("red"), Some(&Band::U8(array![[1u8, 2]])));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut raster = Raster::new(Scale::Bits8);
        assert!(raster.remove_layer("nope").is_none());
        raster.add_layer(array![[1u8]], "a");
        assert!(raster.remove_layer("a").is_some());
        assert_eq!(raster.layer_count(), 0);
    }

    #[test]
    fn test_rename_overwrite_wins() {
        let mut raster = Raster::new(Scale::Bits8);
        raster.add_layer(array![[1u8]], "a");
        raster.add_layer(array![[2u8]], "b");

        assert!(raster.rename_layer("a", "b"));
        assert_eq!(raster.layer_names(), vec!["b"]);
        assert_eq!(raster.layer("b"), Some(&Band::U8(array![[1u8]])));

        assert!(!raster.rename_layer("missing", "c"));
        assert!(raster.rename_layer("b", "b"));
    }

    #[test]
    fn test_stack_layers_checks_shapes() {
        let mut raster = Raster::new(Scale::Bits8);
        raster.add_layer(array![[1u8, 2], [3, 4]], "a");
        raster.add_layer(array![[5u8, 6], [7, 8]], "b");
        raster.add_layer(array![[1u8, 2, 3]], "c");

        let stacked = raster.stack_layers(&["a", "b"]).unwrap();
        assert_eq!(stacked.dim(), (2, 2, 2));
        assert_eq!(stacked[[1, 1, 1]], 8.0);

        assert!(matches!(
            raster.stack_layers(&["a", "c"]),
            Err(Error::SizeMismatch { .. })
        ));
        assert!(matches!(
            raster.stack_layers(&["a", "z"]),
            Err(Error::MissingBand { .. })
        ));
    }

    #[test]
    fn test_from_array_dimensionality() {
        let raster = Raster::from_array(Array2::<f64>::zeros((3, 4)).into_dyn()).unwrap();
        assert_eq!((raster.height(), raster.width(), raster.count()), (3, 4, 1));
        assert_eq!(raster.scale(), Scale::Float);

        let stacked = Raster::from_array(ArrayD::zeros(IxDyn(&[3, 4, 2]))).unwrap();
        assert_eq!(stacked.count(), 2);

        let err = Raster::from_array(ArrayD::zeros(IxDyn(&[5]))).unwrap_err();
        assert!(matches!(err, Error::BadInputType { .. }));
    }

    #[test]
    fn test_set_data_replaces_primary() {
        let mut raster = Raster::new(Scale::Bits8);
        assert_eq!(raster.count(), 0);

        raster.set_data(ArrayD::zeros(IxDyn(&[2, 3, 4]))).unwrap();
        assert_eq!((raster.height(), raster.width(), raster.count()), (2, 3, 4));

        let err = raster.set_data(ArrayD::zeros(IxDyn(&[2, 3, 4, 1]))).unwrap_err();
        assert!(matches!(err, Error::BadInputType { .. }));
        assert_eq!(raster.count(), 4);
    }
}
