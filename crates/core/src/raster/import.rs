//! Band import from raster sources

use ndarray::{Array2, ArrayView2};
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::config::{BandConfig, ImportMode};
use crate::error::{Error, Result};
use crate::io::{band_out_of_range, RasterSource};
use crate::raster::{cast_band, Band, Raster, Scale};

impl Raster {
    /// Read the configured bands from `source` into named layers.
    ///
    /// Every record is validated before any band is read, so a bad record
    /// leaves the container untouched. Relative records rescale the band's
    /// own observed min/max onto `[min, max]` and store 8-bit values;
    /// absolute records are cast to the container scale. The container
    /// adopts the source georeference.
    pub fn import_layers<S>(&mut self, source: &S, configs: &[BandConfig]) -> Result<()>
    where
        S: RasterSource + ?Sized,
    {
        validate_configs(source.band_count(), configs)?;

        let mut imported = Vec::with_capacity(configs.len());
        for config in configs {
            let values = source.read_band(config.id)?;
            let band = match config.mode {
                ImportMode::Relative => Band::U8(rescale_relative(values.view(), config.min, config.max)),
                ImportMode::Absolute => cast_absolute(values.view(), self.scale()),
            };
            debug!(name = %config.name, id = config.id, mode = %config.mode, "band read");
            imported.push((config.name.clone(), band));
        }

        for (name, band) in imported {
            if self.insert_layer(name.clone(), band).is_some() {
                warn!(%name, "import replaced an existing layer");
            }
        }
        self.set_georeference(source.georeference());

        info!(bands = configs.len(), scale = %self.scale(), "layers imported");
        Ok(())
    }
}

fn validate_configs(band_count: usize, configs: &[BandConfig]) -> Result<()> {
    let mut names = HashSet::new();
    for config in configs {
        if config.id == 0 || config.id > band_count {
            return Err(band_out_of_range(config.id, band_count));
        }
        if !names.insert(config.name.as_str()) {
            return Err(Error::validation(
                "name",
                format!("layer '{}' is configured twice", config.name),
            ));
        }
        if config.min.is_nan() || config.max.is_nan() || config.min > config.max {
            return Err(Error::validation(
                "min/max",
                format!("range [{}, {}] is not ordered", config.min, config.max),
            ));
        }
        if config.mode == ImportMode::Relative && (config.min < 0.0 || config.max > 255.0) {
            return Err(Error::validation(
                "min/max",
                format!(
                    "relative range [{}, {}] does not fit 8-bit storage",
                    config.min, config.max
                ),
            ));
        }
    }
    Ok(())
}

/// Linear rescale of the observed band range onto `[min, max]`, truncated
/// to u8. NaN pixels and constant bands land on `min`.
pub(crate) fn rescale_relative(values: ArrayView2<'_, f64>, min: f64, max: f64) -> Array2<u8> {
    let (lo, hi) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    let span = hi - lo;
    if !span.is_finite() || span <= 0.0 {
        return Array2::from_elem(values.dim(), min as u8);
    }

    let factor = (max - min) / span;
    values.mapv(|v| {
        if v.is_nan() {
            min as u8
        } else {
            (min + (v - lo) * factor).clamp(min, max) as u8
        }
    })
}

fn cast_absolute(values: ArrayView2<'_, f64>, scale: Scale) -> Band {
    if scale.is_integer() {
        let ceiling = scale.max_value();
        let clipped = values.iter().filter(|&&v| v < 0.0 || v > ceiling).count();
        if clipped > 0 {
            warn!(clipped, %scale, "values outside the scale range saturate");
        }
    }
    match scale {
        Scale::Bits8 => Band::U8(cast_band(values)),
        Scale::Bits16 => Band::U16(cast_band(values)),
        Scale::Bits32 => Band::U32(cast_band(values)),
        Scale::Float => Band::F64(values.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemorySource;
    use crate::raster::GeoTransform;
    use ndarray::array;

    fn source() -> MemorySource {
        MemorySource::new(vec![
            array![[10.0, 20.0], [30.0, 50.0]],
            array![[0.0, 100.0], [200.0, 255.0]],
        ])
        .with_transform(GeoTransform::north_up(0.0, 2.0, 1.0, -1.0))
        .with_projection("EPSG:32633")
    }

    #[test]
    fn test_relative_uses_band_extent() {
        let mut raster = Raster::new(Scale::Bits8);
        raster
            .import_layers(&source(), &[BandConfig::relative(1, "red")])
            .unwrap();

        let band = raster.layer("red").and_then(Band::as_u8).unwrap();
        assert_eq!(band, &array![[0u8, 63], [127, 255]]);
        assert_eq!(raster.projection(), Some("EPSG:32633"));
        assert!(raster.transform().is_some());
    }

    #[test]
    fn test_relative_custom_range() {
        let values = array![[0.0, 5.0, 10.0]];
        let out = rescale_relative(values.view(), 100.0, 200.0);
        assert_eq!(out, array![[100u8, 150, 200]]);
    }

    #[test]
    fn test_constant_and_nan_bands() {
        let flat = array![[7.0, 7.0], [7.0, f64::NAN]];
        assert_eq!(rescale_relative(flat.view(), 10.0, 20.0), array![[10u8, 10], [10, 10]]);

        let with_nan = array![[0.0, f64::NAN, 10.0]];
        assert_eq!(rescale_relative(with_nan.view(), 0.0, 255.0), array![[0u8, 0, 255]]);
    }

    #[test]
    fn test_absolute_keeps_values() {
        let mut raster = Raster::new(Scale::Bits16);
        raster
            .import_layers(&source(), &[BandConfig::absolute(2, "dem")])
            .unwrap();
        assert_eq!(
            raster.layer("dem"),
            Some(&Band::U16(array![[0u16, 100], [200, 255]]))
        );
    }

    #[test]
    fn test_import_replaces_existing_layer() {
        let mut raster = Raster::new(Scale::Bits8);
        raster.add_layer(array![[9u8, 9], [9, 9]], "red");
        raster
            .import_layers(&source(), &[BandConfig::relative(1, "red")])
            .unwrap();

        assert_eq!(raster.layer_count(), 1);
        assert_eq!(raster.layer("red"), Some(&Band::U8(array![[0u8, 63], [127, 255]])));
    }

    #[test]
    fn test_absolute_saturates_at_scale_limit() {
        let wide = MemorySource::new(vec![array![[-5.0, 300.0], [70_000.0, 12.7]]]);
        let mut raster = Raster::new(Scale::Bits8);
        raster
            .import_layers(&wide, &[BandConfig::absolute(1, "b")])
            .unwrap();
        assert_eq!(raster.layer("b"), Some(&Band::U8(array![[0u8, 255], [255, 12]])));
    }

    #[test]
    fn test_source_metadata_is_adopted() {
        let metadata = std::collections::BTreeMap::from([("sensor".to_string(), "OLI".to_string())]);
        let mut raster = Raster::new(Scale::Bits8);
        raster
            .import_layers(&source().with_metadata(metadata.clone()), &[BandConfig::absolute(1, "red")])
            .unwrap();
        assert_eq!(raster.metadata(), Some(&metadata));
    }

    #[test]
    fn test_bad_records_leave_container_untouched() {
        let mut raster = Raster::new(Scale::Bits8);
        let configs = [BandConfig::relative(1, "red"), BandConfig::relative(3, "nir")];
        let err = raster.import_layers(&source(), &configs).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(raster.layer_count(), 0);

        let zero = raster.import_layers(&source(), &[BandConfig::absolute(0, "x")]);
        assert!(zero.unwrap_err().is_validation());

        let dup = [BandConfig::relative(1, "a"), BandConfig::relative(2, "a")];
        assert!(raster.import_layers(&source(), &dup).unwrap_err().is_validation());

        let wide = [BandConfig::relative(1, "a").with_range(0.0, 1000.0)];
        assert!(raster.import_layers(&source(), &wide).unwrap_err().is_validation());

        let reversed = [BandConfig::absolute(1, "a").with_range(10.0, 0.0)];
        assert!(raster.import_layers(&source(), &reversed).unwrap_err().is_validation());
    }
}
