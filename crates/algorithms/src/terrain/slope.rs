//! Slope calculation from DEMs
//!
//! Slope is the angle whose tangent is the magnitude of the local elevation
//! gradient, `atan(z_factor * sqrt(gy² + gx²))`, with gradients from
//! [`gradient`](super::gradient).

use crate::maybe_rayon::collect_rows;
use crate::output::{finish, Product};
use rasterforge_core::validation::{check_layer, prepare_alpha, single_band};
use rasterforge_core::{Error, LayerInput, Result};
use tracing::debug;

use super::gradient::gradient;
use super::units::AngleUnits;

/// Parameters for slope calculation
#[derive(Debug, Clone)]
pub struct SlopeParams {
    /// Output units
    pub units: AngleUnits,
    /// Vertical exaggeration applied to the gradient magnitude (default 1.0)
    pub z_factor: f64,
    /// Return a raw array instead of a container
    pub as_array: bool,
}

impl Default for SlopeParams {
    fn default() -> Self {
        Self {
            units: AngleUnits::Degrees,
            z_factor: 1.0,
            as_array: false,
        }
    }
}

/// Calculate slope from a DEM
///
/// # Arguments
/// * `dem` - Elevation as a container or a single-band array
/// * `alpha` - Optional alpha channel, stacked as the last band
/// * `params` - Slope calculation parameters
///
/// # Returns
/// Slope in the requested units, `[0, 90]` degrees or `[0, π/2]` radians.
/// NaN elevations propagate.
pub fn slope<'a>(
    dem: impl Into<LayerInput<'a>>,
    alpha: Option<LayerInput<'a>>,
    params: SlopeParams,
) -> Result<Product> {
    if !(params.z_factor.is_finite() && params.z_factor > 0.0) {
        return Err(Error::validation(
            "z_factor",
            format!("must be positive and finite, got {}", params.z_factor),
        ));
    }

    let dem = dem.into();
    let elevation = single_band(check_layer(&dem, "dem")?, "dem")?;
    let alpha = prepare_alpha(alpha.as_ref(), elevation.dim())?;

    let (rows, cols) = elevation.dim();
    debug!(rows, cols, units = %params.units, z_factor = params.z_factor, "slope");

    let (gy, gx) = gradient(elevation)?;
    let z = params.z_factor;
    let units = params.units;
    let out = collect_rows(rows, cols, |row| {
        gy.row(row)
            .iter()
            .zip(gx.row(row))
            .map(|(&dy, &dx)| units.convert_radians((z * dy.hypot(dx)).atan()))
            .collect()
    })?;

    finish(out.into_dyn(), alpha, dem.georeference(), params.as_array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};
    use rasterforge_core::{GeoTransform, Raster};

    fn tilted_plane() -> Array2<f64> {
        // z = row + col
        Array2::from_shape_fn((10, 10), |(r, c)| (r + c) as f64)
    }

    #[test]
    fn test_slope_flat() {
        let dem = Array2::from_elem((10, 10), 100.0);
        let result = slope(&dem, None, SlopeParams::default()).unwrap();
        let data = result.into_array().unwrap();
        assert!(data.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_slope_tilted() {
        let result = slope(&tilted_plane(), None, SlopeParams::default()).unwrap();
        let data = result.into_array().unwrap();

        // Every cell sees gradient (1, 1), edges included
        let expected = 2f64.sqrt().atan().to_degrees();
        for v in data.iter() {
            assert_relative_eq!(*v, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_slope_units() {
        let dem = tilted_plane();
        let deg = slope(&dem, None, SlopeParams::default()).unwrap();
        let rad = slope(
            &dem,
            None,
            SlopeParams {
                units: AngleUnits::Radians,
                ..Default::default()
            },
        )
        .unwrap();

        let deg_val = deg.data().unwrap()[[5, 5]];
        let rad_val = rad.data().unwrap()[[5, 5]];
        assert_relative_eq!(deg_val, rad_val.to_degrees(), epsilon = 1e-12);
    }

    #[test]
    fn test_z_factor_scales_gradient() {
        let dem = tilted_plane();
        let params = SlopeParams {
            units: AngleUnits::Radians,
            z_factor: 2.0,
            as_array: true,
        };
        let result = slope(&dem, None, params).unwrap();
        assert_relative_eq!(
            result.data().unwrap()[[4, 4]],
            (2.0 * 2f64.sqrt()).atan(),
            epsilon = 1e-12
        );

        let bad = SlopeParams {
            z_factor: 0.0,
            ..Default::default()
        };
        assert!(slope(&dem, None, bad).unwrap_err().is_validation());
    }

    #[test]
    fn test_peak_neighbours_are_symmetric() {
        let dem = array![[1.0, 1.0, 1.0], [1.0, 5.0, 1.0], [1.0, 1.0, 1.0]];
        let data = slope(&dem, None, SlopeParams::default())
            .unwrap()
            .into_array()
            .unwrap();

        let north = data[[0, 1]];
        for v in [data[[1, 0]], data[[1, 2]], data[[2, 1]]] {
            assert_relative_eq!(v, north, epsilon = 1e-12);
        }
        assert_relative_eq!(north, 4f64.atan().to_degrees(), epsilon = 1e-12);
        let max = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(max, north, epsilon = 1e-12);
    }

    #[test]
    fn test_nan_propagates() {
        let mut dem = tilted_plane();
        dem[[4, 4]] = f64::NAN;
        let data = slope(&dem, None, SlopeParams::default())
            .unwrap()
            .into_array()
            .unwrap();

        for (r, c) in [(3, 4), (5, 4), (4, 3), (4, 5)] {
            assert!(data[[r, c]].is_nan(), "({r}, {c})");
        }
        assert!(data[[0, 0]].is_finite());
    }

    #[test]
    fn test_infinite_elevation_is_vertical() {
        let mut dem = tilted_plane();
        dem[[4, 4]] = f64::INFINITY;
        let params = SlopeParams {
            units: AngleUnits::Radians,
            as_array: true,
            ..Default::default()
        };
        let data = slope(&dem, None, params).unwrap().into_array().unwrap();

        for (r, c) in [(3, 4), (5, 4), (4, 3), (4, 5)] {
            assert_eq!(data[[r, c]], std::f64::consts::FRAC_PI_2, "({r}, {c})");
        }
    }

    #[test]
    fn test_container_keeps_georeference() {
        let mut dem = Raster::from_array(tilted_plane().into_dyn()).unwrap();
        dem.set_transform(Some(GeoTransform::north_up(0.0, 10.0, 1.0, -1.0)));
        dem.set_projection(Some("EPSG:32630".into()));

        let result = slope(&dem, None, SlopeParams::default()).unwrap();
        let raster = result.as_raster().unwrap();
        assert_eq!(raster.georeference(), dem.georeference());
    }

    #[test]
    fn test_alpha_stacked_once() {
        let dem = tilted_plane();
        let alpha = Array2::from_elem((10, 10), 255.0);
        let result = slope(&dem, Some((&alpha).into()), SlopeParams::default()).unwrap();
        assert_eq!(result.band_count(), 2);
        assert_eq!(result.data().unwrap()[[3, 3, 1]], 255.0);

        let small = Array2::from_elem((2, 2), 1.0);
        let err = slope(&dem, Some((&small).into()), SlopeParams::default()).unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { .. }));
    }
}
