//! Aspect calculation from DEMs
//!
//! Direction of the elevation gradient, `atan2(-gy, gx)`.

use crate::maybe_rayon::collect_rows;
use crate::output::{finish, Product};
use rasterforge_core::validation::{check_layer, prepare_alpha, single_band};
use rasterforge_core::{LayerInput, Result};
use tracing::debug;

use super::gradient::gradient;
use super::units::AngleUnits;

/// Parameters for aspect calculation
#[derive(Debug, Clone, Default)]
pub struct AspectParams {
    pub units: AngleUnits,
    /// Return a raw array instead of a container
    pub as_array: bool,
}

/// Calculate aspect from a DEM
///
/// Aspect is the direction in which elevation increases, measured
/// counter-clockwise from east with north (decreasing row) at +90°:
/// - 0° = East
/// - 90° = North
/// - 180° = West
/// - -90° = South
///
/// Values lie in (-180°, 180°]. Flat cells have a zero gradient and get 0.
///
/// # Arguments
/// * `dem` - Elevation as a container or a single-band array
/// * `alpha` - Optional alpha channel, stacked once as the last band
/// * `params` - Output units and form
pub fn aspect<'a>(
    dem: impl Into<LayerInput<'a>>,
    alpha: Option<LayerInput<'a>>,
    params: AspectParams,
) -> Result<Product> {
    let dem = dem.into();
    let elevation = single_band(check_layer(&dem, "dem")?, "dem")?;
    let alpha = prepare_alpha(alpha.as_ref(), elevation.dim())?;

    let (rows, cols) = elevation.dim();
    debug!(rows, cols, units = %params.units, "aspect");

    let (gy, gx) = gradient(elevation)?;
    let units = params.units;
    let out = collect_rows(rows, cols, |row| {
        gy.row(row)
            .iter()
            .zip(gx.row(row))
            // + 0.0 turns -0.0 into 0.0: due west is +180 and flat is 0
            .map(|(&dy, &dx)| units.convert_radians((-dy + 0.0).atan2(dx + 0.0)))
            .collect()
    })?;

    finish(out.into_dyn(), alpha, dem.georeference(), params.as_array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array2;

    fn aspect_at_center(dem: Array2<f64>) -> f64 {
        let result = aspect(&dem, None, AspectParams::default()).unwrap();
        result.data().unwrap()[[2, 2]]
    }

    #[test]
    fn test_cardinal_directions() {
        // Rising eastward
        assert_relative_eq!(aspect_at_center(Array2::from_shape_fn((5, 5), |(_, c)| c as f64)), 0.0);
        // Rising northward (towards row 0)
        assert_relative_eq!(aspect_at_center(Array2::from_shape_fn((5, 5), |(r, _)| -(r as f64))), 90.0);
        // Rising westward
        assert_relative_eq!(aspect_at_center(Array2::from_shape_fn((5, 5), |(_, c)| -(c as f64))), 180.0);
        // Rising southward
        assert_relative_eq!(aspect_at_center(Array2::from_shape_fn((5, 5), |(r, _)| r as f64)), -90.0);
    }

    #[test]
    fn test_flat_is_zero() {
        let result = aspect(&Array2::from_elem((4, 4), 7.0), None, AspectParams::default()).unwrap();
        assert!(result.data().unwrap().iter().all(|&v| v == 0.0));

        // Negative zeros produce -0.0 differences, still flat
        let signed = ndarray::array![[0.0, -0.0], [0.0, -0.0]];
        let result = aspect(&signed, None, AspectParams::default()).unwrap();
        assert!(result.data().unwrap().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_radians() {
        let dem = Array2::from_shape_fn((5, 5), |(r, _)| -(r as f64));
        let params = AspectParams {
            units: AngleUnits::Radians,
            as_array: true,
        };
        let result = aspect(&dem, None, params).unwrap();
        assert!(result.is_array());
        assert_relative_eq!(result.data().unwrap()[[1, 1]], std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_alpha_stacked_once() {
        let dem = Array2::from_shape_fn((4, 4), |(r, c)| (r * c) as f64);
        let alpha = Array2::from_elem((4, 4), 1.0);
        let result = aspect(&dem, Some((&alpha).into()), AspectParams::default()).unwrap();
        assert_eq!(result.band_count(), 2);
    }

    #[test]
    fn test_nan_propagates() {
        let mut dem = Array2::from_shape_fn((4, 4), |(_, c)| c as f64);
        dem[[1, 1]] = f64::NAN;
        let result = aspect(&dem, None, AspectParams::default()).unwrap();
        assert!(result.data().unwrap()[[1, 2]].is_nan());
    }

    #[test]
    fn test_infinite_elevation_propagates() {
        let mut dem = Array2::from_shape_fn((4, 4), |(_, c)| c as f64);
        dem[[1, 1]] = f64::INFINITY;
        let data = aspect(&dem, None, AspectParams::default())
            .unwrap()
            .into_array()
            .unwrap();

        // East neighbour sees an unbounded rise to the west
        assert_relative_eq!(data[[1, 2]], 180.0);
        // West edge sees it to the east, the cell below sees it to the north
        assert_eq!(data[[1, 0]], 0.0);
        assert_relative_eq!(data[[2, 1]], 90.0);
    }
}
