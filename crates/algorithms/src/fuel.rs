//! Fuel-model map
//!
//! Classifies every pixel into a fuel model from vegetation density,
//! canopy height and optional exclusion layers (distance, water,
//! artificial structures). The codes are caller-defined.

use ndarray::ArrayView2;
use rasterforge_core::validation::{check_layer, prepare_alpha, single_band};
use rasterforge_core::{Error, LayerInput, Result};
use tracing::debug;

use crate::maybe_rayon::collect_rows;
use crate::output::{finish, Product};

/// Input layers of the fuel-model map
#[derive(Debug, Clone)]
pub struct FuelLayers<'a> {
    /// Vegetation density, e.g. an NDVI composite
    pub density: LayerInput<'a>,
    /// Canopy height in map units
    pub canopy_height: LayerInput<'a>,
    /// Distance to a feature that suppresses fuel below `min_distance`
    pub distance: Option<LayerInput<'a>>,
    /// Non-zero where there is open water
    pub water: Option<LayerInput<'a>>,
    /// Non-zero where there are buildings or roads
    pub structures: Option<LayerInput<'a>>,
    pub alpha: Option<LayerInput<'a>>,
}

impl<'a> FuelLayers<'a> {
    pub fn new(density: impl Into<LayerInput<'a>>, canopy_height: impl Into<LayerInput<'a>>) -> Self {
        Self {
            density: density.into(),
            canopy_height: canopy_height.into(),
            distance: None,
            water: None,
            structures: None,
            alpha: None,
        }
    }
}

/// Fuel-model codes and classification thresholds
#[derive(Debug, Clone)]
pub struct FuelParams {
    /// Code for tall canopy over sparse vegetation
    pub trees: f64,
    /// Code for tall canopy over dense vegetation
    pub trees_vegetation: f64,
    /// Code for dense vegetation without tall canopy
    pub vegetation: f64,
    pub non_burnable: f64,
    /// Density at or above which vegetation counts as dense
    pub density_threshold: f64,
    /// Canopy height at or above which a pixel counts as treed
    pub canopy_threshold: f64,
    /// Pixels closer than this to the distance feature are non-burnable
    pub min_distance: f64,
    /// Return a raw array instead of a container
    pub as_array: bool,
}

impl Default for FuelParams {
    fn default() -> Self {
        // Anderson (1982) timber litter, timber with understory, brush
        Self {
            trees: 8.0,
            trees_vegetation: 10.0,
            vegetation: 5.0,
            non_burnable: 0.0,
            density_threshold: 0.3,
            canopy_threshold: 2.0,
            min_distance: 0.0,
            as_array: false,
        }
    }
}

impl FuelParams {
    fn classify(&self, density: f64, canopy: f64, excluded: bool) -> f64 {
        if excluded {
            return self.non_burnable;
        }
        let dense = density >= self.density_threshold;
        let treed = canopy >= self.canopy_threshold;
        match (treed, dense) {
            (true, true) => self.trees_vegetation,
            (true, false) => self.trees,
            (false, true) => self.vegetation,
            (false, false) => self.non_burnable,
        }
    }
}

/// Build a fuel-model map
///
/// Per pixel, in order: water, structures or a distance below
/// `min_distance` give `non_burnable`; then tall canopy over dense
/// vegetation, tall canopy, dense vegetation; anything else is
/// `non_burnable`. A NaN in any supplied layer gives NaN.
///
/// All layers must share one spatial shape. The georeference comes from
/// the density layer when it is a container.
pub fn fuel_map(layers: &FuelLayers<'_>, params: &FuelParams) -> Result<Product> {
    for (name, value) in [
        ("density_threshold", params.density_threshold),
        ("canopy_threshold", params.canopy_threshold),
        ("min_distance", params.min_distance),
    ] {
        if value.is_nan() {
            return Err(Error::validation(name, "must not be NaN"));
        }
    }

    let density = single_band(check_layer(&layers.density, "density")?, "density")?;
    let shape = density.dim();
    let canopy = congruent(&layers.canopy_height, "canopy_height", shape)?;
    let distance = optional(layers.distance.as_ref(), "distance", shape)?;
    let water = optional(layers.water.as_ref(), "water", shape)?;
    let structures = optional(layers.structures.as_ref(), "structures", shape)?;
    let alpha = prepare_alpha(layers.alpha.as_ref(), shape)?;

    let (rows, cols) = shape;
    debug!(
        rows,
        cols,
        distance = distance.is_some(),
        water = water.is_some(),
        structures = structures.is_some(),
        "fuel map"
    );

    let sample = |layer: &Option<ArrayView2<'_, f64>>, row: usize, col: usize| {
        layer.as_ref().map(|l| l[[row, col]])
    };
    let out = collect_rows(rows, cols, |row| {
        (0..cols)
            .map(|col| {
                let d = density[[row, col]];
                let c = canopy[[row, col]];
                let dist = sample(&distance, row, col);
                let wet = sample(&water, row, col);
                let built = sample(&structures, row, col);

                let any_nan = d.is_nan()
                    || c.is_nan()
                    || [dist, wet, built].iter().flatten().any(|v| v.is_nan());
                if any_nan {
                    return f64::NAN;
                }

                let excluded = wet.is_some_and(|w| w > 0.0)
                    || built.is_some_and(|s| s > 0.0)
                    || dist.is_some_and(|x| x < params.min_distance);
                params.classify(d, c, excluded)
            })
            .collect()
    })?;

    finish(out.into_dyn(), alpha, layers.density.georeference(), params.as_array)
}

fn congruent<'a>(
    input: &LayerInput<'a>,
    name: &'static str,
    shape: (usize, usize),
) -> Result<ArrayView2<'a, f64>> {
    let band = single_band(check_layer(input, name)?, name)?;
    if band.dim() != shape {
        return Err(Error::size_mismatch(name, shape, band.dim()));
    }
    Ok(band)
}

fn optional<'a>(
    input: Option<&LayerInput<'a>>,
    name: &'static str,
    shape: (usize, usize),
) -> Result<Option<ArrayView2<'a, f64>>> {
    input.map(|i| congruent(i, name, shape)).transpose()
}
