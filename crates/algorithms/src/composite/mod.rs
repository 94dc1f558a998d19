//! Band compositing
//!
//! Evaluates a [`Formula`] (or a [`Preset`] index) pixel by pixel over
//! named single-band inputs and returns a single-band product.

mod formula;
mod preset;

pub use formula::Formula;
pub use preset::Preset;

use ndarray::{Array2, ArrayView2};
use rasterforge_core::validation::{check_layer, prepare_alpha, single_band};
use rasterforge_core::{Error, Georeference, LayerInput, Raster, Result};
use std::collections::HashMap;
use tracing::debug;

use crate::maybe_rayon::collect_rows;
use crate::output::{finish, Product};

/// Parameters for compositing
#[derive(Debug, Clone, Default)]
pub struct CompositeParams {
    /// Return a raw array instead of a container
    pub as_array: bool,
}

/// Evaluate `formula` over the named inputs in `bands`.
///
/// Every band the formula references must be present
/// ([`Error::MissingBand`]) and all of them must share one spatial shape
/// ([`Error::SizeMismatch`]). Extra entries are ignored. A container
/// product takes its georeference from the first referenced input that is
/// a container.
///
/// # Example
/// ```ignore
/// let mut bands = HashMap::new();
/// bands.insert("nir", LayerInput::from(&nir));
/// bands.insert("red", LayerInput::from(&red));
/// let ndvi = composite(&bands, &Preset::Ndvi.formula()?, None, CompositeParams::default())?;
/// ```
pub fn composite<'a>(
    bands: &HashMap<&str, LayerInput<'a>>,
    formula: &Formula,
    alpha: Option<LayerInput<'a>>,
    params: CompositeParams,
) -> Result<Product> {
    let mut views = Vec::with_capacity(formula.bands().len());
    let mut georef = None;
    for name in formula.bands() {
        let input = bands.get(name.as_str()).ok_or_else(|| Error::MissingBand {
            name: name.clone(),
            available: sorted_names(bands.keys().copied()),
        })?;
        views.push(single_band(check_layer(input, "bands")?, "bands")?);
        if georef.is_none() {
            georef = input.georeference();
        }
    }

    evaluate(formula, &views, alpha.as_ref(), georef, params.as_array)
}

/// Evaluate `formula` over the named layers of a container.
///
/// The product carries the container's georeference.
pub fn composite_layers<'a>(
    raster: &Raster,
    formula: &Formula,
    alpha: Option<LayerInput<'a>>,
    params: CompositeParams,
) -> Result<Product> {
    let mut arrays: Vec<Array2<f64>> = Vec::with_capacity(formula.bands().len());
    for name in formula.bands() {
        let band = raster.layer(name).ok_or_else(|| Error::MissingBand {
            name: name.clone(),
            available: sorted_names(raster.layer_names()),
        })?;
        arrays.push(band.to_f64());
    }
    let views: Vec<ArrayView2<'_, f64>> = arrays.iter().map(|a| a.view()).collect();

    evaluate(
        formula,
        &views,
        alpha.as_ref(),
        Some(raster.georeference()),
        params.as_array,
    )
}

fn evaluate(
    formula: &Formula,
    views: &[ArrayView2<'_, f64>],
    alpha: Option<&LayerInput<'_>>,
    georef: Option<&Georeference>,
    as_array: bool,
) -> Result<Product> {
    let Some(first) = views.first() else {
        return Err(Error::Formula(format!(
            "'{formula}' references no bands"
        )));
    };
    let shape = first.dim();
    if let Some(bad) = views.iter().find(|v| v.dim() != shape) {
        return Err(Error::size_mismatch("bands", shape, bad.dim()));
    }
    let alpha = prepare_alpha(alpha, shape)?;

    let (rows, cols) = shape;
    debug!(rows, cols, formula = %formula, bands = views.len(), "composite");

    let out = collect_rows(rows, cols, |row| {
        let mut values = vec![0.0; views.len()];
        (0..cols)
            .map(|col| {
                for (slot, view) in values.iter_mut().zip(views) {
                    *slot = view[[row, col]];
                }
                formula.evaluate(&values)
            })
            .collect()
    })?;

    finish(out.into_dyn(), alpha, georef, as_array)
}

fn sorted_names<'s>(names: impl IntoIterator<Item = &'s str>) -> Vec<String> {
    let mut names: Vec<String> = names.into_iter().map(str::to_string).collect();
    names.sort_unstable();
    names
}
