//! Distance transform
//!
//! Distance, in pixels, from every cell to the nearest foreground cell of
//! a mask. Foreground cells are 0; with no foreground at all every cell is
//! `+inf`.

mod exact;
mod mask;
mod thresholds;

pub use mask::MaskSize;
pub use thresholds::Thresholds;

use ndarray::{Array2, ArrayView2};
use rasterforge_core::validation::{check_layer, prepare_alpha, single_band};
use rasterforge_core::{LayerInput, Result};
use tracing::debug;

use crate::output::{finish, Product};

/// Parameters for the distance transform
#[derive(Debug, Clone, Default)]
pub struct DistanceParams {
    /// Foreground selection; without it non-zero, non-NaN cells are foreground
    pub thresholds: Option<Thresholds>,
    /// Swap foreground and background before measuring
    pub invert: bool,
    pub mask_size: MaskSize,
    /// Return a raw array instead of a container
    pub as_array: bool,
}

/// Compute the distance transform of a layer
///
/// # Arguments
/// * `layer` - Binary or thresholdable single-band data
/// * `alpha` - Optional alpha channel, stacked as the last band
/// * `params` - Foreground rule, inversion and kernel
///
/// # Errors
/// Validation errors for reversed thresholds and for an alpha channel
/// whose shape differs from the layer.
pub fn distance<'a>(
    layer: impl Into<LayerInput<'a>>,
    alpha: Option<LayerInput<'a>>,
    params: DistanceParams,
) -> Result<Product> {
    if let Some(t) = &params.thresholds {
        t.validate()?;
    }

    let layer = layer.into();
    let values = single_band(check_layer(&layer, "layer")?, "layer")?;
    let alpha = prepare_alpha(alpha.as_ref(), values.dim())?;

    let (rows, cols) = values.dim();
    debug!(rows, cols, invert = params.invert, mask_size = %params.mask_size, "distance");

    let foreground = foreground_mask(values, params.thresholds.as_ref(), params.invert);
    let out = match params.mask_size {
        MaskSize::Precise => exact::euclidean(foreground.view()),
        chamfer => mask::chamfer(foreground.view(), chamfer),
    };

    finish(out.into_dyn(), alpha, layer.georeference(), params.as_array)
}

/// Binary foreground of `values` under the optional thresholds
pub fn foreground_mask(
    values: ArrayView2<'_, f64>,
    thresholds: Option<&Thresholds>,
    invert: bool,
) -> Array2<bool> {
    values.mapv(|v| {
        let fg = match thresholds {
            Some(t) => t.contains(v),
            None => v != 0.0 && !v.is_nan(),
        };
        fg != invert
    })
}
