//! Input normalization for processors
//!
//! Processors accept either a [`Raster`] or a raw array. [`LayerInput`]
//! is the closed union of the two; [`check_layer`] turns it into a
//! borrowed array view without copying.

use ndarray::{stack, Array2, Array3, ArrayD, ArrayView2, ArrayView3, ArrayViewD, Axis, Ix2, Ix3};

use crate::error::{Error, Result};
use crate::raster::{Georeference, Raster};

/// A processor argument: a raw array or a container
#[derive(Debug, Clone)]
pub enum LayerInput<'a> {
    Array(ArrayViewD<'a, f64>),
    Raster(&'a Raster),
}

impl<'a> LayerInput<'a> {
    /// Georeference to carry into a derived product, if the input is a
    /// container
    pub fn georeference(&self) -> Option<&'a Georeference> {
        match *self {
            LayerInput::Array(_) => None,
            LayerInput::Raster(raster) => Some(raster.georeference()),
        }
    }
}

impl<'a> From<&'a Raster> for LayerInput<'a> {
    fn from(raster: &'a Raster) -> Self {
        LayerInput::Raster(raster)
    }
}

impl<'a> From<ArrayViewD<'a, f64>> for LayerInput<'a> {
    fn from(view: ArrayViewD<'a, f64>) -> Self {
        LayerInput::Array(view)
    }
}

impl<'a> From<ArrayView2<'a, f64>> for LayerInput<'a> {
    fn from(view: ArrayView2<'a, f64>) -> Self {
        LayerInput::Array(view.into_dyn())
    }
}

impl<'a> From<ArrayView3<'a, f64>> for LayerInput<'a> {
    fn from(view: ArrayView3<'a, f64>) -> Self {
        LayerInput::Array(view.into_dyn())
    }
}

impl<'a> From<&'a ArrayD<f64>> for LayerInput<'a> {
    fn from(array: &'a ArrayD<f64>) -> Self {
        LayerInput::Array(array.view())
    }
}

impl<'a> From<&'a Array2<f64>> for LayerInput<'a> {
    fn from(array: &'a Array2<f64>) -> Self {
        LayerInput::Array(array.view().into_dyn())
    }
}

impl<'a> From<&'a Array3<f64>> for LayerInput<'a> {
    fn from(array: &'a Array3<f64>) -> Self {
        LayerInput::Array(array.view().into_dyn())
    }
}

/// Extract the working array of a processor argument.
///
/// A container yields its primary array; a raw array passes through. Both
/// must be 2-D or 3-D, otherwise [`Error::BadInputType`] is returned, as it
/// is for a container without data.
pub fn check_layer<'a>(input: &LayerInput<'a>, name: &'static str) -> Result<ArrayViewD<'a, f64>> {
    let view = match *input {
        LayerInput::Array(ref view) => view.clone(),
        LayerInput::Raster(raster) => raster.view().ok_or_else(|| Error::BadInputType {
            name,
            expected: "a container holding data".to_string(),
        })?,
    };
    match view.ndim() {
        2 | 3 => Ok(view),
        n => Err(Error::BadInputType {
            name,
            expected: format!("a 2-D or 3-D array, got {n}-D"),
        }),
    }
}

/// Reduce a checked view to one 2-D band.
///
/// A 3-D array with a single trailing band is squeezed; more bands are a
/// validation error.
pub fn single_band<'a>(view: ArrayViewD<'a, f64>, name: &'static str) -> Result<ArrayView2<'a, f64>> {
    let as_shape_error = |e: ndarray::ShapeError| Error::validation(name, e.to_string());
    match view.ndim() {
        2 => view.into_dimensionality::<Ix2>().map_err(as_shape_error),
        3 => {
            let bands = view.len_of(Axis(2));
            if bands != 1 {
                return Err(Error::validation(
                    name,
                    format!("expected a single band, got {bands}"),
                ));
            }
            view.into_dimensionality::<Ix3>()
                .map_err(as_shape_error)
                .map(|v| v.index_axis_move(Axis(2), 0))
        }
        n => Err(Error::BadInputType {
            name,
            expected: format!("a 2-D or 3-D array, got {n}-D"),
        }),
    }
}

/// Validate an optional alpha channel against the primary spatial shape.
///
/// Runs before any computation so a bad alpha never costs a transform.
pub fn prepare_alpha<'a>(
    alpha: Option<&LayerInput<'a>>,
    shape: (usize, usize),
) -> Result<Option<ArrayView2<'a, f64>>> {
    let Some(alpha) = alpha else {
        return Ok(None);
    };
    let band = single_band(check_layer(alpha, "alpha")?, "alpha")?;
    if band.dim() != shape {
        return Err(Error::size_mismatch("alpha", shape, band.dim()));
    }
    Ok(Some(band))
}

/// Append `alpha` as exactly one trailing band.
///
/// A 2-D result becomes `(rows, cols, 2)`; a 3-D result gains one band.
pub fn stack_alpha(result: ArrayD<f64>, alpha: ArrayView2<'_, f64>) -> Result<ArrayD<f64>> {
    if !matches!(result.ndim(), 2 | 3) {
        return Err(Error::BadInputType {
            name: "result",
            expected: format!("a 2-D or 3-D array, got {}-D", result.ndim()),
        });
    }
    let shape = (result.shape()[0], result.shape()[1]);
    if alpha.dim() != shape {
        return Err(Error::size_mismatch("alpha", shape, alpha.dim()));
    }
    let stacked = match result.ndim() {
        2 => {
            let base = result
                .into_dimensionality::<Ix2>()
                .map_err(|e| Error::Other(e.to_string()))?;
            stack(Axis(2), &[base.view(), alpha.view()]).map(|a| a.into_dyn())
        }
        _ => ndarray::concatenate(Axis(2), &[result.view(), alpha.view().insert_axis(Axis(2)).into_dyn()]),
    };
    stacked.map_err(|e| Error::Other(e.to_string()))
}
