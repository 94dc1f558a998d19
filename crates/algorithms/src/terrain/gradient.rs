//! Discrete elevation gradients
//!
//! Unit-spaced finite differences: second-order central differences in the
//! interior, first-order one-sided differences on the edges. Spacing and
//! vertical exaggeration are applied by the callers.

use ndarray::{s, Array2, ArrayView2, Axis};
use rasterforge_core::{Error, Result};

/// Partial derivatives `(d/drow, d/dcol)` of a 2-D grid.
///
/// Both axes need at least two samples.
pub fn gradient(e: ArrayView2<'_, f64>) -> Result<(Array2<f64>, Array2<f64>)> {
    let (rows, cols) = e.dim();
    if rows < 2 || cols < 2 {
        return Err(Error::validation(
            "dem",
            format!("gradient needs at least 2x2 samples, got {rows}x{cols}"),
        ));
    }
    Ok((axis_gradient(e, Axis(0)), axis_gradient(e, Axis(1))))
}

fn axis_gradient(e: ArrayView2<'_, f64>, axis: Axis) -> Array2<f64> {
    // Work along rows by transposing the column case
    let e = if axis == Axis(0) { e } else { e.reversed_axes() };
    let n = e.nrows();
    let mut g = Array2::zeros(e.raw_dim());

    let interior = (&e.slice(s![2.., ..]) - &e.slice(s![..n - 2, ..])) / 2.0;
    g.slice_mut(s![1..n - 1, ..]).assign(&interior);
    g.row_mut(0).assign(&(&e.row(1) - &e.row(0)));
    g.row_mut(n - 1).assign(&(&e.row(n - 1) - &e.row(n - 2)));

    if axis == Axis(0) {
        g
    } else {
        g.reversed_axes()
    }
}
