//! Row-parallel execution when the `parallel` feature is on.
//!
//! With the feature, `into_par_iter` is rayon's. Without it, a sequential
//! stand-in keeps the same call sites compiling against plain iterators,
//! which is the default single-threaded build.
#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

use ndarray::Array2;
use rasterforge_core::{Error, Result};

#[cfg(not(feature = "parallel"))]
mod sequential {
    /// Sequential stand-in for `rayon::prelude::IntoParallelIterator`.
    pub trait IntoParallelIterator {
        type Iter;
        type Item;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Iter = I::IntoIter;
        type Item = I::Item;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(not(feature = "parallel"))]
pub use sequential::*;

/// Build a `(rows, cols)` grid by evaluating `row_fn` once per row.
///
/// `row_fn` must return exactly `cols` values.
pub(crate) fn collect_rows<F>(rows: usize, cols: usize, row_fn: F) -> Result<Array2<f64>>
where
    F: Fn(usize) -> Vec<f64> + Sync + Send,
{
    let data: Vec<f64> = (0..rows).into_par_iter().flat_map(row_fn).collect();
    Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_keep_order() {
        let grid = collect_rows(3, 2, |r| vec![r as f64, r as f64 + 0.5]).unwrap();
        assert_eq!(grid, ndarray::array![[0.0, 0.5], [1.0, 1.5], [2.0, 2.5]]);
    }

    #[test]
    fn test_short_row_is_an_error() {
        assert!(collect_rows(2, 3, |_| vec![1.0]).is_err());
    }
}
