//! Distance transform kernels
//!
//! Chamfer kernels propagate local step costs in two raster passes; the
//! precise kernel computes exact Euclidean distances.

use ndarray::{Array2, ArrayView2};
use rasterforge_core::{Error, Result};
use std::f64::consts::SQRT_2;
use std::fmt;
use std::str::FromStr;

const KNIGHT: f64 = 2.236_067_977_499_79; // sqrt(5)

/// Kernel used to approximate Euclidean distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskSize {
    /// 3x3 chamfer: axial 1, diagonal √2
    #[default]
    Chamfer3,
    /// 5x5 chamfer: adds knight moves at √5
    Chamfer5,
    /// Exact Euclidean transform
    Precise,
}

impl MaskSize {
    /// Kernel side length, 0 for the exact transform
    pub fn size(self) -> u32 {
        match self {
            MaskSize::Chamfer3 => 3,
            MaskSize::Chamfer5 => 5,
            MaskSize::Precise => 0,
        }
    }

    /// Causal half of the kernel as `(drow, dcol, cost)`: every offset
    /// precedes the centre in raster order.
    fn forward_offsets(self) -> &'static [(isize, isize, f64)] {
        const CHAMFER3: [(isize, isize, f64); 4] =
            [(-1, -1, SQRT_2), (-1, 0, 1.0), (-1, 1, SQRT_2), (0, -1, 1.0)];
        const CHAMFER5: [(isize, isize, f64); 8] = [
            (-2, -1, KNIGHT),
            (-2, 1, KNIGHT),
            (-1, -2, KNIGHT),
            (-1, -1, SQRT_2),
            (-1, 0, 1.0),
            (-1, 1, SQRT_2),
            (-1, 2, KNIGHT),
            (0, -1, 1.0),
        ];
        match self {
            MaskSize::Chamfer3 => &CHAMFER3,
            MaskSize::Chamfer5 => &CHAMFER5,
            MaskSize::Precise => &[],
        }
    }
}

impl TryFrom<u32> for MaskSize {
    type Error = Error;

    fn try_from(size: u32) -> Result<Self> {
        match size {
            3 => Ok(MaskSize::Chamfer3),
            5 => Ok(MaskSize::Chamfer5),
            0 => Ok(MaskSize::Precise),
            other => Err(Error::validation(
                "mask_size",
                format!("{other} is not a supported kernel size (3, 5 or 0 for precise)"),
            )),
        }
    }
}

impl FromStr for MaskSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("precise") {
            return Ok(MaskSize::Precise);
        }
        let size: u32 = s.trim().parse().map_err(|_| {
            Error::validation("mask_size", format!("'{s}' is not a kernel size"))
        })?;
        MaskSize::try_from(size)
    }
}

impl fmt::Display for MaskSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskSize::Precise => f.write_str("precise"),
            chamfer => write!(f, "{}", chamfer.size()),
        }
    }
}

/// Two-pass chamfer distance to the nearest `true` cell.
pub(crate) fn chamfer(foreground: ArrayView2<'_, bool>, size: MaskSize) -> Array2<f64> {
    let (rows, cols) = foreground.dim();
    let mut dist = foreground.mapv(|fg| if fg { 0.0 } else { f64::INFINITY });
    let offsets = size.forward_offsets();

    let relax = |dist: &mut Array2<f64>, row: usize, col: usize, sign: isize| {
        let mut best = dist[[row, col]];
        for &(dr, dc, cost) in offsets {
            let r = row as isize + sign * dr;
            let c = col as isize + sign * dc;
            if r < 0 || c < 0 || r >= rows as isize || c >= cols as isize {
                continue;
            }
            let candidate = dist[[r as usize, c as usize]] + cost;
            if candidate < best {
                best = candidate;
            }
        }
        dist[[row, col]] = best;
    };

    for row in 0..rows {
        for col in 0..cols {
            relax(&mut dist, row, col, 1);
        }
    }
    for row in (0..rows).rev() {
        for col in (0..cols).rev() {
            relax(&mut dist, row, col, -1);
        }
    }
    dist
}
