//! Exact Euclidean distance transform
//!
//! Separable lower-envelope-of-parabolas algorithm (Felzenszwalb and
//! Huttenlocher, 2012): squared distances along columns, then along rows,
//! then a square root.

use ndarray::{Array2, ArrayView2, Axis};

/// Exact distance to the nearest `true` cell, `+inf` when there is none.
pub(crate) fn euclidean(foreground: ArrayView2<'_, bool>) -> Array2<f64> {
    let mut sq = foreground.mapv(|fg| if fg { 0.0 } else { f64::INFINITY });

    let mut buf = Vec::new();
    for axis in [Axis(0), Axis(1)] {
        for mut lane in sq.lanes_mut(axis) {
            let f: Vec<f64> = lane.iter().copied().collect();
            buf.resize(f.len(), 0.0);
            lower_envelope(&f, &mut buf);
            for (dst, &v) in lane.iter_mut().zip(buf.iter()) {
                *dst = v;
            }
        }
    }

    sq.mapv_inplace(f64::sqrt);
    sq
}

/// 1-D squared distance transform of the sampled function `f`.
///
/// Infinite samples contribute no parabola.
fn lower_envelope(f: &[f64], out: &mut [f64]) {
    let sites: Vec<usize> = (0..f.len()).filter(|&q| f[q].is_finite()).collect();
    let Some((&first, rest)) = sites.split_first() else {
        out.fill(f64::INFINITY);
        return;
    };

    let intersect = |p: usize, q: usize| {
        let (pf, qf) = (p as f64, q as f64);
        ((f[q] + qf * qf) - (f[p] + pf * pf)) / (2.0 * (qf - pf))
    };

    // v: parabola vertices in the envelope, z: left boundary of each
    let mut v = vec![first];
    let mut z = vec![f64::NEG_INFINITY];
    for &q in rest {
        let mut s = intersect(v[v.len() - 1], q);
        while s <= z[z.len() - 1] {
            v.pop();
            z.pop();
            s = intersect(v[v.len() - 1], q);
        }
        v.push(q);
        z.push(s);
    }

    let mut k = 0;
    for (q, slot) in out.iter_mut().enumerate() {
        let qf = q as f64;
        while k + 1 < v.len() && z[k + 1] < qf {
            k += 1;
        }
        let d = qf - v[k] as f64;
        *slot = d * d + f[v[k]];
    }
}
