//! Design matrices for the constrained least-squares strategies.
//!
//! Every builder stacks the samples channel-interleaved: row `3i + c` holds
//! sample `i`, channel `c` (X, Y, Z). Columns are the free coefficients of
//! the constraint. Ordinate values and constants are written at fixed
//! positions of an otherwise-zero matrix, so a generic solve recovers only
//! the permitted coefficients. The placements below are the calibration
//! models themselves; changing a single entry changes the fitted model.

use adjusted_core::{Real, Triple};
use log::warn;
use nalgebra::DMatrix;

/// How per-sample weights enter a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightingMode {
    /// `sqrt(w)` row scaling, so squared residuals carry `w`.
    SquareRoot,
    /// Raw `w`, for weighted averages and the SVD cross-covariance.
    Raw,
}

/// Per-sample multipliers for `n` samples; absent weights mean unit weight.
pub fn resolve_weights(weights: Option<&[Real]>, n: usize, mode: WeightingMode) -> Vec<Real> {
    match (weights, mode) {
        (None, _) => vec![1.0; n],
        (Some(w), WeightingMode::Raw) => w.to_vec(),
        (Some(w), WeightingMode::SquareRoot) => w.iter().map(|v| v.sqrt()).collect(),
    }
}

/// A stacked system `design · coefficients ≈ target`.
#[derive(Debug, Clone)]
pub struct LinearSystem {
    /// One row per (sample, channel) pair, one column per free coefficient.
    pub design: DMatrix<Real>,
    /// One column per right-hand side.
    pub target: DMatrix<Real>,
}

impl LinearSystem {
    /// Scale every row belonging to sample `i` by `factors[i]`.
    ///
    /// Rows are grouped evenly: `design.nrows() / factors.len()` consecutive
    /// rows per sample. A factor count that does not divide the row count
    /// leaves the system unchanged.
    pub fn scale_rows(&mut self, factors: &[Real]) {
        let rows = self.design.nrows();
        if factors.is_empty() || factors.len() > rows || rows % factors.len() != 0 {
            warn!("cannot spread {} row factors over {rows} rows", factors.len());
            return;
        }
        let per_sample = rows / factors.len();
        for r in 0..rows {
            let f = factors[r / per_sample];
            self.design.row_mut(r).scale_mut(f);
            self.target.row_mut(r).scale_mut(f);
        }
    }

    /// Apply least-squares weighting (`sqrt(w)` per sample).
    pub fn weighted(mut self, weights: Option<&[Real]>) -> Self {
        if let Some(w) = weights {
            let factors = resolve_weights(Some(w), w.len(), WeightingMode::SquareRoot);
            self.scale_rows(&factors);
        }
        self
    }
}

/// Absolutes interleaved as `[x0, y0, z0, x1, y1, z1, ...]`.
pub fn stack_absolutes(absolutes: &Triple) -> DMatrix<Real> {
    let n = absolutes.len();
    let mut b = DMatrix::<Real>::zeros(3 * n, 1);
    for i in 0..n {
        for c in 0..3 {
            b[(3 * i + c, 0)] = absolutes.channel(c)[i];
        }
    }
    b
}

/// 12 DOF: full 3×3 linear block and translation.
///
/// Channel `c` uses columns `4c..4c+4` as `[ox, oy, oz, 1]`.
pub fn no_constraints(ordinates: &Triple, absolutes: &Triple) -> LinearSystem {
    let n = ordinates.len();
    let mut a = DMatrix::<Real>::zeros(3 * n, 12);
    for i in 0..n {
        let o = ordinates.point(i);
        for c in 0..3 {
            let r = 3 * i + c;
            a[(r, 4 * c)] = o.x;
            a[(r, 4 * c + 1)] = o.y;
            a[(r, 4 * c + 2)] = o.z;
            a[(r, 4 * c + 3)] = 1.0;
        }
    }
    LinearSystem {
        design: a,
        target: stack_absolutes(absolutes),
    }
}

/// 8 DOF: X and Y depend on H and E only, Z on Z only; all axes translate.
pub fn z_rotation_shear(ordinates: &Triple, absolutes: &Triple) -> LinearSystem {
    let n = ordinates.len();
    let mut a = DMatrix::<Real>::zeros(3 * n, 8);
    for i in 0..n {
        let o = ordinates.point(i);
        let (rx, ry, rz) = (3 * i, 3 * i + 1, 3 * i + 2);

        a[(rx, 0)] = o.x;
        a[(rx, 1)] = o.y;
        a[(rx, 2)] = 1.0;

        a[(ry, 3)] = o.x;
        a[(ry, 4)] = o.y;
        a[(ry, 5)] = 1.0;

        a[(rz, 6)] = o.z;
        a[(rz, 7)] = 1.0;
    }
    LinearSystem {
        design: a,
        target: stack_absolutes(absolutes),
    }
}

/// 6 DOF: rotation about Z with uniform horizontal scale, Z scale, translation.
///
/// Columns 0 and 1 are shared between X and Y so that the horizontal block
/// is `[[m0, m1], [-m1, m0]]`.
pub fn z_rotation_hscale(ordinates: &Triple, absolutes: &Triple) -> LinearSystem {
    let n = ordinates.len();
    let mut a = DMatrix::<Real>::zeros(3 * n, 6);
    for i in 0..n {
        let o = ordinates.point(i);
        let (rx, ry, rz) = (3 * i, 3 * i + 1, 3 * i + 2);

        a[(rx, 0)] = o.x;
        a[(ry, 0)] = o.y;
        a[(rx, 1)] = o.y;
        a[(ry, 1)] = -o.x;
        a[(rx, 2)] = 1.0;
        a[(ry, 3)] = 1.0;
        a[(rz, 4)] = o.z;
        a[(rz, 5)] = 1.0;
    }
    LinearSystem {
        design: a,
        target: stack_absolutes(absolutes),
    }
}

/// 3 DOF: rotation about Z with uniform horizontal scale, Z baseline only.
///
/// No horizontal translation and no Z scale; the Z target is `az - oz`.
pub fn z_rotation_hscale_zbaseline(ordinates: &Triple, absolutes: &Triple) -> LinearSystem {
    let n = ordinates.len();
    let mut a = DMatrix::<Real>::zeros(3 * n, 3);
    let mut b = stack_absolutes(absolutes);
    for i in 0..n {
        let o = ordinates.point(i);
        let (rx, ry, rz) = (3 * i, 3 * i + 1, 3 * i + 2);

        a[(rx, 0)] = o.x;
        a[(ry, 0)] = o.y;
        a[(rx, 1)] = o.y;
        a[(ry, 1)] = -o.x;
        a[(rz, 2)] = 1.0;

        b[(rz, 0)] = absolutes.z()[i] - o.z;
    }
    LinearSystem { design: a, target: b }
}

/// 3 DOF: independent per-axis scale, nothing else.
pub fn rescale_3d(ordinates: &Triple, absolutes: &Triple) -> LinearSystem {
    let n = ordinates.len();
    let mut a = DMatrix::<Real>::zeros(3 * n, 3);
    for i in 0..n {
        for c in 0..3 {
            a[(3 * i + c, c)] = ordinates.channel(c)[i];
        }
    }
    LinearSystem {
        design: a,
        target: stack_absolutes(absolutes),
    }
}

/// 3 DOF: per-axis translation; targets are `a - o`.
pub fn translate_origins(ordinates: &Triple, absolutes: &Triple) -> LinearSystem {
    let n = ordinates.len();
    let mut a = DMatrix::<Real>::zeros(3 * n, 3);
    let mut b = DMatrix::<Real>::zeros(3 * n, 1);
    for i in 0..n {
        for c in 0..3 {
            let r = 3 * i + c;
            a[(r, c)] = 1.0;
            b[(r, 0)] = absolutes.channel(c)[i] - ordinates.channel(c)[i];
        }
    }
    LinearSystem { design: a, target: b }
}

/// 3 DOF: unit scales, Y sheared by X, Z sheared by X and Y.
pub fn shear_yz(ordinates: &Triple, absolutes: &Triple) -> LinearSystem {
    let n = ordinates.len();
    let mut a = DMatrix::<Real>::zeros(3 * n, 3);
    for i in 0..n {
        let o = ordinates.point(i);
        let (rx, ry, rz) = (3 * i, 3 * i + 1, 3 * i + 2);

        a[(rx, 0)] = 1.0;
        a[(rx, 1)] = o.x;
        a[(ry, 1)] = 1.0;
        a[(rx, 2)] = o.x;
        a[(ry, 2)] = o.y;
        a[(rz, 2)] = 1.0;
    }
    LinearSystem {
        design: a,
        target: stack_absolutes(absolutes),
    }
}
