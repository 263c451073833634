//! Proper-rotation extraction from SVD and QR factorizations.
//!
//! The SVD path is the weighted Kabsch fit: centre both sample sets on their
//! weighted centroids, form the cross-covariance `H = Cₒ · diag(w) · Cₐᵀ`,
//! decompose `H = U·S·Vᵀ` and take `R = V · diag(1, …, 1, sign det(V·Uᵀ)) · Uᵀ`.
//! The trailing sign keeps `det(R) = +1` even for mirrored sample sets.
//!
//! The QR path splits a 2×2 affine block into a proper rotation and a unit
//! shear, discarding per-axis scale.

use adjusted_core::{Mat2, Real, Triple, Vec3};
use nalgebra::{DMatrix, DVector};

use crate::lstsq::{numerical_rank, rank_tolerance};

/// Weighted arithmetic mean of each channel, using raw weights.
///
/// `weights` must have one entry per sample and a positive sum.
pub fn weighted_centroid(values: &Triple, weights: &[Real]) -> Vec3 {
    let total: Real = weights.iter().sum();
    let mut c = Vec3::zeros();
    for (p, &w) in values.points().zip(weights) {
        c += p * w;
    }
    c / total
}

/// First `ndims` channels minus their centroid, one column per sample.
pub fn centered(values: &Triple, centroid: &Vec3, ndims: usize) -> DMatrix<Real> {
    let n = values.len();
    DMatrix::from_fn(ndims, n, |d, i| values.channel(d)[i] - centroid[d])
}

/// Weighted cross-covariance `Cₒ · diag(w) · Cₐᵀ` over the first `ndims` channels.
pub fn cross_covariance(
    ordinates: &Triple,
    absolutes: &Triple,
    weights: &[Real],
    ndims: usize,
) -> DMatrix<Real> {
    let c_ord = centered(ordinates, &weighted_centroid(ordinates, weights), ndims);
    let c_abs = centered(absolutes, &weighted_centroid(absolutes, weights), ndims);
    let w = DMatrix::from_diagonal(&DVector::from_column_slice(weights));
    c_ord * w * c_abs.transpose()
}

/// Rotation recovered from a cross-covariance matrix.
#[derive(Debug, Clone)]
pub struct RotationFit {
    /// Proper rotation, `ndims × ndims`.
    pub rotation: DMatrix<Real>,
    /// Singular values of the cross-covariance, descending.
    pub singular_values: DVector<Real>,
    /// Numerical rank of the cross-covariance.
    pub rank: usize,
}

/// Kabsch rotation from a square cross-covariance matrix.
///
/// Returns `None` only if the decomposition does not yield both factors.
pub fn kabsch_rotation(h: &DMatrix<Real>) -> Option<RotationFit> {
    let n = h.nrows();
    let svd = h.clone().svd(true, true);
    let u = svd.u?;
    let v_t = svd.v_t?;
    let v = v_t.transpose();

    let d = (&v * u.transpose()).determinant();
    let mut diag = DMatrix::<Real>::identity(n, n);
    diag[(n - 1, n - 1)] = if d < 0.0 { -1.0 } else { 1.0 };

    let rotation = v * diag * u.transpose();
    let tol = rank_tolerance(n, n, &svd.singular_values);
    let rank = numerical_rank(&svd.singular_values, tol);

    Some(RotationFit {
        rotation,
        singular_values: svd.singular_values,
        rank,
    })
}

/// Split a 2×2 affine block `A = Q·R` into rotation times unit shear.
///
/// Columns of `Q` with a negative diagonal entry are negated together with
/// the matching rows of `R`, then a remaining reflection is folded into the
/// last column, so `Q` is a proper rotation. The per-axis scale
/// `S = diag(R)` is removed: the result is `Q · S⁻¹ · R`, with `det = +1`.
///
/// Returns `None` if a diagonal entry of `R` is zero relative to the largest
/// entry of `R`.
pub fn rotation_shear(linear: &Mat2) -> Option<Mat2> {
    let qr = linear.qr();
    let mut q = qr.q();
    let mut r = qr.r();

    for j in 0..2 {
        if q[(j, j)] < 0.0 {
            q.column_mut(j).neg_mut();
            r.row_mut(j).neg_mut();
        }
    }
    if q.determinant() < 0.0 {
        q.column_mut(1).neg_mut();
        r.row_mut(1).neg_mut();
    }

    let tol = Real::EPSILON * 2.0 * r.abs().max();
    if r.diagonal().iter().any(|d| d.abs() <= tol) {
        return None;
    }
    let scale = Mat2::from_diagonal(&r.diagonal());
    let shear = scale.try_inverse()? * r;
    Some(q * shear)
}
