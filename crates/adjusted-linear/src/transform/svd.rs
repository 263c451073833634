//! Rigid-rotation strategies fitted with the weighted Kabsch method.

use adjusted_core::{AffineMatrix, AffineResult, Degeneracy, Mat3, Real, Triple, Vec3};
use log::debug;

use super::{admit, degenerate, AffineEstimator, TransformError};
use crate::design::{resolve_weights, WeightingMode};
use crate::rotation::{cross_covariance, kabsch_rotation, weighted_centroid, RotationFit};

/// Centroids and rotation of a planar or spatial Kabsch fit.
struct RigidFit {
    rotation: RotationFit,
    ord_centroid: Vec3,
    abs_centroid: Vec3,
}

/// Fit a proper rotation over the first `ndims` channels.
///
/// The cross-covariance must have rank `ndims - 1` or more: one direction is
/// implied by orthogonality and the determinant sign.
fn rigid_fit(
    strategy: &'static str,
    ndims: usize,
    ordinates: &Triple,
    absolutes: &Triple,
    weights: Option<&[Real]>,
) -> Result<Result<RigidFit, Degeneracy>, TransformError> {
    if let Some(reason) = admit(strategy, ordinates, absolutes, weights)? {
        return Ok(Err(reason));
    }

    let w = resolve_weights(weights, ordinates.len(), WeightingMode::Raw);
    let h = cross_covariance(ordinates, absolutes, &w, ndims);
    let rotation = kabsch_rotation(&h).ok_or(TransformError::Decomposition(
        "svd of cross-covariance returned no singular vectors",
    ))?;
    debug!(
        "{strategy}: cross-covariance singular values {:?}, rank {}",
        rotation.singular_values.as_slice(),
        rotation.rank
    );

    let required = ndims - 1;
    if rotation.rank < required {
        return Ok(Err(Degeneracy::WeakCovariance {
            strategy,
            observed_rank: rotation.rank,
            required_rank: required,
        }));
    }

    Ok(Ok(RigidFit {
        rotation,
        ord_centroid: weighted_centroid(ordinates, &w),
        abs_centroid: weighted_centroid(absolutes, &w),
    }))
}

/// Full 3D rotation and translation, unit scale, no shear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationTranslation3D;

impl AffineEstimator for RotationTranslation3D {
    const NAME: &'static str = "RotationTranslation3D";

    fn calculate(
        &self,
        ordinates: &Triple,
        absolutes: &Triple,
        weights: Option<&[Real]>,
    ) -> Result<AffineResult, TransformError> {
        let fit = match rigid_fit(Self::NAME, 3, ordinates, absolutes, weights)? {
            Ok(fit) => fit,
            Err(reason) => return Ok(degenerate(reason)),
        };

        let r = Mat3::from_fn(|i, j| fit.rotation.rotation[(i, j)]);
        let t = fit.abs_centroid - r * fit.ord_centroid;
        Ok(AffineResult::Solved(AffineMatrix::from_parts(&r, &t)))
    }
}

/// Rotation and translation in the horizontal plane; Z is translated only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RotationTranslationXY;

impl AffineEstimator for RotationTranslationXY {
    const NAME: &'static str = "RotationTranslationXY";

    fn calculate(
        &self,
        ordinates: &Triple,
        absolutes: &Triple,
        weights: Option<&[Real]>,
    ) -> Result<AffineResult, TransformError> {
        let fit = match rigid_fit(Self::NAME, 2, ordinates, absolutes, weights)? {
            Ok(fit) => fit,
            Err(reason) => return Ok(degenerate(reason)),
        };

        let r = &fit.rotation.rotation;
        let (co, ca) = (fit.ord_centroid, fit.abs_centroid);
        let tx = ca.x - (r[(0, 0)] * co.x + r[(0, 1)] * co.y);
        let ty = ca.y - (r[(1, 0)] * co.x + r[(1, 1)] * co.y);
        let tz = ca.z - co.z;

        Ok(AffineResult::Solved(AffineMatrix::from_rows([
            [r[(0, 0)], r[(0, 1)], 0.0, tx],
            [r[(1, 0)], r[(1, 1)], 0.0, ty],
            [0.0, 0.0, 1.0, tz],
        ])))
    }
}
