//! The calibration strategy family.
//!
//! Ten strategies share one capability, [`AffineEstimator`]: given paired
//! ordinate/absolute triples and optional per-sample weights, produce a 4×4
//! affine matrix or a [`Degeneracy`]. [`TransformKind`] selects a strategy by
//! value and [`Transform`] pairs a kind with its decay configuration.
//!
//! Failure is split in two. Malformed input (empty, mismatched lengths,
//! non-finite values, negative weights) is a [`TransformError`]. A
//! well-formed system that cannot fix the model returns
//! [`AffineResult::Degenerate`] and logs a warning naming the strategy.

mod least_squares;
mod qr;
mod svd;

pub use least_squares::*;
pub use qr::*;
pub use svd::*;

use adjusted_core::{
    check_samples, AffineResult, Degeneracy, InputError, Real, TimeWeighting, Triple,
};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lstsq::LeastSquaresError;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    LeastSquares(#[from] LeastSquaresError),
    #[error("decomposition failed: {0}")]
    Decomposition(&'static str),
}

/// A strategy that fits an affine matrix to paired samples.
pub trait AffineEstimator {
    /// Stable name used in logs and degeneracy reports.
    const NAME: &'static str;

    /// Fit ordinates onto absolutes.
    ///
    /// `weights` (one per sample, non-negative) default to uniform when absent.
    fn calculate(
        &self,
        ordinates: &Triple,
        absolutes: &Triple,
        weights: Option<&[Real]>,
    ) -> Result<AffineResult, TransformError>;
}

/// Wrap a degeneracy, logging it once at the strategy boundary.
pub(crate) fn degenerate(reason: Degeneracy) -> AffineResult {
    warn!("{reason}; returning NaN matrix");
    AffineResult::Degenerate(reason)
}

/// Validate the input contract and catch all-zero weights.
///
/// Returns `Some` when the fit must stop with a degeneracy.
pub(crate) fn admit(
    strategy: &'static str,
    ordinates: &Triple,
    absolutes: &Triple,
    weights: Option<&[Real]>,
) -> Result<Option<Degeneracy>, InputError> {
    check_samples(ordinates, absolutes, weights)?;
    match weights {
        Some(w) if w.iter().sum::<Real>() <= 0.0 => Ok(Some(Degeneracy::NoWeight { strategy })),
        _ => Ok(None),
    }
}

/// Strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    NoConstraints,
    ZRotationShear,
    ZRotationHscale,
    ZRotationHscaleZbaseline,
    #[serde(rename = "rescale_3d")]
    Rescale3D,
    TranslateOrigins,
    #[serde(rename = "shear_yz")]
    ShearYZ,
    #[serde(rename = "rotation_translation_3d")]
    RotationTranslation3D,
    #[serde(rename = "rotation_translation_xy")]
    RotationTranslationXY,
    QrFactorization,
}

impl TransformKind {
    pub const ALL: [TransformKind; 10] = [
        TransformKind::NoConstraints,
        TransformKind::ZRotationShear,
        TransformKind::ZRotationHscale,
        TransformKind::ZRotationHscaleZbaseline,
        TransformKind::Rescale3D,
        TransformKind::TranslateOrigins,
        TransformKind::ShearYZ,
        TransformKind::RotationTranslation3D,
        TransformKind::RotationTranslationXY,
        TransformKind::QrFactorization,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TransformKind::NoConstraints => NoConstraints::NAME,
            TransformKind::ZRotationShear => ZRotationShear::NAME,
            TransformKind::ZRotationHscale => ZRotationHscale::NAME,
            TransformKind::ZRotationHscaleZbaseline => ZRotationHscaleZbaseline::NAME,
            TransformKind::Rescale3D => Rescale3D::NAME,
            TransformKind::TranslateOrigins => TranslateOrigins::NAME,
            TransformKind::ShearYZ => ShearYZ::NAME,
            TransformKind::RotationTranslation3D => RotationTranslation3D::NAME,
            TransformKind::RotationTranslationXY => RotationTranslationXY::NAME,
            TransformKind::QrFactorization => QrFactorization::NAME,
        }
    }

    /// Free parameters of the fitted model.
    ///
    /// For the least-squares kinds this is also the design-matrix rank a fit
    /// must reach.
    pub fn dof(self) -> usize {
        match self {
            TransformKind::NoConstraints => 12,
            TransformKind::ZRotationShear => 8,
            TransformKind::ZRotationHscale => 6,
            TransformKind::ZRotationHscaleZbaseline
            | TransformKind::Rescale3D
            | TransformKind::TranslateOrigins
            | TransformKind::ShearYZ => 3,
            // rotation angles plus translation
            TransformKind::RotationTranslation3D => 6,
            TransformKind::RotationTranslationXY => 4,
            // 2×2 block, 2 horizontal + 1 vertical translation
            TransformKind::QrFactorization => 7,
        }
    }

    /// Whether the linear block is guaranteed to have determinant +1.
    pub fn is_rotation(self) -> bool {
        matches!(
            self,
            TransformKind::RotationTranslation3D
                | TransformKind::RotationTranslationXY
                | TransformKind::QrFactorization
        )
    }

    pub fn calculate(
        self,
        ordinates: &Triple,
        absolutes: &Triple,
        weights: Option<&[Real]>,
    ) -> Result<AffineResult, TransformError> {
        match self {
            TransformKind::NoConstraints => NoConstraints.calculate(ordinates, absolutes, weights),
            TransformKind::ZRotationShear => {
                ZRotationShear.calculate(ordinates, absolutes, weights)
            }
            TransformKind::ZRotationHscale => {
                ZRotationHscale.calculate(ordinates, absolutes, weights)
            }
            TransformKind::ZRotationHscaleZbaseline => {
                ZRotationHscaleZbaseline.calculate(ordinates, absolutes, weights)
            }
            TransformKind::Rescale3D => Rescale3D.calculate(ordinates, absolutes, weights),
            TransformKind::TranslateOrigins => {
                TranslateOrigins.calculate(ordinates, absolutes, weights)
            }
            TransformKind::ShearYZ => ShearYZ.calculate(ordinates, absolutes, weights),
            TransformKind::RotationTranslation3D => {
                RotationTranslation3D.calculate(ordinates, absolutes, weights)
            }
            TransformKind::RotationTranslationXY => {
                RotationTranslationXY.calculate(ordinates, absolutes, weights)
            }
            TransformKind::QrFactorization => {
                QrFactorization.calculate(ordinates, absolutes, weights)
            }
        }
    }
}

/// A strategy together with its time-decay configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub kind: TransformKind,
    pub weighting: TimeWeighting,
}

impl Transform {
    /// Uniform weighting.
    pub fn new(kind: TransformKind) -> Self {
        Self {
            kind,
            weighting: TimeWeighting::uniform(),
        }
    }

    /// Exponential decay with the given memory.
    pub fn with_memory(kind: TransformKind, memory: Real) -> Result<Self, InputError> {
        Ok(Self {
            kind,
            weighting: TimeWeighting::new(memory)?,
        })
    }

    pub fn with_weighting(mut self, weighting: TimeWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Per-sample weights for `times` around `reference` (latest time by default).
    pub fn weights(
        &self,
        times: &[Real],
        reference: Option<Real>,
    ) -> Result<Vec<Real>, InputError> {
        self.weighting.weights(times, reference)
    }

    /// Fit with caller-supplied weights.
    pub fn calculate(
        &self,
        ordinates: &Triple,
        absolutes: &Triple,
        weights: Option<&[Real]>,
    ) -> Result<AffineResult, TransformError> {
        self.kind.calculate(ordinates, absolutes, weights)
    }

    /// Fit with weights derived from sample times.
    pub fn calculate_at(
        &self,
        ordinates: &Triple,
        absolutes: &Triple,
        times: &[Real],
        reference: Option<Real>,
    ) -> Result<AffineResult, TransformError> {
        let weights = self.weights(times, reference)?;
        self.calculate(ordinates, absolutes, Some(&weights))
    }
}

impl From<TransformKind> for Transform {
    fn from(kind: TransformKind) -> Self {
        Transform::new(kind)
    }
}
