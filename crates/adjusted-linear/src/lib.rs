//! Closed-form affine calibration of magnetometer ordinates.
//!
//! Ten strategies fit a 4×4 affine matrix mapping ordinates (H, E, Z) onto
//! absolutes (X, Y, Z) under different geometric constraints:
//!
//! - constrained linear least squares ([`NoConstraints`] down to
//!   [`TranslateOrigins`]), with rank checks on the weighted design matrix,
//! - weighted Kabsch rotation ([`RotationTranslation3D`],
//!   [`RotationTranslationXY`]),
//! - a QR split of a horizontal affine into rotation and shear
//!   ([`QrFactorization`]).
//!
//! Degenerate systems come back as [`adjusted_core::AffineResult::Degenerate`]
//! rather than as errors.

pub mod design;
pub mod lstsq;
pub mod rotation;

mod chain;
mod config;
mod transform;

pub use chain::*;
pub use config::*;
pub use transform::*;
