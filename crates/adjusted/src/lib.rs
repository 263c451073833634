//! Entry crate for `adjusted-rs`, the adjusted-matrix calibration toolbox.
//!
//! An adjusted matrix is a 4×4 affine that maps raw magnetometer ordinates
//! (instrument H, E, Z) onto absolute field values (X, Y, Z). This crate
//! re-exports the value types and the strategy family.
//!
//! ## Fitting a single strategy
//!
//! ```
//! use adjusted::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let ordinates = Triple::from_points(&[
//!     Vec3::new(20000.0, 0.0, 45000.0),
//!     Vec3::new(20010.0, 5.0, 44990.0),
//!     Vec3::new(19995.0, -8.0, 45020.0),
//! ]);
//! let absolutes = AffineMatrix::from_parts(&Mat3::identity(), &Vec3::new(1.0, 2.0, 3.0))
//!     .apply(&ordinates);
//!
//! let fit = Transform::new(TransformKind::TranslateOrigins)
//!     .calculate(&ordinates, &absolutes, None)?;
//! match fit {
//!     AffineResult::Solved(m) => println!("translation {}", m.translation()),
//!     AffineResult::Degenerate(reason) => println!("no calibration: {reason}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Chains
//!
//! [`ChainConfig::default`](linear::ChainConfig) fits a horizontal rotation
//! with a 100-day memory followed by a 10-day baseline translation. Build it
//! with [`ChainConfig::build`](linear::ChainConfig::build) and call
//! [`TransformChain::calculate`](linear::TransformChain::calculate) with the
//! sample times.
//!
//! ## Module Organization
//!
//! - **[`core`]**: samples, affine matrices, time weighting, metrics
//! - **[`linear`]**: design matrices, least squares, rotation extraction,
//!   the strategies, chains and configuration
//! - **[`prelude`]**: common re-exports

/// Samples, affine matrices, time weighting and residual metrics.
pub mod core {
    pub use adjusted_core::*;
}

/// Closed-form strategies and their building blocks.
pub mod linear {
    pub use adjusted_linear::*;
}

/// Convenient re-exports for common use cases.
///
/// Import with `use adjusted::prelude::*;`.
pub mod prelude {
    pub use crate::core::{
        residual_metrics, AffineMatrix, AffineResult, Degeneracy, InputError, Mat3, Mat4, Metric,
        Real, TimeWeighting, Triple, Vec3,
    };

    pub use crate::linear::{
        AffineEstimator, ChainConfig, Transform, TransformChain, TransformConfig, TransformError,
        TransformKind,
    };
}
