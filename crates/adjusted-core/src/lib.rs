//! Core value types for `adjusted-rs`.
//!
//! This crate contains the pieces shared by every calibration strategy:
//! - linear algebra type aliases (`Real`, `Vec3`, `Mat4`, ...),
//! - [`Triple`], the three-channel sample container used for ordinates
//!   (instrument H, E, Z) and absolutes (geographic X, Y, Z),
//! - [`AffineMatrix`] and the soft-failure [`AffineResult`],
//! - exponential [`TimeWeighting`],
//! - residual [`Metric`]s for judging a fitted matrix.
//!
//! Adjusted-matrix pipeline (conceptually):
//! `absolutes ≈ M · [ordinates; 1]`, with `M` a 4×4 homogeneous affine.

/// Soft-failure result types and the affine matrix wrapper.
pub mod affine;
/// Input-contract errors.
pub mod error;
/// Linear algebra type aliases and helpers.
pub mod math;
/// Residual statistics of a fitted matrix.
pub mod metrics;
/// Three-channel sample containers and input validation.
pub mod samples;
/// Deterministic synthetic calibration data (tests, examples, benchmarks).
pub mod synthetic;
/// Exponential time-decay weights.
pub mod weighting;

pub use affine::*;
pub use error::*;
pub use math::*;
pub use metrics::*;
pub use samples::*;
pub use weighting::*;
