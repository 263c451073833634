use crate::Real;
use thiserror::Error;

/// Caller-side contract violations.
///
/// These are programming errors on the caller's side and are reported
/// immediately, before any matrix is built. Numerical degeneracy is not an
/// error; see [`crate::AffineResult`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("empty input: {0} has no samples")]
    EmptyInput(&'static str),
    #[error("length mismatch in {what}: expected {expected}, got {got}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("non-finite value in {what} at index {index}")]
    NonFinite { what: &'static str, index: usize },
    #[error("negative weight {value} at index {index}")]
    NegativeWeight { index: usize, value: Real },
    #[error("decay memory must be positive or infinite, got {0}")]
    InvalidMemory(Real),
}
