//! Sequential composition of transforms.
//!
//! A chain fits its first transform to the raw ordinates, applies the result,
//! fits the next transform to the corrected ordinates, and so on. Every step
//! evaluates its own decay memory at the shared reference time. The final
//! matrix is `M_n · … · M_2 · M_1`.

use adjusted_core::{AffineMatrix, AffineResult, Real, Triple};
use log::debug;

use crate::transform::{Transform, TransformError};

/// An ordered list of transforms fitted one after another.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformChain {
    pub steps: Vec<Transform>,
}

impl TransformChain {
    pub fn new(steps: Vec<Transform>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Fit every step and compose the results.
    ///
    /// An empty chain yields the identity. The first degenerate step makes
    /// the whole chain degenerate with that step's reason.
    pub fn calculate(
        &self,
        ordinates: &Triple,
        absolutes: &Triple,
        times: &[Real],
        reference: Option<Real>,
    ) -> Result<AffineResult, TransformError> {
        let mut composed = AffineMatrix::identity();
        let mut inputs = ordinates.clone();

        for (i, step) in self.steps.iter().enumerate() {
            let matrix = match step.calculate_at(&inputs, absolutes, times, reference)? {
                AffineResult::Solved(m) => m,
                degenerate @ AffineResult::Degenerate(_) => return Ok(degenerate),
            };
            debug!("chain step {i} ({}) solved", step.kind.name());
            inputs = matrix.apply(&inputs);
            composed = matrix.compose(&composed);
        }

        Ok(AffineResult::Solved(composed))
    }
}

impl FromIterator<Transform> for TransformChain {
    fn from_iter<I: IntoIterator<Item = Transform>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
