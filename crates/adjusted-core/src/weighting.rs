//! Exponential time-decay weights.
//!
//! Each sample is weighted by how far its time lies from a reference time:
//!
//! ```text
//! w(t) = exp((t - t_ref) / memory)    for t <= t_ref
//! w(t) = exp((t_ref - t) / memory)    for t >= t_ref
//! ```
//!
//! Both branches agree (`w = 1`) at `t = t_ref`. An infinite memory gives
//! uniform unit weights regardless of the reference time. Times may be any
//! numeric representation of elapsed time (seconds since an epoch, sample
//! indices, ...) as long as `memory` uses the same units.

use crate::{InputError, Real};

/// Decay configuration for sample weights.
///
/// Built through [`TimeWeighting::new`] so that `memory` is always positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWeighting {
    memory: Real,
    causal: bool,
}

impl Default for TimeWeighting {
    fn default() -> Self {
        Self {
            memory: Real::INFINITY,
            causal: false,
        }
    }
}

impl TimeWeighting {
    /// Symmetric decay with the given memory.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidMemory`] unless `memory > 0` (infinity allowed).
    pub fn new(memory: Real) -> Result<Self, InputError> {
        if memory.is_nan() || memory <= 0.0 {
            return Err(InputError::InvalidMemory(memory));
        }
        Ok(Self {
            memory,
            causal: false,
        })
    }

    /// Uniform weighting (infinite memory).
    pub fn uniform() -> Self {
        Self::default()
    }

    pub fn with_causal(mut self, causal: bool) -> Self {
        self.causal = causal;
        self
    }

    /// Decay constant in time units; `+inf` means no decay.
    pub fn memory(&self) -> Real {
        self.memory
    }

    /// Whether samples strictly after the reference time are zeroed.
    pub fn causal(&self) -> bool {
        self.causal
    }

    pub fn is_uniform(&self) -> bool {
        self.memory.is_infinite()
    }

    /// Compute one weight per sample time.
    ///
    /// `reference` defaults to the latest time present.
    ///
    /// # Errors
    ///
    /// - [`InputError::EmptyInput`] if `times` is empty,
    /// - [`InputError::NonFinite`] for a non-finite time or reference.
    pub fn weights(
        &self,
        times: &[Real],
        reference: Option<Real>,
    ) -> Result<Vec<Real>, InputError> {
        if times.is_empty() {
            return Err(InputError::EmptyInput("times"));
        }
        if let Some(index) = times.iter().position(|t| !t.is_finite()) {
            return Err(InputError::NonFinite {
                what: "times",
                index,
            });
        }
        let reference = match reference {
            Some(r) if !r.is_finite() => {
                return Err(InputError::NonFinite {
                    what: "reference time",
                    index: 0,
                })
            }
            Some(r) => r,
            None => times.iter().copied().fold(Real::NEG_INFINITY, Real::max),
        };

        if self.is_uniform() {
            return Ok(vec![1.0; times.len()]);
        }

        Ok(times
            .iter()
            .map(|&t| {
                if t <= reference {
                    ((t - reference) / self.memory).exp()
                } else if self.causal {
                    0.0
                } else {
                    ((reference - t) / self.memory).exp()
                }
            })
            .collect())
    }
}
