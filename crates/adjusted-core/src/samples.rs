//! Three-channel sample containers.
//!
//! A [`Triple`] holds `N` aligned samples for each of three orthogonal
//! channels. Ordinates are instrument readings (H, E, Z); absolutes are the
//! reference field (X, Y, Z). Instant alignment between an ordinate triple
//! and its absolute triple is the producer's responsibility; only lengths and
//! finiteness are checked here.

use crate::{InputError, Real, Vec3};

/// Three equal-length channels of aligned samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    channels: [Vec<Real>; 3],
}

impl Triple {
    /// Build a triple from its three channels.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::LengthMismatch`] if the channels differ in length.
    pub fn new(x: Vec<Real>, y: Vec<Real>, z: Vec<Real>) -> Result<Self, InputError> {
        let n = x.len();
        for (what, ch) in [("channel 1", &y), ("channel 2", &z)] {
            if ch.len() != n {
                return Err(InputError::LengthMismatch {
                    what,
                    expected: n,
                    got: ch.len(),
                });
            }
        }
        Ok(Self {
            channels: [x, y, z],
        })
    }

    /// Build a triple from per-sample vectors.
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut channels = [
            Vec::with_capacity(points.len()),
            Vec::with_capacity(points.len()),
            Vec::with_capacity(points.len()),
        ];
        for p in points {
            channels[0].push(p.x);
            channels[1].push(p.y);
            channels[2].push(p.z);
        }
        Self { channels }
    }

    /// Number of samples per channel.
    pub fn len(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Channel `c` (0, 1 or 2).
    ///
    /// # Panics
    ///
    /// Panics if `c > 2`.
    pub fn channel(&self, c: usize) -> &[Real] {
        &self.channels[c]
    }

    pub fn x(&self) -> &[Real] {
        &self.channels[0]
    }

    pub fn y(&self) -> &[Real] {
        &self.channels[1]
    }

    pub fn z(&self) -> &[Real] {
        &self.channels[2]
    }

    /// Sample `i` as a vector.
    pub fn point(&self, i: usize) -> Vec3 {
        Vec3::new(self.channels[0][i], self.channels[1][i], self.channels[2][i])
    }

    /// Iterate over samples as vectors.
    pub fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..self.len()).map(move |i| self.point(i))
    }

    /// Index of the first non-finite value, if any.
    fn first_non_finite(&self) -> Option<usize> {
        (0..self.len()).find(|&i| self.channels.iter().any(|ch| !ch[i].is_finite()))
    }
}

/// Validate an ordinate/absolute pair and optional weights.
///
/// Returns the common sample count on success. Checks run in order and stop
/// at the first violation: emptiness, lengths, finiteness, weight sign.
pub fn check_samples(
    ordinates: &Triple,
    absolutes: &Triple,
    weights: Option<&[Real]>,
) -> Result<usize, InputError> {
    let n = ordinates.len();
    if n == 0 {
        return Err(InputError::EmptyInput("ordinates"));
    }
    if absolutes.len() != n {
        return Err(InputError::LengthMismatch {
            what: "absolutes",
            expected: n,
            got: absolutes.len(),
        });
    }
    if let Some(index) = ordinates.first_non_finite() {
        return Err(InputError::NonFinite {
            what: "ordinates",
            index,
        });
    }
    if let Some(index) = absolutes.first_non_finite() {
        return Err(InputError::NonFinite {
            what: "absolutes",
            index,
        });
    }
    if let Some(w) = weights {
        if w.len() != n {
            return Err(InputError::LengthMismatch {
                what: "weights",
                expected: n,
                got: w.len(),
            });
        }
        for (index, &value) in w.iter().enumerate() {
            if !value.is_finite() {
                return Err(InputError::NonFinite {
                    what: "weights",
                    index,
                });
            }
            if value < 0.0 {
                return Err(InputError::NegativeWeight { index, value });
            }
        }
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(n: usize) -> Triple {
        let v: Vec<Real> = (0..n).map(|i| i as Real).collect();
        Triple::new(v.clone(), v.clone(), v).unwrap()
    }

    #[test]
    fn mismatched_channels_are_rejected() {
        let err = Triple::new(vec![1.0, 2.0], vec![1.0], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            InputError::LengthMismatch {
                what: "channel 1",
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn points_roundtrip_through_channels() {
        let pts = vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)];
        let t = Triple::from_points(&pts);
        assert_eq!(t.len(), 2);
        assert_eq!(t.y(), &[2.0, 5.0]);
        assert_eq!(t.point(1), pts[1]);
        assert_eq!(t.points().collect::<Vec<_>>(), pts);
    }

    #[test]
    fn empty_pair_fails_fast() {
        let empty = triple(0);
        assert_eq!(
            check_samples(&empty, &empty, None),
            Err(InputError::EmptyInput("ordinates"))
        );
    }

    #[test]
    fn length_and_weight_checks() {
        let a = triple(3);
        let b = triple(4);
        assert!(matches!(
            check_samples(&a, &b, None),
            Err(InputError::LengthMismatch {
                what: "absolutes",
                ..
            })
        ));
        assert!(matches!(
            check_samples(&a, &a, Some(&[1.0, 1.0])),
            Err(InputError::LengthMismatch {
                what: "weights",
                ..
            })
        ));
        assert_eq!(
            check_samples(&a, &a, Some(&[1.0, -0.5, 1.0])),
            Err(InputError::NegativeWeight {
                index: 1,
                value: -0.5
            })
        );
        assert_eq!(check_samples(&a, &a, Some(&[0.0, 0.5, 1.0])), Ok(3));
    }

    #[test]
    fn non_finite_values_are_located() {
        let a = triple(3);
        let b = Triple::new(vec![0.0, 1.0, 2.0], vec![0.0, Real::NAN, 2.0], vec![0.0; 3]).unwrap();
        assert_eq!(
            check_samples(&a, &b, None),
            Err(InputError::NonFinite {
                what: "absolutes",
                index: 1
            })
        );
    }
}
