//! Deterministic synthetic calibration data.
//!
//! The helpers build ordinate triples spread around a nominal field, push
//! them through a known affine matrix and optionally perturb the result with
//! bounded uniform noise. Every generator takes an explicit seed so tests are
//! reproducible.

use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{AffineMatrix, Real, Triple, Vec3};

/// Ordinates paired with the absolutes produced from them.
#[derive(Debug, Clone)]
pub struct SyntheticPair {
    pub ordinates: Triple,
    pub absolutes: Triple,
    /// Evenly spaced sample times starting at zero.
    pub times: Vec<Real>,
}

/// `n` ordinates uniformly distributed in a box of half-width `spread`
/// around `center`.
pub fn ordinates_around(n: usize, center: Vec3, spread: Real, seed: u64) -> Triple {
    let mut rng = StdRng::seed_from_u64(seed);
    let points: Vec<Vec3> = (0..n)
        .map(|_| {
            center
                + Vec3::new(
                    rng.random_range(-spread..=spread),
                    rng.random_range(-spread..=spread),
                    rng.random_range(-spread..=spread),
                )
        })
        .collect();
    Triple::from_points(&points)
}

/// Add independent uniform noise in `[-amplitude, amplitude]` to every value.
pub fn with_noise(samples: &Triple, amplitude: Real, seed: u64) -> Result<Triple> {
    if amplitude == 0.0 {
        return Ok(samples.clone());
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut channels: [Vec<Real>; 3] = Default::default();
    for (c, out) in channels.iter_mut().enumerate() {
        *out = samples
            .channel(c)
            .iter()
            .map(|v| v + rng.random_range(-amplitude..=amplitude))
            .collect();
    }
    let [x, y, z] = channels;
    Ok(Triple::new(x, y, z)?)
}

/// Sample times `0, step, 2·step, ...`.
pub fn uniform_times(n: usize, step: Real) -> Vec<Real> {
    (0..n).map(|i| i as Real * step).collect()
}

/// Build a calibration pair whose absolutes are `truth` applied to random
/// ordinates, plus optional noise.
pub fn pair_from_affine(
    truth: &AffineMatrix,
    n: usize,
    center: Vec3,
    spread: Real,
    noise: Real,
    seed: u64,
) -> Result<SyntheticPair> {
    if n == 0 {
        anyhow::bail!("need at least one synthetic sample");
    }
    let ordinates = ordinates_around(n, center, spread, seed);
    let absolutes = with_noise(&truth.apply(&ordinates), noise, seed.wrapping_add(1))?;
    Ok(SyntheticPair {
        ordinates,
        absolutes,
        times: uniform_times(n, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generators_are_deterministic() {
        let a = ordinates_around(5, Vec3::new(20000.0, 0.0, 45000.0), 100.0, 7);
        let b = ordinates_around(5, Vec3::new(20000.0, 0.0, 45000.0), 100.0, 7);
        assert_eq!(a, b);
        for p in a.points() {
            assert!((p.x - 20000.0).abs() <= 100.0);
            assert!((p.z - 45000.0).abs() <= 100.0);
        }
    }

    #[test]
    fn noiseless_pair_matches_truth() {
        let truth = AffineMatrix::from_parts(&crate::Mat3::identity(), &Vec3::new(1.0, -2.0, 3.0));
        let pair = pair_from_affine(&truth, 4, Vec3::zeros(), 10.0, 0.0, 3).unwrap();
        assert_eq!(pair.times, vec![0.0, 1.0, 2.0, 3.0]);
        for i in 0..4 {
            let d = pair.absolutes.point(i) - pair.ordinates.point(i);
            assert!((d - Vec3::new(1.0, -2.0, 3.0)).norm() < 1e-12);
        }
    }

    #[test]
    fn empty_pair_is_an_error() {
        let pair = pair_from_affine(&AffineMatrix::identity(), 0, Vec3::zeros(), 1.0, 0.0, 0);
        assert!(pair.is_err());
    }
}
