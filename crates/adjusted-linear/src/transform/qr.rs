use adjusted_core::{AffineMatrix, AffineResult, Degeneracy, Mat2, Real, Triple, Vec2};

use super::{admit, degenerate, AffineEstimator, TransformError};
use crate::design::{resolve_weights, LinearSystem, WeightingMode};
use crate::lstsq::solve_least_squares;
use crate::rotation::{centered, rotation_shear, weighted_centroid};

/// Horizontal affine reduced to rotation and shear by QR; Z is translated only.
///
/// A weighted regression of centred horizontal absolutes on centred
/// horizontal ordinates gives a 2×2 block `A`. `A = Q·R` is sign-corrected
/// so `Q` is a proper rotation, the per-axis scale `diag(R)` is removed, and
/// the remaining `Q·diag(R)⁻¹·R` becomes the linear block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QrFactorization;

impl AffineEstimator for QrFactorization {
    const NAME: &'static str = "QrFactorization";

    fn calculate(
        &self,
        ordinates: &Triple,
        absolutes: &Triple,
        weights: Option<&[Real]>,
    ) -> Result<AffineResult, TransformError> {
        if let Some(reason) = admit(Self::NAME, ordinates, absolutes, weights)? {
            return Ok(degenerate(reason));
        }

        let w = resolve_weights(weights, ordinates.len(), WeightingMode::Raw);
        let co = weighted_centroid(ordinates, &w);
        let ca = weighted_centroid(absolutes, &w);

        // one row per sample: [ox, oy] -> [ax, ay]
        let system = LinearSystem {
            design: centered(ordinates, &co, 2).transpose(),
            target: centered(absolutes, &ca, 2).transpose(),
        }
        .weighted(weights);
        let solution = solve_least_squares(&system.design, &system.target)?;

        if solution.rank < 2 {
            return Ok(degenerate(Degeneracy::RankDeficient {
                strategy: Self::NAME,
                observed_rank: solution.rank,
                required_rank: 2,
            }));
        }

        let m = &solution.coefficients;
        let linear = Mat2::new(m[(0, 0)], m[(1, 0)], m[(0, 1)], m[(1, 1)]);
        let Some(qh) = rotation_shear(&linear) else {
            return Ok(degenerate(Degeneracy::SingularScale {
                strategy: Self::NAME,
            }));
        };

        let t = Vec2::new(ca.x, ca.y) - qh * Vec2::new(co.x, co.y);
        Ok(AffineResult::Solved(AffineMatrix::from_rows([
            [qh[(0, 0)], qh[(0, 1)], 0.0, t.x],
            [qh[(1, 0)], qh[(1, 1)], 0.0, t.y],
            [0.0, 0.0, 1.0, ca.z - co.z],
        ])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adjusted_core::Vec3;

    fn ordinates() -> Triple {
        Triple::from_points(&[
            Vec3::new(100.0, 0.0, 1.0),
            Vec3::new(0.0, 100.0, 2.0),
            Vec3::new(-100.0, 0.0, 3.0),
            Vec3::new(0.0, -100.0, 4.0),
            Vec3::new(50.0, 50.0, 5.0),
        ])
    }

    #[test]
    fn scaled_rotation_reduces_to_rotation() {
        let theta: Real = 0.3;
        let (s, c) = theta.sin_cos();
        let truth = AffineMatrix::from_rows([
            [1.5 * c, -0.8 * s, 0.0, 4.0],
            [1.5 * s, 0.8 * c, 0.0, -2.0],
            [0.0, 0.0, 1.0, 9.0],
        ]);
        let ords = ordinates();
        let abs = truth.apply(&ords);
        let r = QrFactorization.calculate(&ords, &abs, None).unwrap();
        let got = r.solved().unwrap();

        let lin = got.linear();
        assert!((lin[(0, 0)] - c).abs() < 1e-10);
        assert!((lin[(1, 0)] - s).abs() < 1e-10);
        assert!((lin[(0, 1)] + s).abs() < 1e-10);
        assert!((lin[(1, 1)] - c).abs() < 1e-10);
        assert!((got.translation().z - 9.0).abs() < 1e-12);
    }

    #[test]
    fn mirrored_horizontal_plane_still_yields_rotation() {
        let mirror = AffineMatrix::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, -1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ]);
        let ords = ordinates();
        let abs = mirror.apply(&ords);
        let r = QrFactorization.calculate(&ords, &abs, Some(&[1.0, 2.0, 1.0, 2.0, 1.0])).unwrap();
        let det = r.solved().unwrap().linear().determinant();
        assert!((det - 1.0).abs() < 1e-10, "det {det}");
    }

    #[test]
    fn colinear_horizontal_samples_are_degenerate() {
        let pts: Vec<Vec3> = (0..4).map(|i| Vec3::new(i as Real, 2.0 * i as Real, 1.0)).collect();
        let t = Triple::from_points(&pts);
        let r = QrFactorization.calculate(&t, &t, None).unwrap();
        assert!(matches!(
            r.degeneracy(),
            Some(Degeneracy::RankDeficient {
                observed_rank: 1,
                required_rank: 2,
                ..
            })
        ));
    }
}
