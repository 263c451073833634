//! Constrained least-squares strategies.
//!
//! Each strategy is a design-matrix layout from [`crate::design`] plus the
//! rule that places the solved coefficients into the affine matrix. The
//! system is weighted by `sqrt(w)` per sample and must have full column rank.

use adjusted_core::{AffineMatrix, AffineResult, Degeneracy, Real, Triple};

use super::{admit, degenerate, AffineEstimator, TransformError};
use crate::design::{self, LinearSystem};
use crate::lstsq::solve_least_squares;

/// A strategy expressed as a linear model over its free coefficients.
trait LinearModel: AffineEstimator {
    /// Number of free coefficients (design-matrix columns).
    const DOF: usize;

    fn system(ordinates: &Triple, absolutes: &Triple) -> LinearSystem;

    /// Place coefficients `m` (length [`Self::DOF`]) into the affine matrix.
    fn assemble(m: &[Real]) -> AffineMatrix;
}

fn fit<M: LinearModel>(
    ordinates: &Triple,
    absolutes: &Triple,
    weights: Option<&[Real]>,
) -> Result<AffineResult, TransformError> {
    if let Some(reason) = admit(M::NAME, ordinates, absolutes, weights)? {
        return Ok(degenerate(reason));
    }

    let system = M::system(ordinates, absolutes).weighted(weights);
    let solution = solve_least_squares(&system.design, &system.target)?;

    if solution.rank < M::DOF {
        return Ok(degenerate(Degeneracy::RankDeficient {
            strategy: M::NAME,
            observed_rank: solution.rank,
            required_rank: M::DOF,
        }));
    }

    Ok(AffineResult::Solved(M::assemble(&solution.column(0))))
}

/// Full 12-parameter affine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoConstraints;

impl LinearModel for NoConstraints {
    const DOF: usize = 12;

    fn system(ordinates: &Triple, absolutes: &Triple) -> LinearSystem {
        design::no_constraints(ordinates, absolutes)
    }

    fn assemble(m: &[Real]) -> AffineMatrix {
        AffineMatrix::from_rows([
            [m[0], m[1], m[2], m[3]],
            [m[4], m[5], m[6], m[7]],
            [m[8], m[9], m[10], m[11]],
        ])
    }
}

impl AffineEstimator for NoConstraints {
    const NAME: &'static str = "NoConstraints";

    fn calculate(
        &self,
        ordinates: &Triple,
        absolutes: &Triple,
        weights: Option<&[Real]>,
    ) -> Result<AffineResult, TransformError> {
        fit::<Self>(ordinates, absolutes, weights)
    }
}

/// Horizontal rotation and shear, independent Z scale, translation on all axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZRotationShear;

impl LinearModel for ZRotationShear {
    const DOF: usize = 8;

    fn system(ordinates: &Triple, absolutes: &Triple) -> LinearSystem {
        design::z_rotation_shear(ordinates, absolutes)
    }

    fn assemble(m: &[Real]) -> AffineMatrix {
        AffineMatrix::from_rows([
            [m[0], m[1], 0.0, m[2]],
            [m[3], m[4], 0.0, m[5]],
            [0.0, 0.0, m[6], m[7]],
        ])
    }
}

impl AffineEstimator for ZRotationShear {
    const NAME: &'static str = "ZRotationShear";

    fn calculate(
        &self,
        ordinates: &Triple,
        absolutes: &Triple,
        weights: Option<&[Real]>,
    ) -> Result<AffineResult, TransformError> {
        fit::<Self>(ordinates, absolutes, weights)
    }
}

/// Rotation about Z with a uniform horizontal scale; Z scale; translation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZRotationHscale;

impl LinearModel for ZRotationHscale {
    const DOF: usize = 6;

    fn system(ordinates: &Triple, absolutes: &Triple) -> LinearSystem {
        design::z_rotation_hscale(ordinates, absolutes)
    }

    fn assemble(m: &[Real]) -> AffineMatrix {
        AffineMatrix::from_rows([
            [m[0], m[1], 0.0, m[2]],
            [-m[1], m[0], 0.0, m[3]],
            [0.0, 0.0, m[4], m[5]],
        ])
    }
}

impl AffineEstimator for ZRotationHscale {
    const NAME: &'static str = "ZRotationHscale";

    fn calculate(
        &self,
        ordinates: &Triple,
        absolutes: &Triple,
        weights: Option<&[Real]>,
    ) -> Result<AffineResult, TransformError> {
        fit::<Self>(ordinates, absolutes, weights)
    }
}

/// Rotation about Z with a uniform horizontal scale and a Z baseline.
///
/// No horizontal translation, and Z keeps unit scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZRotationHscaleZbaseline;

impl LinearModel for ZRotationHscaleZbaseline {
    const DOF: usize = 3;

    fn system(ordinates: &Triple, absolutes: &Triple) -> LinearSystem {
        design::z_rotation_hscale_zbaseline(ordinates, absolutes)
    }

    fn assemble(m: &[Real]) -> AffineMatrix {
        AffineMatrix::from_rows([
            [m[0], m[1], 0.0, 0.0],
            [-m[1], m[0], 0.0, 0.0],
            [0.0, 0.0, 1.0, m[2]],
        ])
    }
}

impl AffineEstimator for ZRotationHscaleZbaseline {
    const NAME: &'static str = "ZRotationHscaleZbaseline";

    fn calculate(
        &self,
        ordinates: &Triple,
        absolutes: &Triple,
        weights: Option<&[Real]>,
    ) -> Result<AffineResult, TransformError> {
        fit::<Self>(ordinates, absolutes, weights)
    }
}

/// Independent per-axis scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rescale3D;

impl LinearModel for Rescale3D {
    const DOF: usize = 3;

    fn system(ordinates: &Triple, absolutes: &Triple) -> LinearSystem {
        design::rescale_3d(ordinates, absolutes)
    }

    fn assemble(m: &[Real]) -> AffineMatrix {
        AffineMatrix::from_rows([
            [m[0], 0.0, 0.0, 0.0],
            [0.0, m[1], 0.0, 0.0],
            [0.0, 0.0, m[2], 0.0],
        ])
    }
}

impl AffineEstimator for Rescale3D {
    const NAME: &'static str = "Rescale3D";

    fn calculate(
        &self,
        ordinates: &Triple,
        absolutes: &Triple,
        weights: Option<&[Real]>,
    ) -> Result<AffineResult, TransformError> {
        fit::<Self>(ordinates, absolutes, weights)
    }
}

/// Per-axis translation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslateOrigins;

impl LinearModel for TranslateOrigins {
    const DOF: usize = 3;

    fn system(ordinates: &Triple, absolutes: &Triple) -> LinearSystem {
        design::translate_origins(ordinates, absolutes)
    }

    fn assemble(m: &[Real]) -> AffineMatrix {
        AffineMatrix::from_rows([
            [1.0, 0.0, 0.0, m[0]],
            [0.0, 1.0, 0.0, m[1]],
            [0.0, 0.0, 1.0, m[2]],
        ])
    }
}

impl AffineEstimator for TranslateOrigins {
    const NAME: &'static str = "TranslateOrigins";

    fn calculate(
        &self,
        ordinates: &Triple,
        absolutes: &Triple,
        weights: Option<&[Real]>,
    ) -> Result<AffineResult, TransformError> {
        fit::<Self>(ordinates, absolutes, weights)
    }
}

/// Unit scales with Y sheared by X and Z sheared by X and Y.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShearYZ;

impl LinearModel for ShearYZ {
    const DOF: usize = 3;

    fn system(ordinates: &Triple, absolutes: &Triple) -> LinearSystem {
        design::shear_yz(ordinates, absolutes)
    }

    fn assemble(m: &[Real]) -> AffineMatrix {
        AffineMatrix::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [m[0], 1.0, 0.0, 0.0],
            [m[1], m[2], 1.0, 0.0],
        ])
    }
}

impl AffineEstimator for ShearYZ {
    const NAME: &'static str = "ShearYZ";

    fn calculate(
        &self,
        ordinates: &Triple,
        absolutes: &Triple,
        weights: Option<&[Real]>,
    ) -> Result<AffineResult, TransformError> {
        fit::<Self>(ordinates, absolutes, weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adjusted_core::{Mat3, Vec3};

    fn ordinates() -> Triple {
        Triple::from_points(&[
            Vec3::new(20000.0, 10.0, 45000.0),
            Vec3::new(20050.0, -40.0, 44980.0),
            Vec3::new(19970.0, 25.0, 45030.0),
            Vec3::new(20010.0, 60.0, 44950.0),
            Vec3::new(19990.0, -15.0, 45010.0),
        ])
    }

    fn assert_matrix_close(got: &AffineMatrix, want: &AffineMatrix, tol: Real) {
        let diff = (got.matrix() - want.matrix()).abs().max();
        assert!(diff < tol, "max diff {diff}\ngot {}\nwant {}", got.matrix(), want.matrix());
    }

    #[test]
    fn z_rotation_hscale_recovers_rotation_and_scale() {
        let (s, c) = (0.01_f64.sin() * 1.02, 0.01_f64.cos() * 1.02);
        let truth = AffineMatrix::from_rows([
            [c, s, 0.0, 12.0],
            [-s, c, 0.0, -7.0],
            [0.0, 0.0, 0.99, 30.0],
        ]);
        let ords = ordinates();
        let abs = truth.apply(&ords);
        let r = ZRotationHscale.calculate(&ords, &abs, None).unwrap();
        assert_matrix_close(r.solved().unwrap(), &truth, 1e-6);
    }

    #[test]
    fn zbaseline_keeps_unit_z_scale() {
        let truth = AffineMatrix::from_rows([
            [0.98, 0.02, 0.0, 0.0],
            [-0.02, 0.98, 0.0, 0.0],
            [0.0, 0.0, 1.0, -150.0],
        ]);
        let ords = ordinates();
        let abs = truth.apply(&ords);
        let r = ZRotationHscaleZbaseline.calculate(&ords, &abs, None).unwrap();
        assert_matrix_close(r.solved().unwrap(), &truth, 1e-8);
    }

    #[test]
    fn rescale_recovers_diagonal() {
        let truth = AffineMatrix::from_parts(
            &Mat3::from_diagonal(&Vec3::new(1.01, 0.97, 1.003)),
            &Vec3::zeros(),
        );
        let ords = ordinates();
        let abs = truth.apply(&ords);
        let r = Rescale3D.calculate(&ords, &abs, Some(&[1.0, 0.5, 0.25, 2.0, 1.0])).unwrap();
        assert_matrix_close(r.solved().unwrap(), &truth, 1e-10);
    }

    #[test]
    fn translate_origins_averages_offsets() {
        let ords = Triple::from_points(&[Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 1.0)]);
        let abs = Triple::from_points(&[Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 3.0, 4.0)]);
        let r = TranslateOrigins.calculate(&ords, &abs, None).unwrap();
        let t = r.solved().unwrap().translation();
        assert!((t - Vec3::new(2.0, 2.0, 3.0)).norm() < 1e-12);
        assert_eq!(r.solved().unwrap().linear(), Mat3::identity());
    }

    #[test]
    fn weights_pull_translation_toward_heavy_samples() {
        let ords = Triple::from_points(&[Vec3::zeros(), Vec3::zeros()]);
        let abs = Triple::from_points(&[Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0)]);
        let r = TranslateOrigins.calculate(&ords, &abs, Some(&[1.0, 3.0])).unwrap();
        assert!((r.solved().unwrap().translation().x - 3.0).abs() < 1e-12);
    }

    #[test]
    fn shear_yz_places_coefficients() {
        // data generated from the design rows themselves:
        // x = m0 + m1·ox + m2·ox, y = m1 + m2·oy, z = m2
        let (m0, m1, m2) = (0.5, -0.25, 2.0);
        let pts = [
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, -1.0, 0.0),
            Vec3::new(-2.0, 4.0, 0.0),
        ];
        let abs: Vec<Vec3> = pts
            .iter()
            .map(|o| Vec3::new(m0 + m1 * o.x + m2 * o.x, m1 + m2 * o.y, m2))
            .collect();
        let r = ShearYZ
            .calculate(&Triple::from_points(&pts), &Triple::from_points(&abs), None)
            .unwrap();
        let want = AffineMatrix::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [m0, 1.0, 0.0, 0.0],
            [m1, m2, 1.0, 0.0],
        ]);
        assert_matrix_close(r.solved().unwrap(), &want, 1e-10);
    }

    #[test]
    fn too_few_samples_for_full_affine() {
        let ords = Triple::from_points(&[Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.5, 2.0)]);
        let r = NoConstraints.calculate(&ords, &ords, None).unwrap();
        assert!(r.matrix().iter().all(|v| v.is_nan()));
        assert!(matches!(
            r.degeneracy(),
            Some(Degeneracy::RankDeficient {
                strategy: "NoConstraints",
                observed_rank: 6,
                required_rank: 12
            })
        ));
    }

    #[test]
    fn colinear_samples_are_rank_deficient() {
        let pts: Vec<Vec3> = (0..6).map(|i| Vec3::new(1.0, 2.0, 3.0) * i as Real).collect();
        let t = Triple::from_points(&pts);
        let r = ZRotationShear.calculate(&t, &t, None).unwrap();
        assert!(r.is_degenerate());
    }
}
