//! Homogeneous affine matrices and the soft-failure result type.

use std::fmt;

use crate::{nan_matrix, to_homogeneous, Mat3, Mat4, Real, Triple, Vec3};

/// A 4×4 homogeneous affine matrix mapping ordinates onto absolutes.
///
/// The top-left 3×3 block is the linear part, the first three entries of the
/// last column are the translation, and the bottom row is always
/// `[0, 0, 0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix(Mat4);

impl AffineMatrix {
    pub fn identity() -> Self {
        Self(Mat4::identity())
    }

    /// Build from the top three rows; the bottom row is fixed.
    pub fn from_rows(rows: [[Real; 4]; 3]) -> Self {
        let [r0, r1, r2] = rows;
        Self(Mat4::new(
            r0[0], r0[1], r0[2], r0[3], //
            r1[0], r1[1], r1[2], r1[3], //
            r2[0], r2[1], r2[2], r2[3], //
            0.0, 0.0, 0.0, 1.0,
        ))
    }

    /// Build from a linear block and a translation.
    pub fn from_parts(linear: &Mat3, translation: &Vec3) -> Self {
        let mut m = Mat4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(linear);
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(translation);
        Self(m)
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.0
    }

    pub fn into_inner(self) -> Mat4 {
        self.0
    }

    /// The 3×3 linear (rotation/scale/shear) block.
    pub fn linear(&self) -> Mat3 {
        self.0.fixed_view::<3, 3>(0, 0).into_owned()
    }

    pub fn translation(&self) -> Vec3 {
        self.0.fixed_view::<3, 1>(0, 3).into_owned()
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Map a single ordinate vector.
    pub fn transform_vector(&self, v: &Vec3) -> Vec3 {
        let h = self.0 * to_homogeneous(v);
        Vec3::new(h.x, h.y, h.z)
    }

    /// Map every sample of a triple.
    pub fn apply(&self, ordinates: &Triple) -> Triple {
        let points: Vec<Vec3> = ordinates
            .points()
            .map(|p| self.transform_vector(&p))
            .collect();
        Triple::from_points(&points)
    }

    /// `self ∘ first`: apply `first`, then `self`.
    pub fn compose(&self, first: &AffineMatrix) -> AffineMatrix {
        AffineMatrix(self.0 * first.0)
    }
}

impl From<AffineMatrix> for Mat4 {
    fn from(m: AffineMatrix) -> Self {
        m.0
    }
}

/// Why a strategy declined to produce a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// The weighted design matrix does not have full column rank.
    RankDeficient {
        strategy: &'static str,
        observed_rank: usize,
        required_rank: usize,
    },
    /// The cross-covariance does not span enough directions to fix a rotation.
    WeakCovariance {
        strategy: &'static str,
        observed_rank: usize,
        required_rank: usize,
    },
    /// The per-axis scale split of a QR factor hit a zero diagonal.
    SingularScale { strategy: &'static str },
    /// Every weight is zero.
    NoWeight { strategy: &'static str },
}

impl Degeneracy {
    pub fn strategy(&self) -> &'static str {
        match self {
            Degeneracy::RankDeficient { strategy, .. }
            | Degeneracy::WeakCovariance { strategy, .. }
            | Degeneracy::SingularScale { strategy }
            | Degeneracy::NoWeight { strategy } => strategy,
        }
    }
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degeneracy::RankDeficient {
                strategy,
                observed_rank,
                required_rank,
            } => write!(
                f,
                "{strategy}: design matrix rank {observed_rank} < {required_rank}"
            ),
            Degeneracy::WeakCovariance {
                strategy,
                observed_rank,
                required_rank,
            } => write!(
                f,
                "{strategy}: cross-covariance rank {observed_rank} < {required_rank}"
            ),
            Degeneracy::SingularScale { strategy } => {
                write!(f, "{strategy}: zero scale on the QR diagonal")
            }
            Degeneracy::NoWeight { strategy } => write!(f, "{strategy}: all weights are zero"),
        }
    }
}

/// Outcome of a calibration fit.
///
/// Degenerate systems are never raised as errors; consumers must treat a
/// [`AffineResult::Degenerate`] as "no usable calibration for this interval".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AffineResult {
    Solved(AffineMatrix),
    Degenerate(Degeneracy),
}

impl AffineResult {
    /// The 4×4 matrix, or the all-NaN sentinel when degenerate.
    pub fn matrix(&self) -> Mat4 {
        match self {
            AffineResult::Solved(m) => *m.matrix(),
            AffineResult::Degenerate(_) => nan_matrix(),
        }
    }

    pub fn solved(&self) -> Option<&AffineMatrix> {
        match self {
            AffineResult::Solved(m) => Some(m),
            AffineResult::Degenerate(_) => None,
        }
    }

    pub fn degeneracy(&self) -> Option<&Degeneracy> {
        match self {
            AffineResult::Solved(_) => None,
            AffineResult::Degenerate(d) => Some(d),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, AffineResult::Degenerate(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_fixes_bottom_row() {
        let m = AffineMatrix::from_rows([
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
        ]);
        assert_eq!(m.matrix().row(3).iter().copied().collect::<Vec<_>>(), vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(m.translation(), Vec3::new(4.0, 8.0, 12.0));
        assert_eq!(m.linear()[(2, 1)], 10.0);
    }

    #[test]
    fn apply_and_compose_agree() {
        let a = AffineMatrix::from_parts(
            &Mat3::from_diagonal(&Vec3::new(2.0, 2.0, 1.0)),
            &Vec3::new(1.0, 0.0, -1.0),
        );
        let b = AffineMatrix::from_parts(&Mat3::identity(), &Vec3::new(0.0, 3.0, 0.0));
        let ords = Triple::from_points(&[Vec3::new(1.0, 1.0, 1.0), Vec3::new(-2.0, 0.5, 4.0)]);

        let stepwise = b.apply(&a.apply(&ords));
        let composed = b.compose(&a).apply(&ords);
        for i in 0..ords.len() {
            assert!((stepwise.point(i) - composed.point(i)).norm() < 1e-12);
        }
        assert_eq!(composed.point(0), Vec3::new(3.0, 5.0, 0.0));
    }

    #[test]
    fn degenerate_result_is_all_nan() {
        let r = AffineResult::Degenerate(Degeneracy::NoWeight { strategy: "test" });
        assert!(r.is_degenerate());
        assert!(r.solved().is_none());
        assert!(r.matrix().iter().all(|v| v.is_nan()));
        assert_eq!(r.degeneracy().map(|d| d.strategy()), Some("test"));
    }
}
