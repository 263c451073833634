//! Linear least squares with numerical rank detection.
//!
//! Minimises `‖A·x − b‖₂` through an SVD of the design matrix. Columns are
//! equilibrated to unit norm first: ordinate columns sit near 1e4 nT next to a
//! constant column of ones, and the raw system loses five digits to that
//! spread. Singular values of the scaled system below
//! `ε · max(rows, cols) · σ_max` are treated as zero; their count sets the
//! numerical rank, and the returned solution is the minimum-norm one.
//! Callers compare the rank against the number of coefficients they need and
//! decline to use rank-deficient solutions.

use adjusted_core::Real;
use log::debug;
use nalgebra::{DMatrix, DVector};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LeastSquaresError {
    #[error("design has {design} rows but target has {target}")]
    ShapeMismatch { design: usize, target: usize },
    #[error("svd failed: {0}")]
    SvdFailed(&'static str),
}

/// Output of [`solve_least_squares`].
#[derive(Debug, Clone)]
pub struct LeastSquaresSolution {
    /// One column of coefficients per target column.
    pub coefficients: DMatrix<Real>,
    /// Sum of squared residuals per target column.
    pub residuals: Vec<Real>,
    /// Numerical rank of the design matrix.
    pub rank: usize,
    /// Singular values of the column-scaled design matrix.
    pub singular_values: DVector<Real>,
}

impl LeastSquaresSolution {
    /// Coefficients for right-hand side `j`.
    pub fn column(&self, j: usize) -> Vec<Real> {
        self.coefficients.column(j).iter().copied().collect()
    }
}

/// Cut-off below which a singular value counts as zero.
pub fn rank_tolerance(nrows: usize, ncols: usize, singular_values: &DVector<Real>) -> Real {
    let sigma_max = singular_values.iter().copied().fold(0.0, Real::max);
    Real::EPSILON * nrows.max(ncols) as Real * sigma_max
}

/// Count singular values above the tolerance.
pub fn numerical_rank(singular_values: &DVector<Real>, tol: Real) -> usize {
    singular_values.iter().filter(|&&s| s > tol).count()
}

/// Euclidean norm of each column, with all-zero columns reported as 1.
fn column_norms(design: &DMatrix<Real>) -> Vec<Real> {
    design
        .column_iter()
        .map(|c| {
            let n = c.norm();
            if n > 0.0 {
                n
            } else {
                1.0
            }
        })
        .collect()
}

/// Solve `design · x ≈ target` in the least-squares sense.
pub fn solve_least_squares(
    design: &DMatrix<Real>,
    target: &DMatrix<Real>,
) -> Result<LeastSquaresSolution, LeastSquaresError> {
    if design.nrows() != target.nrows() {
        return Err(LeastSquaresError::ShapeMismatch {
            design: design.nrows(),
            target: target.nrows(),
        });
    }

    let norms = column_norms(design);
    let mut scaled = design.clone();
    for (j, n) in norms.iter().enumerate() {
        scaled.column_mut(j).unscale_mut(*n);
    }

    let svd = scaled.svd(true, true);
    let tol = rank_tolerance(design.nrows(), design.ncols(), &svd.singular_values);
    let rank = numerical_rank(&svd.singular_values, tol);

    let mut coefficients = svd
        .solve(target, tol)
        .map_err(LeastSquaresError::SvdFailed)?;
    for (j, n) in norms.iter().enumerate() {
        coefficients.row_mut(j).unscale_mut(*n);
    }

    let fitted = design * &coefficients;
    let residuals: Vec<Real> = (0..target.ncols())
        .map(|j| (fitted.column(j) - target.column(j)).norm_squared())
        .collect();

    debug!(
        "least squares {}x{}: rank {}, residuals {:?}",
        design.nrows(),
        design.ncols(),
        rank,
        residuals
    );

    Ok(LeastSquaresSolution {
        coefficients,
        residuals,
        rank,
        singular_values: svd.singular_values,
    })
}
