use std::fmt;

use crate::{check_samples, AffineMatrix, InputError, Real, Triple};

/// Component a [`Metric`] summarises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    X,
    Y,
    Z,
    /// Difference of total-field magnitudes.
    DF,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Element::X => "X",
            Element::Y => "Y",
            Element::Z => "Z",
            Element::DF => "dF",
        };
        f.write_str(s)
    }
}

/// Mean absolute error and standard deviation of one residual component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metric {
    pub element: Element,
    pub absmean: Real,
    pub stddev: Real,
}

impl Metric {
    fn from_residuals(element: Element, residuals: &[Real]) -> Self {
        let n = residuals.len() as Real;
        let absmean = residuals.iter().map(|r| r.abs()).sum::<Real>() / n;
        let mean = residuals.iter().sum::<Real>() / n;
        let var = residuals.iter().map(|r| (r - mean) * (r - mean)).sum::<Real>() / n;
        Self {
            element,
            absmean,
            stddev: var.sqrt(),
        }
    }
}

/// Residual statistics of `matrix` applied to `ordinates` against `absolutes`.
///
/// Returns metrics for X, Y, Z and dF, in that order. Residuals are
/// `M·o − a`; dF compares `|M·o|` with `|a|`.
pub fn residual_metrics(
    matrix: &AffineMatrix,
    ordinates: &Triple,
    absolutes: &Triple,
) -> Result<Vec<Metric>, InputError> {
    let n = check_samples(ordinates, absolutes, None)?;
    let predicted = matrix.apply(ordinates);

    let mut metrics = Vec::with_capacity(4);
    for (c, element) in [Element::X, Element::Y, Element::Z].into_iter().enumerate() {
        let residuals: Vec<Real> = predicted
            .channel(c)
            .iter()
            .zip(absolutes.channel(c))
            .map(|(p, a)| p - a)
            .collect();
        metrics.push(Metric::from_residuals(element, &residuals));
    }

    let df: Vec<Real> = (0..n)
        .map(|i| predicted.point(i).norm() - absolutes.point(i).norm())
        .collect();
    metrics.push(Metric::from_residuals(Element::DF, &df));
    Ok(metrics)
}
