//! Correlated Gaussian basis functions.
//!
//! A function is exp(-½ xᵀ A x) in Jacobi coordinates x, with the
//! correlation matrix A built from pairwise widths:
//!
//!   A_kl = Σ_{i>j} ω_ij(k) ω_ij(l) / w_ij²

use std::f64::consts::PI;

use nalgebra::DMatrix;

use crate::system::System;

/// An ordered basis; the order fixes the row/column index of every matrix element.
pub type Basis = Vec<CorrelatedGaussian>;

/// A single correlated Gaussian. Immutable apart from its strain tag.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelatedGaussian {
    widths: DMatrix<f64>,
    correlation: DMatrix<f64>,
    norm: f64,
    strain: Option<usize>,
}

impl CorrelatedGaussian {
    /// Build from a symmetric widths matrix, deriving A and the norm.
    pub fn from_widths<S: System + ?Sized>(widths: DMatrix<f64>, system: &S) -> Self {
        let n = widths.nrows();
        debug_assert_eq!(n, widths.ncols());

        let mut correlation = DMatrix::zeros(n - 1, n - 1);
        for i in 0..n {
            for j in 0..i {
                let w = system.omega(i, j);
                let inv_sq = 1.0 / (widths[(i, j)] * widths[(i, j)]);
                correlation += (w * w.transpose()) * inv_sq;
            }
        }

        let norm = normalization(&correlation);
        Self {
            widths,
            correlation,
            norm,
            strain: None,
        }
    }

    /// Rebuild a function from stored components, e.g. a persisted basis.
    pub fn from_parts(widths: DMatrix<f64>, correlation: DMatrix<f64>, norm: f64) -> Self {
        Self {
            widths,
            correlation,
            norm,
            strain: None,
        }
    }

    /// Reindex particles: widths'(i, j) = widths(perm[i], perm[j]).
    pub fn permuted<S: System + ?Sized>(&self, perm: &[usize], system: &S) -> Self {
        let n = self.widths.nrows();
        let widths = DMatrix::from_fn(n, n, |i, j| self.widths[(perm[i], perm[j])]);
        Self::from_widths(widths, system)
    }

    pub fn with_strain(mut self, strain: usize) -> Self {
        self.strain = Some(strain);
        self
    }

    pub fn set_strain(&mut self, strain: usize) {
        self.strain = Some(strain);
    }

    pub fn widths(&self) -> &DMatrix<f64> {
        &self.widths
    }

    pub fn correlation(&self) -> &DMatrix<f64> {
        &self.correlation
    }

    pub fn norm(&self) -> f64 {
        self.norm
    }

    pub fn strain(&self) -> Option<usize> {
        self.strain
    }

    /// Number of relative coordinates (particles - 1).
    pub fn dimension(&self) -> usize {
        self.correlation.nrows()
    }
}

/// ⟨A|A⟩^{-1/2} = ((2π)^n / det(2A))^{-3/4}
fn normalization(correlation: &DMatrix<f64>) -> f64 {
    let n = correlation.nrows() as i32;
    let det = (correlation * 2.0).determinant();
    ((2.0 * PI).powi(n) / det).powf(-0.75)
}
