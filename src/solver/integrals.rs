//! Closed-form matrix elements between two correlated Gaussians (3-D, ħ = 1).
//!
//! With C = (A + B)^{-1} and n = N - 1 relative coordinates:
//! - overlap   ⟨A|B⟩   = N_A N_B ((2π)^n / det(A + B))^{3/2}
//! - kinetic   ⟨A|T|B⟩ = 3/2 tr(A C B Λ) ⟨A|B⟩
//! - pair width c_ij   = 1 / (ω_ijᵀ C ω_ij)

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

use crate::basis::CorrelatedGaussian;
use crate::error::{Result, SvmError};

/// Quantities shared by every integral of one bra/ket pair.
pub struct PairIntegrals {
    /// (A + B)^{-1}
    pub inverse: DMatrix<f64>,
    pub overlap: f64,
}

impl PairIntegrals {
    pub fn new(a: &CorrelatedGaussian, b: &CorrelatedGaussian) -> Result<Self> {
        let sum = a.correlation() + b.correlation();
        let det = sum.determinant();
        let inverse = sum
            .cholesky()
            .map(|c| c.inverse())
            .ok_or_else(|| SvmError::SingularMatrix("sum of correlation matrices is not positive definite".to_string()))?;
        Ok(Self {
            inverse,
            overlap: overlap_from_det(a, b, det),
        })
    }

    pub fn kinetic(&self, a: &CorrelatedGaussian, b: &CorrelatedGaussian, lambda: &DMatrix<f64>) -> f64 {
        let c = a.correlation() * &self.inverse * b.correlation() * lambda;
        1.5 * c.trace() * self.overlap
    }

    pub fn pair_width(&self, omega: &DVector<f64>) -> f64 {
        1.0 / omega.dot(&(&self.inverse * omega))
    }
}

fn overlap_from_det(a: &CorrelatedGaussian, b: &CorrelatedGaussian, det: f64) -> f64 {
    let q = (2.0 * PI).powi(a.dimension() as i32) / det;
    a.norm() * b.norm() * q * q.sqrt()
}

/// ⟨A|B⟩
pub fn overlap(a: &CorrelatedGaussian, b: &CorrelatedGaussian) -> f64 {
    let det = (a.correlation() + b.correlation()).determinant();
    overlap_from_det(a, b, det)
}

/// Gaussian well v0 exp(-r²/2r0²) between one pair, rotated by θ.
///
/// The pair separation is Gaussian-distributed with width c, so the
/// element reduces to a 3-D radial integral:
///   (c/2π)^{3/2} ⟨A|B⟩ v0 π^{3/2} a^{-3/2},   a = c/2 + e^{2iθ}/(2 r0²)
pub fn gaussian_well(v0: f64, r0: f64, theta: f64, overlap: f64, c: f64) -> Complex64 {
    let a = Complex64::new(0.5 * c, 0.0) + Complex64::new(0.0, 2.0 * theta).exp() / (2.0 * r0 * r0);
    let integral = v0 * PI * PI.sqrt() * a.powf(-1.5);
    integral * (c / (2.0 * PI)).powf(1.5) * overlap
}
