//! Solver module - matrix assembly and generalized eigenvalue solves.

mod assembly;
mod eigen;
mod integrals;
mod symmetry;

pub use assembly::{Solver, SymmetrizedTerm};
pub use eigen::{smallest_singular_value, solve_general, solve_hermitian};
pub use integrals::{gaussian_well, overlap, PairIntegrals};
pub use symmetry::{exchange_groups, permutations, ExchangeGroup, Permutation};

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

/// Assembled matrices and the spectrum of one basis.
///
/// Plain value type: the driver owns one and every search worker gets its
/// own clone.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverResults {
    pub overlap: DMatrix<f64>,
    pub kinetic: DMatrix<Complex64>,
    pub potential: DMatrix<Complex64>,
    /// Sorted ascending by real part.
    pub eigenvalues: Vec<Complex64>,
    /// Column eigenvectors matching `eigenvalues`; empty for rotated solves.
    pub eigenvectors: Vec<DVector<Complex64>>,
}

impl Default for SolverResults {
    fn default() -> Self {
        Self {
            overlap: DMatrix::zeros(0, 0),
            kinetic: DMatrix::zeros(0, 0),
            potential: DMatrix::zeros(0, 0),
            eigenvalues: Vec::new(),
            eigenvectors: Vec::new(),
        }
    }
}

impl SolverResults {
    /// H = T + V
    pub fn hamiltonian(&self) -> DMatrix<Complex64> {
        &self.kinetic + &self.potential
    }

    /// Size of the basis the matrices were assembled against.
    pub fn dimension(&self) -> usize {
        self.overlap.nrows()
    }
}
