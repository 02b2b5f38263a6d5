//! Full and incremental assembly of overlap, kinetic and potential matrices.
//!
//! Element (m, n) symmetrizes the bra basis[m] over the exchange permutations
//! and is mirrored to (n, m). Summing over a permutation group on one side is
//! enough because the ket runs over the whole basis.

use std::sync::Arc;

use nalgebra::DMatrix;
use num_complex::Complex64;
use tracing::trace;

use super::eigen::{solve_general, solve_hermitian};
use super::integrals::{self, gaussian_well, PairIntegrals};
use super::symmetry::{permutations, Permutation};
use super::SolverResults;
use crate::basis::CorrelatedGaussian;
use crate::error::Result;
use crate::system::{Interaction, System};

/// One permuted image of a bra function and its weight sign × |permutations|.
#[derive(Clone, Debug)]
pub struct SymmetrizedTerm {
    pub function: CorrelatedGaussian,
    pub weight: f64,
}

/// Matrix-element engine for one physical system.
pub struct Solver<S: System> {
    system: Arc<S>,
    permutations: Vec<Permutation>,
}

impl<S: System> Solver<S> {
    pub fn new(system: Arc<S>) -> Self {
        let permutations = permutations(system.particles());
        Self { system, permutations }
    }

    pub fn system(&self) -> &S {
        &self.system
    }

    pub fn permutations(&self) -> &[Permutation] {
        &self.permutations
    }

    /// ⟨A|B⟩ without symmetrization.
    pub fn overlap(&self, a: &CorrelatedGaussian, b: &CorrelatedGaussian) -> f64 {
        integrals::overlap(a, b)
    }

    /// Permuted images of `function` with their accumulation weights.
    pub fn symmetrize(&self, function: &CorrelatedGaussian) -> Vec<SymmetrizedTerm> {
        let count = self.permutations.len() as f64;
        self.permutations
            .iter()
            .map(|perm| SymmetrizedTerm {
                function: function.permuted(&perm.indices, self.system.as_ref()),
                weight: perm.sign as f64 * count,
            })
            .collect()
    }

    /// Assemble every element of the basis and solve at rotation angle `theta`.
    pub fn solve(&self, basis: &[CorrelatedGaussian], theta: f64) -> Result<SolverResults> {
        let size = basis.len();
        let mut o = DMatrix::<f64>::zeros(size, size);
        let mut t = DMatrix::<Complex64>::zeros(size, size);
        let mut v = DMatrix::<Complex64>::zeros(size, size);

        for m in 0..size {
            let bra = self.symmetrize(&basis[m]);
            for n in 0..=m {
                let (ol, kin, pot) = self.element(&bra, &basis[n], theta)?;
                o[(m, n)] = ol;
                t[(m, n)] = kin;
                v[(m, n)] = pot;
                o[(n, m)] = ol;
                t[(n, m)] = kin;
                v[(n, m)] = pot;
            }
        }

        self.diagonalize(o, t, v, theta)
    }

    /// Recompute only row/column `row` on top of `cache`, which must have been
    /// assembled for `basis` or for `basis` without its last function.
    pub fn solve_row(
        &self,
        basis: &[CorrelatedGaussian],
        theta: f64,
        cache: &SolverResults,
        row: usize,
    ) -> Result<SolverResults> {
        let size = basis.len();
        let prior = cache.dimension();
        debug_assert!(prior == size || prior + 1 == size);
        debug_assert!(row < size);
        debug_assert!(prior == size || row + 1 == size);

        let zero = Complex64::new(0.0, 0.0);
        let mut o = cache.overlap.clone().resize(size, size, 0.0);
        let mut t = cache.kinetic.clone().resize(size, size, zero);
        let mut v = cache.potential.clone().resize(size, size, zero);

        let n = row;
        for m in 0..size {
            let bra = self.symmetrize(&basis[m]);
            let (ol, kin, pot) = self.element(&bra, &basis[n], theta)?;
            o[(m, n)] = ol;
            t[(m, n)] = kin;
            v[(m, n)] = pot;
            o[(n, m)] = ol;
            t[(n, m)] = kin;
            v[(n, m)] = pot;
        }

        self.diagonalize(o, t, v, theta)
    }

    /// (overlap, kinetic, potential) of a symmetrized bra against one ket.
    fn element(&self, bra: &[SymmetrizedTerm], ket: &CorrelatedGaussian, theta: f64) -> Result<(f64, Complex64, Complex64)> {
        let particles = self.system.particles();
        let rotation = Complex64::new(0.0, -2.0 * theta).exp();

        let mut o = 0.0;
        let mut t = Complex64::new(0.0, 0.0);
        let mut v = Complex64::new(0.0, 0.0);

        for term in bra {
            let ints = PairIntegrals::new(&term.function, ket)?;
            o += term.weight * ints.overlap;
            t += rotation * (term.weight * ints.kinetic(&term.function, ket, self.system.lambda()));

            for i in 0..particles.len() {
                for j in 0..i {
                    match self.system.interaction(&particles[i].name, &particles[j].name) {
                        Interaction::Gaussian { v0, r0 } => {
                            let c = ints.pair_width(self.system.omega(i, j));
                            v += gaussian_well(v0, r0, theta, ints.overlap, c) * term.weight;
                        }
                        Interaction::Harmonic { .. } | Interaction::None => {}
                    }
                }
            }
        }
        Ok((o, t, v))
    }

    fn diagonalize(
        &self,
        overlap: DMatrix<f64>,
        kinetic: DMatrix<Complex64>,
        potential: DMatrix<Complex64>,
        theta: f64,
    ) -> Result<SolverResults> {
        let h = &kinetic + &potential;
        let (eigenvalues, eigenvectors) = if theta == 0.0 {
            solve_hermitian(&h, &overlap)?
        } else {
            (solve_general(&h, &overlap)?, Vec::new())
        };
        trace!(size = overlap.nrows(), theta, "diagonalized");

        Ok(SolverResults {
            overlap,
            kinetic,
            potential,
            eigenvalues,
            eigenvectors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basis::Basis;
    use crate::system::{Particle, ParticleSystem, ParticleType};
    use approx::assert_relative_eq;

    /// Identical particles share mass and interactions so exchange is a symmetry.
    fn gaussian_well_system(kinds: &[(ParticleType, &str)]) -> Arc<ParticleSystem> {
        let mass = |tag: &str| if tag == "x" || tag == "e" { 1.0 } else { 3.0 };
        let particles: Vec<Particle> = kinds
            .iter()
            .enumerate()
            .map(|(i, (kind, tag))| Particle::new(&format!("p{}", i), mass(*tag), *kind, tag))
            .collect();
        let mut interactions = Vec::new();
        for i in 0..particles.len() {
            for j in 0..i {
                let same = particles[i].identicality == particles[j].identicality;
                let interaction = if same {
                    Interaction::Gaussian { v0: -4.0, r0: 1.0 }
                } else {
                    Interaction::Gaussian { v0: -2.5, r0: 1.3 }
                };
                interactions.push((particles[i].name.clone(), particles[j].name.clone(), interaction));
            }
        }
        Arc::new(ParticleSystem::new(particles, interactions).unwrap())
    }

    fn basis_for(sys: &ParticleSystem, seeds: &[f64]) -> Basis {
        let n = sys.num_particles();
        seeds
            .iter()
            .map(|&s| {
                let widths = DMatrix::from_fn(n, n, |i, j| {
                    if i == j {
                        0.0
                    } else {
                        let (a, b) = (i.min(j) as f64, i.max(j) as f64);
                        0.4 + s * (1.0 + 0.37 * a + 0.61 * b)
                    }
                });
                CorrelatedGaussian::from_widths(widths, sys)
            })
            .collect()
    }

    fn assert_matrices_close(a: &SolverResults, b: &SolverResults) {
        assert_eq!(a.dimension(), b.dimension());
        let (ha, hb) = (a.hamiltonian(), b.hamiltonian());
        for i in 0..a.dimension() {
            for j in 0..a.dimension() {
                assert_relative_eq!(a.overlap[(i, j)], b.overlap[(i, j)], epsilon = 1e-10, max_relative = 1e-10);
                assert!((ha[(i, j)] - hb[(i, j)]).norm() < 1e-9 * (1.0 + ha[(i, j)].norm()));
            }
        }
    }

    #[test]
    fn test_incremental_matches_full_bosons() {
        let sys = gaussian_well_system(&[(ParticleType::Boson, "x"), (ParticleType::Boson, "x")]);
        let solver = Solver::new(sys.clone());
        let basis = basis_for(&sys, &[0.2, 0.9, 2.5, 5.0]);

        let small = solver.solve(&basis[..3], 0.0).unwrap();
        let grown = solver.solve_row(&basis, 0.0, &small, 3).unwrap();
        let full = solver.solve(&basis, 0.0).unwrap();
        assert_matrices_close(&grown, &full);
        for (a, b) in grown.eigenvalues.iter().zip(full.eigenvalues.iter()) {
            assert_relative_eq!(a.re, b.re, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_incremental_matches_full_mixed_three_body() {
        let sys = gaussian_well_system(&[
            (ParticleType::Fermion, "e"),
            (ParticleType::Fermion, "e"),
            (ParticleType::Distinguishable, "n"),
        ]);
        let solver = Solver::new(sys.clone());
        let basis = basis_for(&sys, &[0.3, 1.1, 2.2]);

        let small = solver.solve(&basis[..2], 0.0).unwrap();
        let grown = solver.solve_row(&basis, 0.0, &small, 2).unwrap();
        let full = solver.solve(&basis, 0.0).unwrap();
        assert_matrices_close(&grown, &full);
    }

    #[test]
    fn test_incremental_untouched_block_is_bitwise_reused() {
        let sys = gaussian_well_system(&[(ParticleType::Boson, "x"), (ParticleType::Boson, "x")]);
        let solver = Solver::new(sys.clone());
        let basis = basis_for(&sys, &[0.5, 1.5, 3.0]);
        let small = solver.solve(&basis[..2], 0.0).unwrap();
        let grown = solver.solve_row(&basis, 0.0, &small, 2).unwrap();
        for i in 0..2 {
            for j in 0..2 {
                assert_eq!(grown.overlap[(i, j)], small.overlap[(i, j)]);
                assert_eq!(grown.kinetic[(i, j)], small.kinetic[(i, j)]);
                assert_eq!(grown.potential[(i, j)], small.potential[(i, j)]);
            }
        }
    }

    #[test]
    fn test_incremental_rotated_matches_full() {
        let sys = gaussian_well_system(&[(ParticleType::Boson, "x"), (ParticleType::Boson, "x")]);
        let solver = Solver::new(sys.clone());
        let basis = basis_for(&sys, &[0.2, 0.9, 2.5]);
        let theta = 0.15;
        let small = solver.solve(&basis[..2], theta).unwrap();
        let grown = solver.solve_row(&basis, theta, &small, 2).unwrap();
        let full = solver.solve(&basis, theta).unwrap();
        assert_matrices_close(&grown, &full);
        assert!(full.eigenvectors.is_empty());
    }

    #[test]
    fn test_eigenvalues_sorted_by_real_part() {
        let sys = gaussian_well_system(&[(ParticleType::Boson, "x"), (ParticleType::Boson, "x")]);
        let solver = Solver::new(sys.clone());
        let basis = basis_for(&sys, &[0.1, 0.4, 1.2, 3.0, 7.0]);
        for theta in [0.0, 0.1] {
            let res = solver.solve(&basis, theta).unwrap();
            assert_eq!(res.eigenvalues.len(), basis.len());
            for w in res.eigenvalues.windows(2) {
                assert!(w[0].re <= w[1].re);
            }
        }
    }

    #[test]
    fn test_variational_monotonicity() {
        let sys = gaussian_well_system(&[(ParticleType::Boson, "x"), (ParticleType::Boson, "x")]);
        let solver = Solver::new(sys.clone());
        let basis = basis_for(&sys, &[0.1, 0.6, 1.7, 4.0]);
        let mut previous = f64::INFINITY;
        for k in 1..=basis.len() {
            let e0 = solver.solve(&basis[..k], 0.0).unwrap().eigenvalues[0].re;
            assert!(e0 <= previous + 1e-10);
            previous = e0;
        }
    }

    #[test]
    fn test_boson_symmetrization_weights() {
        let sys = gaussian_well_system(&[(ParticleType::Boson, "x"), (ParticleType::Boson, "x")]);
        let solver = Solver::new(sys.clone());
        let basis = basis_for(&sys, &[1.0]);
        let terms = solver.symmetrize(&basis[0]);
        assert_eq!(terms.len(), 2);
        assert!(terms.iter().all(|t| t.weight == 2.0));
    }

    #[test]
    fn test_empty_basis() {
        let sys = gaussian_well_system(&[(ParticleType::Boson, "x"), (ParticleType::Boson, "x")]);
        let solver = Solver::new(sys);
        let res = solver.solve(&[], 0.0).unwrap();
        assert_eq!(res.dimension(), 0);
        assert!(res.eigenvalues.is_empty());
    }
}
