//! Greedy stochastic basis growth.
//!
//! Every acceptance iteration samples `num_threads` independent trial batches,
//! scores each trial by the target eigenvalue of the basis extended with it,
//! and commits the best trial that keeps the overlap matrix well conditioned.

use nalgebra::DMatrix;
use num_complex::Complex64;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use super::settings::DriverSettings;
use crate::basis::{Basis, CorrelatedGaussian};
use crate::error::{Result, SvmError};
use crate::sampling::SampleSpace;
use crate::solver::{smallest_singular_value, Solver, SolverResults};
use crate::system::System;

/// Once the targeted root drops below this energy the next root becomes the target.
pub const TARGET_ADVANCE_THRESHOLD: f64 = -0.02;

/// A trial together with the spectrum and matrices of the basis extended by it.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub function: CorrelatedGaussian,
    pub eigenvalue: Complex64,
    pub cache: SolverResults,
}

/// Owns the committed basis and its solver cache.
pub struct Driver<S: System> {
    solver: Solver<S>,
    sample_space: SampleSpace,
    settings: DriverSettings,
    pub(super) pool: ThreadPool,
    basis: Basis,
    cache: SolverResults,
    target_state: usize,
    convergence: Vec<Complex64>,
}

impl<S: System> Driver<S> {
    pub fn new(solver: Solver<S>, sample_space: SampleSpace, settings: DriverSettings) -> Result<Self> {
        if settings.num_threads == 0 || settings.trial_size == 0 {
            return Err(SvmError::InvalidConfig(
                "num_threads and trial_size must both be positive".to_string(),
            ));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(settings.num_threads)
            .build()
            .map_err(|e| SvmError::InvalidConfig(format!("cannot build thread pool: {}", e)))?;

        Ok(Self {
            solver,
            sample_space,
            settings,
            pool,
            basis: Basis::new(),
            cache: SolverResults::default(),
            target_state: 0,
            convergence: Vec::new(),
        })
    }

    /// Continue from an existing basis, e.g. one read from disk.
    pub fn with_basis(mut self, basis: Basis) -> Result<Self> {
        let n = self.solver.system().num_particles();
        if let Some(bad) = basis.iter().position(|f| f.widths().nrows() != n) {
            return Err(SvmError::InvalidConfig(format!(
                "basis function {} has {} particles, system has {}",
                bad,
                basis[bad].widths().nrows(),
                n
            )));
        }
        self.cache = self.solver.solve(&basis, self.settings.theta)?;
        self.basis = basis;
        self.target_state = 0;
        self.convergence.clear();
        Ok(self)
    }

    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    pub fn cache(&self) -> &SolverResults {
        &self.cache
    }

    pub fn convergence(&self) -> &[Complex64] {
        &self.convergence
    }

    pub fn target_state(&self) -> usize {
        self.target_state
    }

    pub fn settings(&self) -> &DriverSettings {
        &self.settings
    }

    pub fn solver(&self) -> &Solver<S> {
        &self.solver
    }

    pub fn sample_space(&self) -> &SampleSpace {
        &self.sample_space
    }

    /// Draw `n` trials sequentially, all from one strain if batches are pinned.
    pub fn generate_trials(&mut self, n: usize) -> Result<Basis> {
        let strain = if self.settings.pin_batch_strain {
            Some(self.sample_space.choose_strain()?)
        } else {
            None
        };
        let system = self.solver.system();
        (0..n).map(|_| self.sample_space.gen_matrix(strain, system)).collect()
    }

    /// Grow the basis by `size` functions.
    ///
    /// Iterations in which every batch is rejected for linear dependence are
    /// repeated and do not count towards `size`.
    pub fn generate_basis(&mut self, size: usize) -> Result<&Basis> {
        let mut accepted = 0;
        while accepted < size {
            self.refresh_cache()?;
            self.advance_target();

            let (threads, trial_size) = (self.settings.num_threads, self.settings.trial_size);
            let batches = (0..threads)
                .map(|_| self.generate_trials(trial_size))
                .collect::<Result<Vec<_>>>()?;

            if self.search_step(batches) {
                accepted += 1;
            } else {
                warn!(size = self.basis.len(), "every batch too linearly dependent, retrying");
            }
        }
        Ok(&self.basis)
    }

    /// Evaluate the given batches in parallel and commit the best admissible
    /// trial. Returns false when no batch produced one.
    pub fn search_step(&mut self, batches: Vec<Basis>) -> bool {
        let (target, theta, limit) = (self.target_state, self.settings.theta, self.settings.singularity_limit);
        let solver = &self.solver;
        let basis = &self.basis;
        let cache = &self.cache;

        let outcomes: Vec<Option<Candidate>> = self.pool.install(|| {
            batches
                .into_par_iter()
                .map(|trials| find_best_addition(solver, basis, trials, cache.clone(), target, theta, limit))
                .collect()
        });

        match select_best(outcomes) {
            Some(best) => {
                self.accept(best);
                true
            }
            None => false,
        }
    }

    fn accept(&mut self, best: Candidate) {
        info!(
            size = self.basis.len() + 1,
            target = self.target_state,
            strain = ?best.function.strain(),
            energy = %best.eigenvalue,
            "accepted basis function"
        );
        if let Some(strain) = best.function.strain() {
            self.sample_space.learn_strain(strain, 0.0);
        }
        self.convergence.push(best.eigenvalue);
        self.basis.push(best.function);
        self.cache = best.cache;
    }

    fn refresh_cache(&mut self) -> Result<()> {
        if self.cache.eigenvalues.len() != self.basis.len() {
            debug!(size = self.basis.len(), "full re-solve of committed basis");
            self.cache = self.solver.solve(&self.basis, self.settings.theta)?;
        }
        Ok(())
    }

    /// Follow avoided crossings: move to the next root once the current one is bound.
    fn advance_target(&mut self) {
        let ev = &self.cache.eigenvalues;
        if let (Some(current), Some(next)) = (ev.get(self.target_state), ev.get(self.target_state + 1)) {
            if current.re < TARGET_ADVANCE_THRESHOLD && next.re != 0.0 {
                self.target_state += 1;
                debug!(target = self.target_state, "advanced target state");
            }
        }
    }
}

/// Score `trials` against `basis` and return the most improving trial whose
/// extended overlap matrix is not too singular.
///
/// Only trials that strictly lower the running best target eigenvalue become
/// candidates; they are checked latest first.
pub fn find_best_addition<S: System>(
    solver: &Solver<S>,
    basis: &[CorrelatedGaussian],
    trials: Basis,
    base_cache: SolverResults,
    target: usize,
    theta: f64,
    singularity_limit: f64,
) -> Option<Candidate> {
    let row = basis.len();
    let target = target.min(row);
    let mut extended: Basis = basis.to_vec();
    let mut lowest: Option<f64> = None;
    let mut stack: Vec<Candidate> = Vec::new();

    for trial in trials {
        extended.truncate(row);
        extended.push(trial.clone());

        let cache = match solver.solve_row(&extended, theta, &base_cache, row) {
            Ok(cache) => cache,
            Err(e) => {
                debug!(error = %e, "trial skipped");
                continue;
            }
        };
        let eigenvalue = cache.eigenvalues[target];
        if lowest.map_or(true, |best| eigenvalue.re < best) {
            lowest = Some(eigenvalue.re);
            stack.push(Candidate {
                function: trial,
                eigenvalue,
                cache,
            });
        }
    }

    while let Some(candidate) = stack.pop() {
        if admissible(&candidate.cache.overlap, singularity_limit) {
            return Some(candidate);
        }
        debug!(energy = %candidate.eigenvalue, "candidate rejected for linear dependence");
    }
    None
}

fn admissible(overlap: &DMatrix<f64>, singularity_limit: f64) -> bool {
    smallest_singular_value(overlap).map_or(false, |sv| sv > singularity_limit)
}

/// Index-ordered reduction: the first usable outcome wins unless a later one
/// is lower or equal in real part.
pub fn select_best(outcomes: Vec<Option<Candidate>>) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for candidate in outcomes.into_iter().flatten() {
        let better = match &best {
            None => true,
            Some(current) => candidate.eigenvalue.re <= current.eigenvalue.re,
        };
        if better {
            best = Some(candidate);
        }
    }
    best
}
