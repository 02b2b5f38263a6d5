//! Complex-rotation angle sweeps over a fixed basis.

use rayon::prelude::*;
use tracing::info;

use super::growth::Driver;
use crate::error::Result;
use crate::solver::SolverResults;
use crate::system::System;

impl<S: System> Driver<S> {
    /// Re-solve the committed basis at θ_i = `stepsize` · i for i < `steps`.
    ///
    /// With more than one thread, angles are solved `num_threads` at a time and
    /// each batch is joined before the next starts. Results are in angle order.
    pub fn sweep_angle(&self, steps: usize, stepsize: f64) -> Result<Vec<(f64, SolverResults)>> {
        let angles: Vec<f64> = (0..steps).map(|i| stepsize * i as f64).collect();
        let solver = self.solver();
        let basis = self.basis();
        let threads = self.settings().num_threads;

        let mut out = Vec::with_capacity(steps);
        if threads == 1 {
            for (i, &theta) in angles.iter().enumerate() {
                info!(step = i, theta, "solving angle");
                out.push((theta, solver.solve(basis, theta)?));
            }
            return Ok(out);
        }

        for chunk in angles.chunks(threads) {
            info!(from = chunk[0], count = chunk.len(), "solving angle batch");
            let results: Vec<Result<SolverResults>> = self
                .pool
                .install(|| chunk.par_iter().map(|&theta| solver.solve(basis, theta)).collect());
            for (&theta, result) in chunk.iter().zip(results) {
                out.push((theta, result?));
            }
        }
        Ok(out)
    }
}
