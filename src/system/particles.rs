//! Few-body system described by particle masses and pair interactions.

use std::collections::{HashMap, HashSet};

use nalgebra::{DMatrix, DVector};

use super::traits::{pair_key, Interaction, Particle, System};
use crate::error::{Result, SvmError};

/// Concrete [`System`] built on Jacobi coordinates.
///
/// x_k = (Σ_{i≤k} m_i r_i) / (Σ_{i≤k} m_i) - r_{k+1} for k < N-1, and the last
/// row of the transform is the center of mass, which is dropped.
#[derive(Clone, Debug)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    interactions: HashMap<(String, String), Interaction>,
    /// ω_ij stored row-major, N × N.
    omegas: Vec<DVector<f64>>,
    lambda: DMatrix<f64>,
}

impl ParticleSystem {
    pub fn new(particles: Vec<Particle>, interactions: Vec<(String, String, Interaction)>) -> Result<Self> {
        let n = particles.len();
        if n < 2 {
            return Err(SvmError::InvalidConfig(format!(
                "at least two particles are required, got {}",
                n
            )));
        }

        let mut names = HashSet::new();
        for p in &particles {
            if !names.insert(p.name.as_str()) {
                return Err(SvmError::InvalidConfig(format!("duplicate particle name '{}'", p.name)));
            }
            if !(p.mass > 0.0) {
                return Err(SvmError::InvalidConfig(format!(
                    "particle '{}' must have a positive mass",
                    p.name
                )));
            }
        }

        let mut table = HashMap::new();
        for (first, second, interaction) in interactions {
            for name in [&first, &second] {
                if !names.contains(name.as_str()) {
                    return Err(SvmError::InvalidConfig(format!(
                        "interaction references unknown particle '{}'",
                        name
                    )));
                }
            }
            table.insert(pair_key(&first, &second), interaction);
        }

        let u = jacobi_transform(&particles);
        let u_inv = u
            .clone()
            .try_inverse()
            .ok_or_else(|| SvmError::InvalidConfig("Jacobi transform is singular".to_string()))?;

        let mut omegas = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                omegas.push(DVector::from_fn(n - 1, |k, _| u_inv[(i, k)] - u_inv[(j, k)]));
            }
        }

        let lambda = DMatrix::from_fn(n - 1, n - 1, |k, l| {
            particles
                .iter()
                .enumerate()
                .map(|(i, p)| u[(k, i)] * u[(l, i)] / p.mass)
                .sum::<f64>()
        });

        Ok(Self {
            particles,
            interactions: table,
            omegas,
            lambda,
        })
    }
}

fn jacobi_transform(particles: &[Particle]) -> DMatrix<f64> {
    let n = particles.len();
    let total: f64 = particles.iter().map(|p| p.mass).sum();
    let mut u = DMatrix::zeros(n, n);

    let mut partial = 0.0;
    for k in 0..n - 1 {
        partial += particles[k].mass;
        for i in 0..=k {
            u[(k, i)] = particles[i].mass / partial;
        }
        u[(k, k + 1)] = -1.0;
    }
    for i in 0..n {
        u[(n - 1, i)] = particles[i].mass / total;
    }
    u
}

impl System for ParticleSystem {
    fn particles(&self) -> &[Particle] {
        &self.particles
    }

    fn interaction(&self, first: &str, second: &str) -> Interaction {
        self.interactions
            .get(&pair_key(first, second))
            .copied()
            .unwrap_or_default()
    }

    fn omega(&self, i: usize, j: usize) -> &DVector<f64> {
        &self.omegas[i * self.particles.len() + j]
    }

    fn lambda(&self) -> &DMatrix<f64> {
        &self.lambda
    }
}
