//! Collaborator interface describing the physical system.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Exchange statistics of a particle.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParticleType {
    Boson,
    Fermion,
    Distinguishable,
}

/// A single particle of the few-body system.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Particle {
    pub name: String,
    pub mass: f64,
    pub kind: ParticleType,
    /// Particles sharing this tag are exchanged by symmetrization.
    pub identicality: String,
}

impl Particle {
    pub fn new(name: &str, mass: f64, kind: ParticleType, identicality: &str) -> Self {
        Self {
            name: name.to_string(),
            mass,
            kind,
            identicality: identicality.to_string(),
        }
    }
}

/// Pair interaction between two particles.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Interaction {
    /// V(r) = v0 exp(-r² / 2r0²)
    Gaussian { v0: f64, r0: f64 },
    /// Accepted in configurations but contributes no matrix elements yet.
    Harmonic { omega: f64 },
    #[default]
    None,
}

/// Physical system seen by the sampler and the solver.
///
/// Relative coordinates are Jacobi coordinates x_0..x_{N-2}; `omega(i, j)`
/// projects them onto the separation r_i - r_j and `lambda()` is the
/// kinetic mass-ratio matrix in the same coordinates.
pub trait System: Send + Sync {
    fn particles(&self) -> &[Particle];

    /// Interaction between the particles named `first` and `second` (order irrelevant).
    fn interaction(&self, first: &str, second: &str) -> Interaction;

    /// Coordinate-projection vector ω_ij, r_i - r_j = Σ_k ω_ij(k) x_k.
    fn omega(&self, i: usize, j: usize) -> &DVector<f64>;

    /// Mass-ratio matrix Λ_kl = Σ_i U_ki U_li / m_i.
    fn lambda(&self) -> &DMatrix<f64>;

    fn num_particles(&self) -> usize {
        self.particles().len()
    }
}

/// Order-independent key for a particle-name pair.
pub fn pair_key(first: &str, second: &str) -> (String, String) {
    if first <= second {
        (first.to_string(), second.to_string())
    } else {
        (second.to_string(), first.to_string())
    }
}
