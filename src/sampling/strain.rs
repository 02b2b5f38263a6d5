//! Strains: per-pair width generators for trial functions.

use std::collections::HashMap;

use nalgebra::DMatrix;

use super::distribution::WidthDistribution;
use crate::basis::CorrelatedGaussian;
use crate::error::{Result, SvmError};
use crate::system::{pair_key, System};

/// A generator of correlated Gaussians with one width distribution per
/// unordered particle-name pair.
#[derive(Default)]
pub struct Strain {
    distributions: HashMap<(String, String), Box<dyn WidthDistribution>>,
}

impl Strain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_distribution(&mut self, first: &str, second: &str, distribution: Box<dyn WidthDistribution>) {
        self.distributions.insert(pair_key(first, second), distribution);
    }

    pub fn with_distribution(mut self, first: &str, second: &str, distribution: Box<dyn WidthDistribution>) -> Self {
        self.set_distribution(first, second, distribution);
        self
    }

    /// Sample a symmetric widths matrix, pairs visited as (k, l) with l < k.
    pub fn gen_widths<S: System + ?Sized>(&mut self, system: &S) -> Result<DMatrix<f64>> {
        let particles = system.particles();
        let n = particles.len();
        let mut widths = DMatrix::zeros(n, n);

        for k in 0..n {
            for l in 0..k {
                let (first, second) = (&particles[k].name, &particles[l].name);
                let distribution = self
                    .distributions
                    .get_mut(&pair_key(first, second))
                    .ok_or_else(|| SvmError::MissingDistribution {
                        first: first.clone(),
                        second: second.clone(),
                    })?;
                let w = distribution.sample();
                widths[(k, l)] = w;
                widths[(l, k)] = w;
            }
        }
        Ok(widths)
    }

    pub fn gen_matrix<S: System + ?Sized>(&mut self, system: &S) -> Result<CorrelatedGaussian> {
        let widths = self.gen_widths(system)?;
        Ok(CorrelatedGaussian::from_widths(widths, system))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::UniformWidth;
    use crate::system::{Particle, ParticleSystem, ParticleType};

    fn system() -> ParticleSystem {
        ParticleSystem::new(
            vec![
                Particle::new("e", 1.0, ParticleType::Fermion, "e"),
                Particle::new("e2", 1.0, ParticleType::Fermion, "e"),
                Particle::new("p", 1836.0, ParticleType::Distinguishable, "p"),
            ],
            vec![],
        )
        .unwrap()
    }

    fn uniform(seed: u64) -> Box<dyn WidthDistribution> {
        Box::new(UniformWidth::new(0.5, 2.0, Some(seed)).unwrap())
    }

    #[test]
    fn test_widths_symmetric_with_zero_diagonal() {
        let sys = system();
        let mut strain = Strain::new()
            .with_distribution("e", "e2", uniform(1))
            .with_distribution("p", "e", uniform(2))
            .with_distribution("e2", "p", uniform(3));
        let w = strain.gen_widths(&sys).unwrap();
        for i in 0..3 {
            assert_eq!(w[(i, i)], 0.0);
            for j in 0..3 {
                assert_eq!(w[(i, j)], w[(j, i)]);
            }
        }
        let cg = strain.gen_matrix(&sys).unwrap();
        assert_eq!(cg.dimension(), 2);
    }

    #[test]
    fn test_missing_pair_is_configuration_error() {
        let sys = system();
        let mut strain = Strain::new()
            .with_distribution("e", "e2", uniform(1))
            .with_distribution("e", "p", uniform(2));
        match strain.gen_widths(&sys) {
            Err(SvmError::MissingDistribution { first, second }) => {
                let mut names = vec![first, second];
                names.sort();
                assert_eq!(names, vec!["e2".to_string(), "p".to_string()]);
            }
            other => panic!("expected MissingDistribution, got {:?}", other.map(|_| ())),
        }
    }
}
