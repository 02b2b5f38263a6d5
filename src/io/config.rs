//! YAML run configuration.
//!
//! ```yaml
//! particles:
//!   - { name: a, mass: 1.0, kind: boson, identicality: a }
//!   - { name: b, mass: 1.0, kind: boson, identicality: a }
//! interactions:
//!   - { pair: [a, b], kind: gaussian, v0: -10.0, r0: 1.0 }
//! strains:
//!   - frequency: 1
//!     widths:
//!       - { pair: [a, b], distribution: uniform, min: 0.1, max: 5.0, seed: 1 }
//! driver: { trial_size: 20, num_threads: 4 }
//! run: { basis_size: 50, basis_file: basis.json, convergence_file: convergence.dat }
//! sweep: { steps: 30, stepsize: 0.01, file: sweep.dat }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::driver::DriverSettings;
use crate::error::{Result, SvmError};
use crate::sampling::{GaussianWidth, SampleSpace, Strain, UniformWidth, WidthDistribution};
use crate::system::{Interaction, Particle, ParticleSystem};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InteractionConfig {
    pub pair: [String; 2],
    #[serde(flatten)]
    pub interaction: Interaction,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "distribution", rename_all = "lowercase")]
pub enum DistributionConfig {
    Uniform {
        min: f64,
        max: f64,
        #[serde(default)]
        seed: Option<u64>,
    },
    Gaussian {
        mean: f64,
        stdev: f64,
        #[serde(default)]
        min: f64,
        #[serde(default)]
        max: f64,
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl DistributionConfig {
    pub fn build(&self) -> Result<Box<dyn WidthDistribution>> {
        Ok(match *self {
            DistributionConfig::Uniform { min, max, seed } => Box::new(UniformWidth::new(min, max, seed)?),
            DistributionConfig::Gaussian { mean, stdev, min, max, seed } => {
                Box::new(GaussianWidth::new(mean, stdev, min, max, seed)?)
            }
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WidthConfig {
    pub pair: [String; 2],
    #[serde(flatten)]
    pub distribution: DistributionConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StrainConfig {
    pub frequency: u32,
    pub widths: Vec<WidthConfig>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RunSection {
    /// Basis functions to add in this run
    pub basis_size: usize,
    pub basis_file: PathBuf,
    pub convergence_file: PathBuf,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            basis_size: 0,
            basis_file: PathBuf::from("basis.json"),
            convergence_file: PathBuf::from("convergence.dat"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SweepConfig {
    pub steps: usize,
    pub stepsize: f64,
    #[serde(default = "default_sweep_file")]
    pub file: PathBuf,
}

fn default_sweep_file() -> PathBuf {
    PathBuf::from("sweep.dat")
}

/// Complete description of a run.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub particles: Vec<Particle>,
    #[serde(default)]
    pub interactions: Vec<InteractionConfig>,
    pub strains: Vec<StrainConfig>,
    #[serde(default)]
    pub driver: DriverSettings,
    #[serde(default)]
    pub run: RunSection,
    #[serde(default)]
    pub sweep: Option<SweepConfig>,
    /// Seed of the strain-selection generator
    #[serde(default)]
    pub sample_seed: u64,
}

impl RunConfig {
    pub fn build_system(&self) -> Result<ParticleSystem> {
        let interactions = self
            .interactions
            .iter()
            .map(|c| (c.pair[0].clone(), c.pair[1].clone(), c.interaction))
            .collect();
        ParticleSystem::new(self.particles.clone(), interactions)
    }

    pub fn build_sample_space(&self) -> Result<SampleSpace> {
        let mut space = SampleSpace::with_seed(self.sample_seed);
        for (index, config) in self.strains.iter().enumerate() {
            let mut strain = Strain::new();
            for width in &config.widths {
                for name in &width.pair {
                    if !self.particles.iter().any(|p| &p.name == name) {
                        return Err(SvmError::InvalidConfig(format!(
                            "strain {} references unknown particle '{}'",
                            index, name
                        )));
                    }
                }
                strain.set_distribution(&width.pair[0], &width.pair[1], width.distribution.build()?);
            }
            space.add_strain(strain, config.frequency);
        }
        Ok(space)
    }
}

/// Read a [`RunConfig`] from a YAML file.
pub fn read_config(filename: &str) -> Result<RunConfig> {
    let file = std::fs::File::open(filename)?;
    let reader = std::io::BufReader::new(file);
    let config: RunConfig = serde_yaml::from_reader(reader)?;
    Ok(config)
}
