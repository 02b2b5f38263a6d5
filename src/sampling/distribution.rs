//! Width distributions for single particle pairs.
//!
//! Each distribution owns its own generator so that pairs are sampled
//! independently and reproducibly from their seeds.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::error::{Result, SvmError};

/// Source of strictly positive width parameters.
pub trait WidthDistribution: Send {
    fn sample(&mut self) -> f64;
}

fn seeded(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Uniform widths on [min, max], redrawn until positive.
#[derive(Clone, Debug)]
pub struct UniformWidth {
    pub min: f64,
    pub max: f64,
    rng: StdRng,
}

impl UniformWidth {
    pub fn new(min: f64, max: f64, seed: Option<u64>) -> Result<Self> {
        if !(max > 0.0) || max < min {
            return Err(SvmError::InvalidConfig(format!(
                "uniform width range [{}, {}] contains no positive values",
                min, max
            )));
        }
        Ok(Self { min, max, rng: seeded(seed) })
    }
}

impl WidthDistribution for UniformWidth {
    fn sample(&mut self) -> f64 {
        loop {
            let r: f64 = self.rng.gen();
            let out = (self.max - self.min) * r + self.min;
            if out > 0.0 {
                return out;
            }
        }
    }
}

/// Normal widths truncated to positive values, and to [min, max] unless min == max.
#[derive(Clone, Debug)]
pub struct GaussianWidth {
    pub mean: f64,
    pub stdev: f64,
    pub min: f64,
    pub max: f64,
    normal: Normal<f64>,
    rng: StdRng,
}

impl GaussianWidth {
    pub fn new(mean: f64, stdev: f64, min: f64, max: f64, seed: Option<u64>) -> Result<Self> {
        if !(stdev > 0.0) {
            return Err(SvmError::InvalidConfig(format!(
                "gaussian width stdev must be positive, got {}",
                stdev
            )));
        }
        let normal = Normal::new(mean, stdev)
            .map_err(|e| SvmError::InvalidConfig(format!("gaussian width distribution: {}", e)))?;
        if min != max && (max < min || !(max > 0.0)) {
            return Err(SvmError::InvalidConfig(format!(
                "gaussian width bounds [{}, {}] contain no positive values",
                min, max
            )));
        }
        Ok(Self {
            mean,
            stdev,
            min,
            max,
            normal,
            rng: seeded(seed),
        })
    }

    fn accepts(&self, x: f64) -> bool {
        x > 0.0 && (self.min == self.max || (x >= self.min && x <= self.max))
    }
}

impl WidthDistribution for GaussianWidth {
    fn sample(&mut self) -> f64 {
        loop {
            let out = self.normal.sample(&mut self.rng);
            if self.accepts(out) {
                return out;
            }
        }
    }
}
