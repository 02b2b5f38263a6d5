//! Search parameters of the basis-growth driver.

use serde::{Deserialize, Serialize};

/// Configuration for [`Driver`](super::Driver).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DriverSettings {
    /// Trials per worker batch
    pub trial_size: usize,
    /// Worker batches (and threads) per acceptance iteration
    pub num_threads: usize,
    /// Minimum smallest singular value of an admissible overlap matrix
    pub singularity_limit: f64,
    /// Draw every trial of a batch from one strain chosen per batch
    pub pin_batch_strain: bool,
    /// Complex rotation angle used while growing the basis
    pub theta: f64,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            trial_size: 20,
            num_threads: 1,
            singularity_limit: 5e-14,
            pin_batch_strain: false,
            theta: 0.0,
        }
    }
}

impl DriverSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trial_size(mut self, n: usize) -> Self {
        self.trial_size = n;
        self
    }

    pub fn with_num_threads(mut self, n: usize) -> Self {
        self.num_threads = n;
        self
    }

    pub fn with_singularity_limit(mut self, limit: f64) -> Self {
        self.singularity_limit = limit;
        self
    }

    pub fn with_pin_batch_strain(mut self, pin: bool) -> Self {
        self.pin_batch_strain = pin;
        self
    }

    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }
}
