//! Weighted collection of strains with a bounded acceptance history.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::strain::Strain;
use crate::basis::CorrelatedGaussian;
use crate::error::{Result, SvmError};
use crate::system::System;

/// Number of accepted functions remembered by [`SampleSpace::learn_strain`].
pub const LEARN_HISTORY_CAPACITY: usize = 100;

/// Draws trial functions from integer-weighted strains.
pub struct SampleSpace {
    strains: Vec<(Strain, u32)>,
    total_frequency: u32,
    rng: StdRng,
    history: VecDeque<(usize, f64)>,
}

impl Default for SampleSpace {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl SampleSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed only the strain-selection generator; distributions carry their own seeds.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            strains: Vec::new(),
            total_frequency: 0,
            rng: StdRng::seed_from_u64(seed),
            history: VecDeque::with_capacity(LEARN_HISTORY_CAPACITY + 1),
        }
    }

    pub fn add_strain(&mut self, strain: Strain, frequency: u32) {
        self.total_frequency += frequency;
        self.strains.push((strain, frequency));
    }

    pub fn num_strains(&self) -> usize {
        self.strains.len()
    }

    pub fn total_frequency(&self) -> u32 {
        self.total_frequency
    }

    /// Generate a trial from `strain`, or from a weighted random strain if `None`.
    pub fn gen_matrix<S: System + ?Sized>(&mut self, strain: Option<usize>, system: &S) -> Result<CorrelatedGaussian> {
        let index = match strain {
            Some(index) => index,
            None => self.choose_strain()?,
        };
        let count = self.strains.len();
        let (generator, _) = self
            .strains
            .get_mut(index)
            .ok_or(SvmError::UnknownStrain { index, count })?;
        Ok(generator.gen_matrix(system)?.with_strain(index))
    }

    /// Weighted choice: first strain whose cumulative frequency exceeds a
    /// uniform draw from [0, total_frequency).
    pub fn choose_strain(&mut self) -> Result<usize> {
        if self.total_frequency == 0 {
            return Err(SvmError::InvalidConfig(
                "sample space has no strain with a positive frequency".to_string(),
            ));
        }
        let r = self.rng.gen_range(0..self.total_frequency);
        let mut cumulative = 0;
        for (index, (_, frequency)) in self.strains.iter().enumerate() {
            cumulative += frequency;
            if cumulative > r {
                return Ok(index);
            }
        }
        unreachable!("cumulative frequency always reaches total_frequency")
    }

    /// Record which strain produced an accepted function.
    ///
    /// Only the history is updated; strain weights stay fixed and
    /// [`strain_share`](Self::strain_share) exposes the recorded statistics.
    pub fn learn_strain(&mut self, strain: usize, impact: f64) {
        self.history.push_back((strain, impact));
        if self.history.len() > LEARN_HISTORY_CAPACITY {
            self.history.pop_front();
        }
    }

    pub fn history(&self) -> &VecDeque<(usize, f64)> {
        &self.history
    }

    /// Fraction of the recorded history produced by `strain`.
    pub fn strain_share(&self, strain: usize) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        let count = self.history.iter().filter(|(s, _)| *s == strain).count();
        count as f64 / self.history.len() as f64
    }
}
