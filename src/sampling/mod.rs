//! Sampling module - stochastic generation of trial basis functions.

mod distribution;
mod strain;
mod space;

pub use distribution::{GaussianWidth, UniformWidth, WidthDistribution};
pub use strain::Strain;
pub use space::{SampleSpace, LEARN_HISTORY_CAPACITY};
