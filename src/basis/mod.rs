//! Basis module - correlated Gaussian trial functions.

mod gaussian;

pub use gaussian::{Basis, CorrelatedGaussian};
