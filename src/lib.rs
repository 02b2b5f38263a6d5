//! SVM few-body - Stochastic Variational Method in Rust
//!
//! This crate grows explicitly correlated Gaussian bases for few-body quantum
//! systems by stochastic trial-and-select, and solves the resulting generalized
//! eigenproblem, optionally under complex rotation for resonances.

pub mod error;
pub mod system;
pub mod basis;
pub mod sampling;
pub mod solver;
pub mod driver;
pub mod io;

// Re-export commonly used types at crate root
pub use error::{Result, SvmError};
pub use system::{Interaction, Particle, ParticleSystem, ParticleType, System};
pub use basis::{Basis, CorrelatedGaussian};
pub use sampling::{GaussianWidth, SampleSpace, Strain, UniformWidth, WidthDistribution};
pub use solver::{Solver, SolverResults};
pub use driver::{Driver, DriverSettings};
pub use io::{read_basis, read_config, write_basis, RunConfig};

mod tests;
