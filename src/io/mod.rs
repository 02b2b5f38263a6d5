//! IO module - run configuration, basis persistence and result logs.

mod config;
mod basis_file;
mod logs;

pub use config::{read_config, DistributionConfig, InteractionConfig, RunConfig, RunSection, StrainConfig, SweepConfig, WidthConfig};
pub use basis_file::{read_basis, read_basis_from, write_basis, write_basis_to};
pub use logs::{save_convergence, save_sweep, write_convergence, write_sweep};
