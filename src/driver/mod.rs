//! Driver module - stochastic basis growth and angle sweeps.

mod settings;
mod growth;
mod sweep;

pub use settings::DriverSettings;
pub use growth::{find_best_addition, select_best, Candidate, Driver, TARGET_ADVANCE_THRESHOLD};
