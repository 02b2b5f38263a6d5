//! Systems module - particles, pair interactions and relative coordinates.

mod traits;
mod particles;

pub use traits::{pair_key, Interaction, Particle, ParticleType, System};
pub use particles::ParticleSystem;
