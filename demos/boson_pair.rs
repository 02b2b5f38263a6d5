//! Stochastic basis growth for two bosons in a Gaussian well
//!
//! Run with: cargo run --release --example boson_pair
//!
//! Grows a correlated Gaussian basis one function at a time and prints the
//! ground state energy after every acceptance.

use std::sync::Arc;

use svm_fewbody::{Driver, DriverSettings, Interaction, Particle, ParticleSystem, ParticleType, Result, SampleSpace, Solver, Strain, UniformWidth};

fn main() -> Result<()> {
    // Simulation parameters
    let basis_size = 20;        // Functions to add
    let trial_size = 30;        // Trials per batch
    let num_threads = 4;        // Parallel batches per iteration
    let v0 = -10.0;             // Well depth
    let r0 = 1.0;               // Well range

    let particles = vec![
        Particle::new("a", 1.0, ParticleType::Boson, "boson"),
        Particle::new("b", 1.0, ParticleType::Boson, "boson"),
    ];
    let system = Arc::new(ParticleSystem::new(
        particles,
        vec![("a".to_string(), "b".to_string(), Interaction::Gaussian { v0, r0 })],
    )?);

    let mut sample_space = SampleSpace::with_seed(42);
    sample_space.add_strain(
        Strain::new().with_distribution("a", "b", Box::new(UniformWidth::new(0.05, 8.0, Some(1))?)),
        1,
    );

    let settings = DriverSettings::new()
        .with_trial_size(trial_size)
        .with_num_threads(num_threads);
    let mut driver = Driver::new(Solver::new(system), sample_space, settings)?;

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║     Stochastic Variational Method - Two Bosons               ║");
    println!("║     Gaussian well v(r) = v0 exp(-r²/2r0²)                    ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    for _ in 0..basis_size {
        driver.generate_basis(1)?;
        let energy = driver.cache().eigenvalues[0];
        println!("  K = {:3}   E₀ = {:.10}", driver.basis().len(), energy.re);
    }

    println!();
    println!("Converged ground state energy: {:.10}", driver.cache().eigenvalues[0].re);
    Ok(())
}
