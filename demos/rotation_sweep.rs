//! Complex-rotation angle sweep for a bound pair
//!
//! Run with: cargo run --release --example rotation_sweep
//!
//! Bound states stay put as the rotation angle grows while discretized
//! continuum states rotate into the lower half plane by roughly -2θ.

use std::sync::Arc;

use svm_fewbody::{Driver, DriverSettings, Interaction, Particle, ParticleSystem, ParticleType, Result, SampleSpace, Solver, Strain, UniformWidth};

fn main() -> Result<()> {
    let basis_size = 15;
    let steps = 8;
    let stepsize = 0.05;

    let particles = vec![
        Particle::new("p", 1.0, ParticleType::Distinguishable, "p"),
        Particle::new("q", 2.0, ParticleType::Distinguishable, "q"),
    ];
    let system = Arc::new(ParticleSystem::new(
        particles,
        vec![("p".to_string(), "q".to_string(), Interaction::Gaussian { v0: -6.0, r0: 1.2 })],
    )?);

    let mut sample_space = SampleSpace::with_seed(7);
    sample_space.add_strain(
        Strain::new().with_distribution("p", "q", Box::new(UniformWidth::new(0.05, 10.0, Some(3))?)),
        1,
    );

    let settings = DriverSettings::new().with_trial_size(25).with_num_threads(4);
    let mut driver = Driver::new(Solver::new(system), sample_space, settings)?;
    driver.generate_basis(basis_size)?;

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║     Complex Rotation Sweep - {:2} basis functions               ║", basis_size);
    println!("╚══════════════════════════════════════════════════════════════╝");

    for (theta, results) in driver.sweep_angle(steps, stepsize)? {
        let lowest: Vec<String> = results
            .eigenvalues
            .iter()
            .take(3)
            .map(|e| format!("{:+.6}{:+.6}i", e.re, e.im))
            .collect();
        println!("  θ = {:.2}   {}", theta, lowest.join("   "));
    }
    Ok(())
}
