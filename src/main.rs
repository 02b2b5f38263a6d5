use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

use svm_fewbody::driver::Driver;
use svm_fewbody::error::{Result, SvmError};
use svm_fewbody::io::{read_basis, read_config, save_convergence, save_sweep, write_basis};
use svm_fewbody::solver::Solver;

#[derive(Parser, Debug)]
#[command(version, about = "Stochastic variational basis growth for few-body systems", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.yml")]
    config: String,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Run the complex-rotation angle sweep on the final basis
    #[arg(long)]
    sweep: bool,
}

fn setup_logging(verbosity: u8) {
    let level_filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(level_filter)
        .with(stderr_layer)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let config = read_config(&args.config)?;
    let system = Arc::new(config.build_system()?);
    let sample_space = config.build_sample_space()?;
    let basis = read_basis(&config.run.basis_file)?;
    info!(loaded = basis.len(), file = %config.run.basis_file.display(), "starting basis");

    let mut driver = Driver::new(Solver::new(system), sample_space, config.driver.clone())?.with_basis(basis)?;

    if config.run.basis_size > 0 {
        driver.generate_basis(config.run.basis_size)?;
        write_basis(&config.run.basis_file, driver.basis())?;
        save_convergence(&config.run.convergence_file, driver.basis().len(), driver.convergence())?;
    }

    println!("Basis size: {}", driver.basis().len());
    if let Some(e) = driver.convergence().last() {
        println!("Target energy: {:.10} {:+.10}i (state {})", e.re, e.im, driver.target_state());
    }

    let wants_sweep = args.sweep || (config.sweep.is_some() && config.run.basis_size == 0);
    if wants_sweep {
        let sweep = config
            .sweep
            .as_ref()
            .ok_or_else(|| SvmError::InvalidConfig("--sweep requires a 'sweep' section".to_string()))?;
        let results = driver.sweep_angle(sweep.steps, sweep.stepsize)?;
        save_sweep(&sweep.file, &results)?;
        println!("Angle sweep: {} steps written to {}", results.len(), sweep.file.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
