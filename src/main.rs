mod report;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};
use truss2d::TrussDefinition;

use report::render_report;

/// Analyse a planar pin-jointed truss described in a JSON file.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the truss definition.
    model: PathBuf,
    /// Override the convergence tolerance of the relaxation solver.
    #[arg(long)]
    tolerance: Option<f64>,
    /// Override the maximum number of relaxation sweeps.
    #[arg(long)]
    max_sweeps: Option<usize>,
    /// Fail instead of reporting an unconverged solution.
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let definition = TrussDefinition::from_path(&cli.model)?;
    let mut config = definition.solver;
    if let Some(tolerance) = cli.tolerance {
        config.tolerance = tolerance;
    }
    if let Some(max_sweeps) = cli.max_sweeps {
        config.max_sweeps = max_sweeps;
    }
    config.strict |= cli.strict;

    let truss = definition.to_truss()?;
    info!(
        "analysing {} with {} joints and {} members",
        cli.model.display(),
        truss.joint_count(),
        truss.member_count()
    );
    let analysis = truss.analyze(&config)?;
    if !analysis.is_converged() {
        warn!("results are the last iterate of an unconverged solve");
    }

    println!("{}", render_report(&analysis));
    Ok(())
}
