//! Pipeline schedule simulator CLI.
//!
//! Loads a pipeline definition, resolves the execution line for a target
//! component, simulates it over the requested number of cores, and writes
//! the tick-by-tick report.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use pipesim::{
    report_file_name, resolve, PipelineError, Registry, Reporter, Simulator,
};

#[derive(Parser, Debug)]
#[command(name = "pipesim")]
#[command(about = "Resolve and simulate a pipeline schedule for a target component")]
struct Cli {
    /// Path to the pipeline definition file
    #[arg(long)]
    pipeline: PathBuf,

    /// Target component to schedule
    #[arg(long)]
    target: String,

    /// Number of simulated CPU cores (must be >= 1)
    #[arg(long, default_value_t = 1)]
    cores: usize,

    /// Directory the report file is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Also print the report to standard output
    #[arg(long)]
    show: bool,
}

fn run(cli: &Cli) -> pipesim::Result<()> {
    if cli.cores < 1 {
        return Err(PipelineError::InvalidConfiguration(format!(
            "at least 1 CPU core required to calculate pipeline, got {}",
            cli.cores
        )));
    }
    if !cli.pipeline.is_file() {
        return Err(PipelineError::InvalidConfiguration(format!(
            "pipeline file {} does not exist",
            cli.pipeline.display()
        )));
    }

    let registry = Registry::from_file(&cli.pipeline)?;
    let line = resolve(&registry, &cli.target)?;
    let mut simulator = Simulator::new(&registry, cli.cores)?;
    let total_ticks = simulator.execute(&line)?;

    let report_path = cli
        .output_dir
        .join(report_file_name(&cli.pipeline, cli.cores));
    let reporter = Reporter::new(simulator.trace());
    reporter.write_to(&report_path)?;
    if cli.show {
        reporter.print();
    }

    info!(
        component = %cli.target,
        cores = cli.cores,
        total_ticks,
        report = %report_path.display(),
        "simulation complete"
    );
    Ok(())
}

fn main() {
    pipesim::init_logging("info");

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!("{e}");
        std::process::exit(1);
    }
}
