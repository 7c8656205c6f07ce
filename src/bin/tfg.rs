//! Gravity forward-modelling driver: read a binary parameter file,
//! compute the twenty field quantities for every observer, write a
//! binary result file.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::info;

use tessfield::prelude::*;

#[derive(Parser, Debug)]
#[command(version, about = "Gravitational field of tesseroids", long_about = None)]
struct Cli {
    /// Parameter file
    #[arg(default_value = "TFG.ForPar")]
    parameters: PathBuf,

    /// Result file
    #[arg(default_value = "Result_TFG.dat")]
    results: PathBuf,

    /// Run single-threaded
    #[arg(long)]
    serial: bool,

    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    info!("reading parameters from {}", cli.parameters.display());
    let job = io::read_gravity_params(&cli.parameters).context("cannot read the parameter file")?;
    info!(
        "tolerances: absolute {:e}, relative {:e}",
        job.tolerance.absolute, job.tolerance.relative
    );

    let start = Instant::now();
    #[cfg(feature = "parallel")]
    let fields = if cli.serial {
        gravity_field(&job.prisms, &job.observers, job.tolerance)?
    } else {
        gravity_field_parallel(&job.prisms, &job.observers, job.tolerance)?
    };
    #[cfg(not(feature = "parallel"))]
    let fields = gravity_field(&job.prisms, &job.observers, job.tolerance)?;
    info!("computed in {:.3} s", start.elapsed().as_secs_f64());

    info!("writing results to {}", cli.results.display());
    io::write_gravity_results(&cli.results, &job.observers, &fields)
        .context("cannot write the result file")?;

    Ok(())
}
