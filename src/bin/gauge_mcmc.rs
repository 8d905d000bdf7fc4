// SPDX-License-Identifier: AGPL-3.0-only

//! Production Markov chain for SU(2) or U(1) pure gauge theory.
//!
//! Reads a JSON [`SimulationConfig`], runs the configured update cycle and
//! writes one JSON measurement record per line.
//!
//! **Usage:**
//! ```text
//! gauge_mcmc --config run.json --group su2 --output run.jsonl --save final.bin
//! gauge_mcmc --config run.json --resume final.bin --start-cycle 1000 --output more.jsonl
//! ```
//!
//! Logging is controlled by `RUST_LOG` (default `info`).

use clap::{Parser, ValueEnum};
use hotlattice::config::SimulationConfig;
use hotlattice::lattice::{GaugeField, GaugeGroup, Su2, U1};
use hotlattice::production::MarkovChain;
use hotlattice::Result;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Group {
    Su2,
    U1,
}

/// Run a lattice gauge Markov chain.
#[derive(Parser)]
#[command(name = "gauge_mcmc", about = "SU(2)/U(1) lattice gauge Markov chain")]
struct Args {
    /// JSON configuration; defaults are used when absent.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Gauge group.
    #[arg(long, value_enum, default_value = "su2")]
    group: Group,

    /// JSONL measurement output; stdout when absent.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Snapshot file, written every `save_every` cycles and at the end.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Continue from this snapshot instead of a hot start.
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Cycles already run when the `--resume` snapshot was written.
    #[arg(long, default_value_t = 0, requires = "resume")]
    start_cycle: usize,
}

fn run<G: GaugeGroup>(config: SimulationConfig, args: &Args) -> Result<()> {
    let mut chain = match &args.resume {
        Some(path) => {
            let mut field = GaugeField::<G>::cold(config.lattice_geometry()?);
            field.load_from_file(path)?;
            tracing::info!(
                path = %path.display(),
                start_cycle = args.start_cycle,
                "resuming from snapshot"
            );
            MarkovChain::with_field(config, field, args.start_cycle)?
        }
        None => MarkovChain::<G>::new(config)?,
    };
    if let Some(path) = &args.save {
        chain = chain.with_snapshots(path);
    }

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(std::fs::File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    let records = chain.run(&mut out)?;
    drop(out);

    if let Some(path) = &args.save {
        chain.field().save_to_file(path)?;
    }
    if let Some(last) = records.last() {
        tracing::info!(
            cycles = chain.cycles_done(),
            plaquette = last.plaquette,
            charge = last.topological_charge,
            "run complete"
        );
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SimulationConfig> {
    match path {
        Some(p) => SimulationConfig::from_json_file(p),
        None => {
            let cfg = SimulationConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    match args.group {
        Group::Su2 => run::<Su2>(config, &args),
        Group::U1 => run::<U1>(config, &args),
    }
}
