// SPDX-License-Identifier: AGPL-3.0-only

//! Markov-chain driver for production runs.
//!
//! # Contents
//!
//! - **SweepRecord**: one measurement line of the JSONL output
//! - **MarkovChain**: update cycles, periodic measurements and snapshots
//! - **Helpers**: write_record, load_records

use crate::config::SimulationConfig;
use crate::error::{LatticeError, Result};
use crate::lattice::gauge_field::GaugeField;
use crate::lattice::group::GaugeGroup;
use crate::lattice::observables::clover_observables;
use crate::lattice::sweep::{sweep, SweepParams, SweepStats};
use crate::lattice::update::LinkUpdate;
use crate::lattice::wilson::{average_plaquette, average_polyakov_loop, average_spatial_plaquette};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

// ═══════════════════════════════════════════════════════════════════
//  Measurement record
// ═══════════════════════════════════════════════════════════════════

/// Observables measured after one update cycle.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SweepRecord {
    /// Cycle number, starting at 1.
    pub sweep: usize,
    /// Group name, `"su2"` or `"u1"`.
    pub group: String,
    pub beta: f64,
    /// `⟨Re Tr P⟩ / N_c`.
    pub plaquette: f64,
    /// Spatial planes only; absent in two dimensions.
    pub spatial_plaquette: Option<f64>,
    pub energy_density: f64,
    pub topological_charge: f64,
    pub polyakov_re: f64,
    pub polyakov_im: f64,
    /// Accepted fraction over every sweep of the cycle.
    pub acceptance: f64,
    /// Same, temporal links only.
    pub temporal_acceptance: f64,
}

/// Append `record` as one JSON line.
///
/// # Errors
///
/// Serialization or write failure.
pub fn write_record<W: Write>(out: &mut W, record: &SweepRecord) -> Result<()> {
    serde_json::to_writer(&mut *out, record)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Read every parseable record from a JSONL file. Streams line by line
/// and skips lines that are not records.
///
/// # Errors
///
/// I/O failure, or [`LatticeError::InvalidConfig`] if no line parsed.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<SweepRecord>> {
    let path = path.as_ref();
    let reader = std::io::BufReader::new(std::fs::File::open(path)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if let Ok(rec) = serde_json::from_str::<SweepRecord>(&line) {
            records.push(rec);
        }
    }
    if records.is_empty() {
        return Err(LatticeError::InvalidConfig(format!(
            "no sweep records in {}",
            path.display()
        )));
    }
    Ok(records)
}

// ═══════════════════════════════════════════════════════════════════
//  Markov chain
// ═══════════════════════════════════════════════════════════════════

/// A gauge field evolving under the update cycle of a [`SimulationConfig`].
#[derive(Debug)]
pub struct MarkovChain<G: GaugeGroup> {
    config: SimulationConfig,
    field: GaugeField<G>,
    cycle: Vec<LinkUpdate>,
    n_workers: usize,
    /// Sweeps performed so far; selects the RNG streams of the next sweep.
    sweeps_done: u64,
    cycles_done: usize,
    snapshot_path: Option<PathBuf>,
}

impl<G: GaugeGroup> MarkovChain<G> {
    /// Validate `config` and hot-start a field with its seed and disorder.
    ///
    /// # Errors
    ///
    /// Any [`SimulationConfig::validate`] failure.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let geometry = config.lattice_geometry()?;
        let field = GaugeField::hot(geometry, config.seed, config.clamped_disorder());
        Ok(Self::assemble(config, field, 0))
    }

    /// Continue from an existing field, e.g. one loaded from a snapshot,
    /// as if `start_cycle` cycles had already run. The next cycle draws the
    /// same random streams as cycle `start_cycle + 1` of an uninterrupted
    /// chain with this config.
    ///
    /// # Errors
    ///
    /// Validation failure, or [`LatticeError::InvalidConfig`] if the field
    /// geometry differs from the configured one.
    pub fn with_field(
        config: SimulationConfig,
        field: GaugeField<G>,
        start_cycle: usize,
    ) -> Result<Self> {
        config.validate()?;
        let geometry = config.lattice_geometry()?;
        if *field.geometry() != geometry {
            return Err(LatticeError::InvalidConfig(format!(
                "field geometry {:?} does not match configured {:?}",
                field.geometry().extents(),
                geometry.extents()
            )));
        }
        Ok(Self::assemble(config, field, start_cycle))
    }

    fn assemble(config: SimulationConfig, field: GaugeField<G>, start_cycle: usize) -> Self {
        let cycle = config.algorithm.cycle();
        let n_workers = config.workers();
        let sweeps_per_cycle = cycle.len() as u64;
        Self {
            config,
            field,
            cycle,
            n_workers,
            // Stream 0 of the seed belongs to the hot start.
            sweeps_done: 1 + start_cycle as u64 * sweeps_per_cycle,
            cycles_done: start_cycle,
            snapshot_path: None,
        }
    }

    /// Write a snapshot to `path` every `save_every` cycles.
    #[must_use]
    pub fn with_snapshots(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub const fn field(&self) -> &GaugeField<G> {
        &self.field
    }

    #[must_use]
    pub fn into_field(self) -> GaugeField<G> {
        self.field
    }

    #[must_use]
    pub const fn cycles_done(&self) -> usize {
        self.cycles_done
    }

    /// Run one update cycle and return its combined statistics.
    pub fn step(&mut self) -> SweepStats {
        let mut stats = SweepStats::default();
        for &update in &self.cycle {
            let params = SweepParams {
                update,
                action: self.config.action(),
                seed: self.config.seed,
                sweep_index: self.sweeps_done,
                n_workers: self.n_workers,
            };
            stats += sweep(&mut self.field, &params);
            self.sweeps_done += 1;
        }
        self.cycles_done += 1;
        stats
    }

    /// Measure the current field.
    #[must_use]
    pub fn measure(&self, stats: &SweepStats) -> SweepRecord {
        let clover = clover_observables(&self.field);
        let poly = average_polyakov_loop(&self.field);
        SweepRecord {
            sweep: self.cycles_done,
            group: G::NAME.to_string(),
            beta: self.config.beta,
            plaquette: average_plaquette(&self.field),
            spatial_plaquette: average_spatial_plaquette(&self.field),
            energy_density: clover.energy_density,
            topological_charge: clover.topological_charge,
            polyakov_re: poly.re,
            polyakov_im: poly.im,
            acceptance: stats.acceptance_rate(),
            temporal_acceptance: stats.temporal_acceptance_rate(),
        }
    }

    /// Run `n_sweeps` cycles, writing a record to `out` every
    /// `measure_every` cycles.
    ///
    /// # Errors
    ///
    /// Record write or snapshot I/O failure.
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<Vec<SweepRecord>> {
        let n = self.config.n_sweeps;
        let measure_every = self.config.measure_every;
        let save_every = self.config.save_every;
        tracing::info!(
            group = G::NAME,
            extents = ?self.field.geometry().extents(),
            ndims = self.field.geometry().ndims(),
            beta = self.config.beta,
            cycles = n,
            workers = self.n_workers,
            "starting Markov chain"
        );

        let mut records = Vec::with_capacity(n / measure_every + 1);
        let mut window = SweepStats::default();
        for _ in 0..n {
            window += self.step();
            let c = self.cycles_done;
            if c % measure_every == 0 {
                let rec = self.measure(&window);
                write_record(out, &rec)?;
                tracing::info!(
                    sweep = c,
                    plaquette = rec.plaquette,
                    charge = rec.topological_charge,
                    acceptance = rec.acceptance,
                    "measurement"
                );
                records.push(rec);
                window = SweepStats::default();
            }
            if save_every > 0 && c % save_every == 0 {
                if let Some(path) = &self.snapshot_path {
                    self.field.save_to_file(path)?;
                }
            }
        }
        out.flush()?;
        Ok(records)
    }
}
