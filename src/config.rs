// SPDX-License-Identifier: AGPL-3.0-only

//! Simulation configuration loaded from JSON.
//!
//! ```json
//! {
//!   "geometry": { "lt": 8, "lx": 8, "ly": 8, "lz": 8, "ndims": 4 },
//!   "beta": 2.3,
//!   "algorithm": { "kind": "heatbath_overrelaxation", "n_heatbath": 1, "n_overrelax": 4 },
//!   "n_sweeps": 500,
//!   "measure_every": 10
//! }
//! ```
//!
//! Missing fields take their [`Default`] values.

use crate::error::{LatticeError, Result};
use crate::lattice::constants::HOT_START_DEFAULT_SEED;
use crate::lattice::geometry::Geometry;
use crate::lattice::update::{ActionParams, LinkUpdate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Lattice extents as they appear in the config file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    pub lt: usize,
    pub lx: usize,
    pub ly: usize,
    pub lz: usize,
    pub ndims: usize,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            lt: 4,
            lx: 4,
            ly: 4,
            lz: 4,
            ndims: 4,
        }
    }
}

/// Update cycle run by the Markov chain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Algorithm {
    /// One Metropolis sweep per cycle.
    Metropolis { delta: f64, n_hit: usize },
    /// `n_heatbath` heatbath sweeps followed by `n_overrelax`
    /// overrelaxation sweeps.
    HeatbathOverrelaxation {
        n_heatbath: usize,
        n_overrelax: usize,
    },
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Metropolis {
            delta: 0.5,
            n_hit: 10,
        }
    }
}

impl Algorithm {
    /// Sweeps making up one cycle, in order.
    #[must_use]
    pub fn cycle(&self) -> Vec<LinkUpdate> {
        match *self {
            Self::Metropolis { delta, n_hit } => vec![LinkUpdate::Metropolis { delta, n_hit }],
            Self::HeatbathOverrelaxation {
                n_heatbath,
                n_overrelax,
            } => std::iter::repeat(LinkUpdate::Heatbath)
                .take(n_heatbath)
                .chain(std::iter::repeat(LinkUpdate::Overrelaxation).take(n_overrelax))
                .collect(),
        }
    }
}

/// Full description of a production run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub geometry: GeometryConfig,
    pub beta: f64,
    pub xi: f64,
    pub anisotropic: bool,
    pub algorithm: Algorithm,
    /// Number of update cycles.
    pub n_sweeps: usize,
    /// Measure every this many cycles.
    pub measure_every: usize,
    /// Write a snapshot every this many cycles; 0 disables.
    pub save_every: usize,
    pub seed: u64,
    /// Hot-start disorder in `[0, 1]`; 0 is a cold start.
    pub disorder: f64,
    /// Worker count; rayon's thread count when absent.
    pub n_workers: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            geometry: GeometryConfig::default(),
            beta: 2.0,
            xi: 1.0,
            anisotropic: false,
            algorithm: Algorithm::default(),
            n_sweeps: 100,
            measure_every: 1,
            save_every: 0,
            seed: HOT_START_DEFAULT_SEED,
            disorder: 1.0,
            n_workers: None,
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// [`LatticeError::Json`] for malformed input, otherwise whatever
    /// [`validate`](Self::validate) reports.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    ///
    /// # Errors
    ///
    /// I/O, JSON or validation failure.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let reader = std::io::BufReader::new(std::fs::File::open(path)?);
        let cfg: Self = serde_json::from_reader(reader)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check geometry and run parameters.
    ///
    /// # Errors
    ///
    /// Geometry errors from [`Geometry::new`], or
    /// [`LatticeError::InvalidConfig`] for non-finite couplings, a
    /// non-positive anisotropy, zero `measure_every` or an empty update
    /// cycle.
    pub fn validate(&self) -> Result<()> {
        self.lattice_geometry()?;
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(LatticeError::InvalidConfig(format!(
                "beta must be finite and non-negative, got {}",
                self.beta
            )));
        }
        if !(self.xi.is_finite() && self.xi > 0.0) {
            return Err(LatticeError::InvalidConfig(format!(
                "xi must be positive, got {}",
                self.xi
            )));
        }
        if self.measure_every == 0 {
            return Err(LatticeError::InvalidConfig(
                "measure_every must be at least 1".into(),
            ));
        }
        if self.n_workers == Some(0) {
            return Err(LatticeError::InvalidConfig(
                "n_workers must be at least 1".into(),
            ));
        }
        match self.algorithm {
            Algorithm::Metropolis { delta, n_hit } => {
                if n_hit == 0 || !delta.is_finite() || delta <= 0.0 {
                    return Err(LatticeError::InvalidConfig(format!(
                        "metropolis needs delta > 0 and n_hit >= 1, got delta={delta} n_hit={n_hit}"
                    )));
                }
            }
            Algorithm::HeatbathOverrelaxation { n_heatbath, .. } => {
                if n_heatbath == 0 {
                    return Err(LatticeError::InvalidConfig(
                        "n_heatbath must be at least 1".into(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Validated lattice geometry.
    ///
    /// # Errors
    ///
    /// See [`Geometry::new`].
    pub fn lattice_geometry(&self) -> Result<Geometry> {
        let g = self.geometry;
        Geometry::new([g.lt, g.lx, g.ly, g.lz], g.ndims)
    }

    #[must_use]
    pub const fn action(&self) -> ActionParams {
        ActionParams {
            beta: self.beta,
            xi: self.xi,
            anisotropic: self.anisotropic,
        }
    }

    /// Hot-start disorder clamped to `[0, 1]`.
    #[must_use]
    pub fn clamped_disorder(&self) -> f64 {
        self.disorder.clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.n_workers
            .unwrap_or_else(rayon::current_num_threads)
            .max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn parses_documented_example() {
        let json = r#"{
            "geometry": { "lt": 8, "lx": 8, "ly": 8, "lz": 8, "ndims": 4 },
            "beta": 2.3,
            "algorithm": { "kind": "heatbath_overrelaxation", "n_heatbath": 1, "n_overrelax": 4 },
            "n_sweeps": 500,
            "measure_every": 10
        }"#;
        let cfg = SimulationConfig::from_json_str(json).unwrap();
        assert_eq!(cfg.geometry.lt, 8);
        assert_eq!(cfg.n_sweeps, 500);
        assert!((cfg.xi - 1.0).abs() < f64::EPSILON);
        assert_eq!(cfg.algorithm.cycle().len(), 5);
        assert_eq!(cfg.lattice_geometry().unwrap().volume(), 4096);
    }

    #[test]
    fn metropolis_cycle_is_single_sweep() {
        let cycle = Algorithm::Metropolis {
            delta: 0.2,
            n_hit: 5,
        }
        .cycle();
        assert_eq!(
            cycle,
            vec![LinkUpdate::Metropolis {
                delta: 0.2,
                n_hit: 5
            }]
        );
    }

    #[test]
    fn heatbath_cycle_orders_heatbath_first() {
        let cycle = Algorithm::HeatbathOverrelaxation {
            n_heatbath: 2,
            n_overrelax: 3,
        }
        .cycle();
        assert_eq!(cycle[..2], [LinkUpdate::Heatbath, LinkUpdate::Heatbath]);
        assert!(cycle[2..].iter().all(|u| *u == LinkUpdate::Overrelaxation));
    }

    #[test]
    fn rejects_bad_geometry() {
        let json = r#"{ "geometry": { "lt": 4, "lx": 0, "ly": 4, "lz": 4, "ndims": 4 } }"#;
        assert!(matches!(
            SimulationConfig::from_json_str(json),
            Err(LatticeError::InvalidExtent { axis: 1, .. })
        ));
        let json = r#"{ "geometry": { "ndims": 5 } }"#;
        assert!(matches!(
            SimulationConfig::from_json_str(json),
            Err(LatticeError::InvalidDimensions { ndims: 5 })
        ));
    }

    #[test]
    fn rejects_bad_run_parameters() {
        let mut cfg = SimulationConfig {
            measure_every: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(LatticeError::InvalidConfig(_))));
        cfg.measure_every = 1;
        cfg.xi = 0.0;
        assert!(matches!(cfg.validate(), Err(LatticeError::InvalidConfig(_))));
        cfg.xi = 1.0;
        cfg.algorithm = Algorithm::Metropolis {
            delta: 0.5,
            n_hit: 0,
        };
        assert!(matches!(cfg.validate(), Err(LatticeError::InvalidConfig(_))));
    }

    #[test]
    fn malformed_json_is_json_error() {
        assert!(matches!(
            SimulationConfig::from_json_str("{ beta: "),
            Err(LatticeError::Json(_))
        ));
    }

    #[test]
    fn disorder_is_clamped() {
        let cfg = SimulationConfig {
            disorder: 3.0,
            ..SimulationConfig::default()
        };
        assert!((cfg.clamped_disorder() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn explicit_workers_win() {
        let cfg = SimulationConfig {
            n_workers: Some(3),
            ..SimulationConfig::default()
        };
        assert_eq!(cfg.workers(), 3);
        assert!(SimulationConfig::default().workers() >= 1);
    }

    #[test]
    fn two_dimensional_config_pins_unused_axes() {
        let json = r#"{ "geometry": { "lt": 6, "lx": 6, "ly": 9, "lz": 9, "ndims": 2 } }"#;
        let cfg = SimulationConfig::from_json_str(json).unwrap();
        assert_eq!(cfg.lattice_geometry().unwrap().volume(), 36);
    }
}
