// SPDX-License-Identifier: AGPL-3.0-only

//! Integration tests: each update algorithm drives the chain to the
//! expected coupling regime.

use hotlattice::config::{Algorithm, GeometryConfig, SimulationConfig};
use hotlattice::lattice::{Su2, U1};
use hotlattice::production::{MarkovChain, SweepRecord};
use hotlattice::tolerances;

fn config(geometry: GeometryConfig, beta: f64, algorithm: Algorithm, n_sweeps: usize) -> SimulationConfig {
    SimulationConfig {
        geometry,
        beta,
        algorithm,
        n_sweeps,
        measure_every: 1,
        seed: 4242,
        disorder: 1.0,
        n_workers: Some(2),
        ..SimulationConfig::default()
    }
}

fn hypercube(l: usize) -> GeometryConfig {
    GeometryConfig {
        lt: l,
        lx: l,
        ly: l,
        lz: l,
        ndims: 4,
    }
}

/// Mean plaquette over the second half of the run.
fn late_plaquette(records: &[SweepRecord]) -> f64 {
    let tail = &records[records.len() / 2..];
    tail.iter().map(|r| r.plaquette).sum::<f64>() / tail.len() as f64
}

#[test]
fn su2_heatbath_overrelaxation_reaches_scaling_region() {
    let cfg = config(
        hypercube(4),
        2.3,
        Algorithm::HeatbathOverrelaxation {
            n_heatbath: 1,
            n_overrelax: 2,
        },
        40,
    );
    let mut chain = MarkovChain::<Su2>::new(cfg).unwrap();
    let records = chain.run(&mut std::io::sink()).unwrap();
    let plaq = late_plaquette(&records);
    assert!(plaq > 0.55 && plaq < 0.66, "SU(2) β=2.3 plaquette {plaq}");
    assert!(chain.field().max_manifold_deviation() < tolerances::GROUP_MANIFOLD_ABS);
}

#[test]
fn su2_metropolis_thermalizes_and_accepts_moderately() {
    let cfg = config(
        hypercube(4),
        2.3,
        Algorithm::Metropolis {
            delta: 0.5,
            n_hit: 8,
        },
        60,
    );
    let mut chain = MarkovChain::<Su2>::new(cfg).unwrap();
    let records = chain.run(&mut std::io::sink()).unwrap();
    let plaq = late_plaquette(&records);
    assert!(plaq > 0.5 && plaq < 0.7, "SU(2) Metropolis plaquette {plaq}");
    let acc = records.last().unwrap().acceptance;
    assert!(
        acc > tolerances::METROPOLIS_ACCEPTANCE_MIN && acc < tolerances::METROPOLIS_ACCEPTANCE_MAX,
        "acceptance {acc}"
    );
}

#[test]
fn su2_weak_coupling_orders_the_field() {
    let cfg = config(
        hypercube(4),
        8.0,
        Algorithm::HeatbathOverrelaxation {
            n_heatbath: 1,
            n_overrelax: 1,
        },
        20,
    );
    let mut chain = MarkovChain::<Su2>::new(cfg).unwrap();
    let records = chain.run(&mut std::io::sink()).unwrap();
    assert!(late_plaquette(&records) > tolerances::WEAK_COUPLING_PLAQ_MIN);
}

#[test]
fn u1_strong_coupling_stays_disordered() {
    let cfg = config(
        hypercube(4),
        0.5,
        Algorithm::HeatbathOverrelaxation {
            n_heatbath: 1,
            n_overrelax: 1,
        },
        20,
    );
    let mut chain = MarkovChain::<U1>::new(cfg).unwrap();
    let records = chain.run(&mut std::io::sink()).unwrap();
    let plaq = late_plaquette(&records);
    assert!(plaq > 0.0 && plaq < tolerances::U1_STRONG_COUPLING_PLAQ_MAX, "U(1) β=0.5 plaquette {plaq}");
}

#[test]
fn u1_two_dimensional_plaquette_matches_bessel_ratio() {
    // In 2D the plaquettes are independent: ⟨cos θ_P⟩ = I1(β)/I0(β).
    let geometry = GeometryConfig {
        lt: 16,
        lx: 16,
        ly: 1,
        lz: 1,
        ndims: 2,
    };
    let cfg = config(
        geometry,
        2.0,
        Algorithm::HeatbathOverrelaxation {
            n_heatbath: 1,
            n_overrelax: 2,
        },
        200,
    );
    let mut chain = MarkovChain::<U1>::new(cfg).unwrap();
    let records = chain.run(&mut std::io::sink()).unwrap();
    let plaq = late_plaquette(&records);
    let expected = 0.697_775;
    assert!((plaq - expected).abs() < 0.03, "2D U(1) plaquette {plaq}, expected {expected}");
    assert!(records.iter().all(|r| r.spatial_plaquette.is_none()));
}

#[test]
fn odd_time_extent_still_runs_with_many_workers() {
    let geometry = GeometryConfig {
        lt: 3,
        lx: 4,
        ly: 4,
        lz: 2,
        ndims: 4,
    };
    let mut cfg = config(geometry, 2.0, Algorithm::default(), 4);
    cfg.n_workers = Some(4);
    let mut chain = MarkovChain::<Su2>::new(cfg).unwrap();
    let records = chain.run(&mut std::io::sink()).unwrap();
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.plaquette < 1.0 && r.plaquette > -1.0));
}
