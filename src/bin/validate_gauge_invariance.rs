// SPDX-License-Identifier: AGPL-3.0-only

//! Gauge Invariance and Topology Validation.
//!
//! Checks the SU(2) and U(1) engines against exact identities and a
//! hand-computed reference configuration.
//!
//! # Validation targets
//!
//! | Observable | Expected | Tolerance | Basis |
//! |-----------|----------|-----------|-------|
//! | Cold plaquette | 1.0 | exact | Definition |
//! | Cold action | 0.0 | exact | Definition |
//! | Reference charge (U(1), 4^4) | 0.0126651 | 1e-5 | Hand-computed clover sum |
//! | Reference energy density | 0.0219727 | exact | Hand-computed clover sum |
//! | Plaquette, E, Q after gauge transform | unchanged | 1e-10 | Gauge invariance |
//! | Action after overrelaxation | unchanged | 1e-10 rel | Microcanonical update |
//! | Metropolis acceptance | (0.1, 0.99) | bounds | Algorithm sanity |

use hotlattice::lattice::gauge_transform::random_gauge_transform;
use hotlattice::lattice::observables::clover_observables;
use hotlattice::lattice::sweep::{sweep, SweepParams};
use hotlattice::lattice::update::{ActionParams, LinkUpdate};
use hotlattice::lattice::wilson::{average_plaquette, wilson_action};
use hotlattice::lattice::{GaugeField, GaugeGroup, Geometry, Su2, U1};
use hotlattice::tolerances;
use hotlattice::validation::ValidationHarness;
use std::f64::consts::{FRAC_PI_2, PI};

/// The reference U(1) configuration on a cold 4^4 lattice.
fn reference_u1_field() -> hotlattice::Result<GaugeField<U1>> {
    let mut field = GaugeField::<U1>::cold(Geometry::hypercubic(4, 4)?);
    let links: [([isize; 4], usize, f64); 8] = [
        ([1, 1, 1, 1], 0, 0.0),
        ([1, 1, 1, 1], 1, FRAC_PI_2),
        ([1, 1, 1, 1], 2, FRAC_PI_2),
        ([1, 1, 1, 1], 3, 0.0),
        ([0, 1, 1, 1], 0, PI),
        ([1, 0, 1, 1], 1, FRAC_PI_2),
        ([1, 1, 0, 0], 2, PI),
        ([1, 1, 1, 0], 3, FRAC_PI_2),
    ];
    for (x, mu, theta) in links {
        field.set_link(x, mu, U1::new(theta));
    }
    Ok(field)
}

/// Plaquette, energy density and charge before and after a random gauge
/// transformation.
fn check_invariance<G: GaugeGroup>(
    harness: &mut ValidationHarness,
    label: &str,
    field: &mut GaugeField<G>,
) {
    let plaq = average_plaquette(field);
    let obs = clover_observables(field);
    random_gauge_transform(field, 0xC0FFEE);
    let plaq_t = average_plaquette(field);
    let obs_t = clover_observables(field);

    println!("  {label}: plaquette {plaq:.10} → {plaq_t:.10}");
    println!(
        "  {label}: E {:.10} → {:.10}",
        obs.energy_density, obs_t.energy_density
    );
    println!(
        "  {label}: Q {:.10} → {:.10}",
        obs.topological_charge, obs_t.topological_charge
    );

    harness.check_abs(
        &format!("{label} plaquette invariant"),
        plaq_t,
        plaq,
        tolerances::GAUGE_INVARIANCE_ABS,
    );
    harness.check_abs(
        &format!("{label} energy density invariant"),
        obs_t.energy_density,
        obs.energy_density,
        tolerances::GAUGE_INVARIANCE_ABS,
    );
    harness.check_abs(
        &format!("{label} charge invariant"),
        obs_t.topological_charge,
        obs.topological_charge,
        tolerances::GAUGE_INVARIANCE_ABS,
    );
}

fn main() -> hotlattice::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  Gauge Invariance and Topology Validation                   ║");
    println!("║  SU(2) and U(1) Wilson action, clover observables           ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut harness = ValidationHarness::new("gauge_invariance");

    // ═══ Test 1: Cold start identities ═══
    println!("═══ Cold Start Verification ═══");
    {
        let geom = Geometry::hypercubic(4, 4)?;
        let su2 = GaugeField::<Su2>::cold(geom);
        let u1 = GaugeField::<U1>::cold(geom);
        let plaq_su2 = average_plaquette(&su2);
        let plaq_u1 = average_plaquette(&u1);
        let action = wilson_action(&su2, 2.3, 1.0, false);
        println!("  SU(2) plaquette: {plaq_su2:.6} (expected 1.0)");
        println!("  U(1) plaquette:  {plaq_u1:.6} (expected 1.0)");
        println!("  SU(2) action:    {action:.6} (expected 0.0)");
        harness.check_abs(
            "SU(2) cold plaquette",
            plaq_su2,
            1.0,
            tolerances::LATTICE_COLD_PLAQUETTE_ABS,
        );
        harness.check_abs(
            "U(1) cold plaquette",
            plaq_u1,
            1.0,
            tolerances::LATTICE_COLD_PLAQUETTE_ABS,
        );
        harness.check_abs(
            "SU(2) cold action",
            action,
            0.0,
            tolerances::LATTICE_COLD_ACTION_ABS,
        );
    }
    println!();

    // ═══ Test 2: Reference topological configuration ═══
    println!("═══ Reference U(1) Configuration (4^4) ═══");
    {
        let mut field = reference_u1_field()?;
        let obs = clover_observables(&field);
        println!(
            "  Q = {:.10} (expected {:.10})",
            obs.topological_charge,
            tolerances::TOPOLOGICAL_CHARGE_REFERENCE
        );
        println!(
            "  E = {:.10} (expected {:.10})",
            obs.energy_density,
            tolerances::ENERGY_DENSITY_REFERENCE
        );
        harness.check_abs(
            "reference topological charge",
            obs.topological_charge,
            tolerances::TOPOLOGICAL_CHARGE_REFERENCE,
            tolerances::TOPOLOGICAL_CHARGE_REFERENCE_ABS,
        );
        harness.check_abs(
            "reference energy density",
            obs.energy_density,
            tolerances::ENERGY_DENSITY_REFERENCE,
            tolerances::ENERGY_DENSITY_REFERENCE_ABS,
        );
        check_invariance(&mut harness, "reference U(1)", &mut field);
    }
    println!();

    // ═══ Test 3: Gauge invariance of hot configurations ═══
    println!("═══ Hot Configurations ═══");
    {
        let geom = Geometry::new([4, 4, 4, 4], 4)?;
        let mut su2 = GaugeField::<Su2>::hot(geom, 7, 1.0);
        check_invariance(&mut harness, "SU(2) 4D", &mut su2);
        let mut u1 = GaugeField::<U1>::hot(geom, 11, 1.0);
        check_invariance(&mut harness, "U(1) 4D", &mut u1);
        let geom_2d = Geometry::new([8, 6, 1, 1], 2)?;
        let mut u1_2d = GaugeField::<U1>::hot(geom_2d, 13, 1.0);
        check_invariance(&mut harness, "U(1) 2D", &mut u1_2d);
    }
    println!();

    // ═══ Test 4: Overrelaxation exactness ═══
    println!("═══ Overrelaxation ═══");
    {
        let geom = Geometry::hypercubic(4, 4)?;
        let beta = 2.3;
        let params = SweepParams {
            update: LinkUpdate::Overrelaxation,
            action: ActionParams::isotropic(beta),
            seed: 99,
            sweep_index: 0,
            n_workers: 2,
        };
        let mut su2 = GaugeField::<Su2>::hot(geom, 17, 0.6);
        let before = wilson_action(&su2, beta, 1.0, false);
        sweep(&mut su2, &params);
        let after = wilson_action(&su2, beta, 1.0, false);
        println!("  SU(2) action: {before:.10} → {after:.10}");
        harness.check_rel(
            "SU(2) overrelaxation preserves action",
            after,
            before,
            tolerances::OVERRELAX_ACTION_REL,
        );
        harness.check_upper(
            "SU(2) stays on manifold",
            su2.max_manifold_deviation(),
            tolerances::GROUP_MANIFOLD_ABS,
        );

        let mut u1 = GaugeField::<U1>::hot(geom, 19, 0.6);
        let before = wilson_action(&u1, beta, 1.0, false);
        sweep(&mut u1, &params);
        let after = wilson_action(&u1, beta, 1.0, false);
        println!("  U(1) action:  {before:.10} → {after:.10}");
        harness.check_rel(
            "U(1) overrelaxation preserves action",
            after,
            before,
            tolerances::OVERRELAX_ACTION_REL,
        );
    }
    println!();

    // ═══ Test 5: Metropolis acceptance ═══
    println!("═══ Metropolis SU(2) at β=2.3 ═══");
    {
        let geom = Geometry::hypercubic(4, 4)?;
        let mut field = GaugeField::<Su2>::hot(geom, 23, 1.0);
        let params = |s| SweepParams {
            update: LinkUpdate::Metropolis {
                delta: 0.5,
                n_hit: 4,
            },
            action: ActionParams::isotropic(2.3),
            seed: 23,
            sweep_index: s,
            n_workers: 2,
        };
        for s in 0..9 {
            sweep(&mut field, &params(s));
        }
        let rate = sweep(&mut field, &params(9)).acceptance_rate();
        println!("  Acceptance (last sweep): {:.1}%", rate * 100.0);
        println!("  Plaquette: {:.6}", average_plaquette(&field));
        harness.check_lower(
            "Metropolis acceptance lower",
            rate,
            tolerances::METROPOLIS_ACCEPTANCE_MIN,
        );
        harness.check_upper(
            "Metropolis acceptance upper",
            rate,
            tolerances::METROPOLIS_ACCEPTANCE_MAX,
        );
    }
    println!();

    harness.finish();
}
