// SPDX-License-Identifier: AGPL-3.0-only

//! Integration tests: snapshot byte layout and file round trips.

use hotlattice::lattice::sweep::{sweep, SweepParams};
use hotlattice::lattice::update::{ActionParams, LinkUpdate};
use hotlattice::lattice::wilson::average_plaquette;
use hotlattice::lattice::{GaugeField, Geometry, Su2, U1};
use hotlattice::LatticeError;

fn temp_path(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("hotlattice_it_{tag}_{}.bin", std::process::id()))
}

#[test]
fn snapshot_is_link_array_in_storage_order() {
    let geom = Geometry::new([2, 3, 1, 1], 2).unwrap();
    let field = GaugeField::<U1>::hot(geom, 3, 1.0);
    let bytes = field.to_bytes();
    assert_eq!(bytes.len(), geom.n_links() * 8);
    for (i, chunk) in bytes.chunks_exact(8).enumerate() {
        let theta = f64::from_ne_bytes(chunk.try_into().unwrap());
        assert_eq!(theta.to_bits(), field[i].theta.to_bits());
    }
}

#[test]
fn su2_snapshot_is_four_doubles_per_link() {
    let geom = Geometry::hypercubic(2, 4).unwrap();
    let field = GaugeField::<Su2>::hot(geom, 4, 1.0);
    assert_eq!(field.to_bytes().len(), geom.n_links() * 32);
}

#[test]
fn evolved_field_round_trips_through_file() {
    let geom = Geometry::hypercubic(4, 4).unwrap();
    let mut field = GaugeField::<Su2>::hot(geom, 8, 1.0);
    let params = SweepParams {
        update: LinkUpdate::Heatbath,
        action: ActionParams::isotropic(2.3),
        seed: 8,
        sweep_index: 1,
        n_workers: 2,
    };
    sweep(&mut field, &params);

    let path = temp_path("su2");
    field.save_to_file(&path).unwrap();
    let mut restored = GaugeField::<Su2>::cold(geom);
    restored.load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(restored, field);
    assert_eq!(
        average_plaquette(&restored).to_bits(),
        average_plaquette(&field).to_bits()
    );
}

#[test]
fn mismatched_snapshot_is_rejected_without_side_effects() {
    let small = GaugeField::<U1>::hot(Geometry::hypercubic(2, 4).unwrap(), 1, 1.0);
    let path = temp_path("u1_small");
    small.save_to_file(&path).unwrap();

    let big_geom = Geometry::hypercubic(4, 4).unwrap();
    let mut big = GaugeField::<U1>::hot(big_geom, 2, 1.0);
    let before = big.clone();
    let err = big.load_from_file(&path).unwrap_err();
    std::fs::remove_file(&path).ok();

    assert!(matches!(
        err,
        LatticeError::SnapshotSize { expected, found } if expected == big.storage_size() && found == small.storage_size()
    ));
    assert_eq!(big, before);
}
