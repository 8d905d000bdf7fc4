// SPDX-License-Identifier: AGPL-3.0-only

//! Gauge field storage: one group element per (site, direction).
//!
//! The field owns a single flat `Vec<G>` laid out as described in
//! [`geometry`](super::geometry). Cloning copies geometry and links
//! together. Snapshots are the raw bytes of that vector.

use super::constants::HOT_START_DEFAULT_SEED;
use super::geometry::{Coord, Geometry};
use super::group::GaugeGroup;
use crate::error::{LatticeError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ops::{Index, IndexMut};
use std::path::Path;

/// Read access to links by coordinate.
///
/// Implemented by [`GaugeField`] and by the per-slice views of the
/// parallel sweep, so that staples are written once for both.
pub trait LinkSource {
    type Group: GaugeGroup;

    fn geometry(&self) -> &Geometry;

    /// Link `U_mu(x)`, periodic in `x` and `mu`.
    fn link(&self, x: Coord, mu: usize) -> Self::Group;
}

/// Lattice of gauge links.
#[derive(Clone, Debug, PartialEq)]
pub struct GaugeField<G: GaugeGroup> {
    geometry: Geometry,
    links: Vec<G>,
}

impl<G: GaugeGroup> GaugeField<G> {
    /// Cold-start field: every link is the identity.
    #[must_use]
    pub fn cold(geometry: Geometry) -> Self {
        Self {
            geometry,
            links: vec![G::identity(); geometry.n_links()],
        }
    }

    /// Hot-start field drawn with a ChaCha generator seeded from `seed`.
    #[must_use]
    pub fn hot(geometry: Geometry, seed: u64, disorder: f64) -> Self {
        let mut field = Self::cold(geometry);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        field.hot_start(&mut rng, disorder);
        field
    }

    /// Hot start with the default seed.
    #[must_use]
    pub fn hot_default(geometry: Geometry, disorder: f64) -> Self {
        Self::hot(geometry, HOT_START_DEFAULT_SEED, disorder)
    }

    /// Reset every link to the identity.
    pub fn cold_start(&mut self) {
        self.links.fill(G::identity());
    }

    /// Draw every link independently with [`GaugeGroup::random`].
    ///
    /// `disorder` is clamped to `[0, 1]`: 0 is a cold start, 1 is Haar.
    pub fn hot_start<R: Rng + ?Sized>(&mut self, rng: &mut R, disorder: f64) {
        let d = disorder.clamp(0.0, 1.0);
        for u in &mut self.links {
            *u = G::random(rng, d).restore();
        }
    }

    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Number of links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn link(&self, x: Coord, mu: usize) -> G {
        self.links[self.geometry.index(x, mu)]
    }

    #[inline]
    pub fn set_link(&mut self, x: Coord, mu: usize, u: G) {
        let i = self.geometry.index(x, mu);
        self.links[i] = u;
    }

    #[must_use]
    pub fn links(&self) -> &[G] {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut [G] {
        &mut self.links
    }

    /// Re-project every link onto the manifold.
    pub fn restore_all(&mut self) {
        for u in &mut self.links {
            *u = u.restore();
        }
    }

    /// Quantise every link, see [`GaugeGroup::round`].
    pub fn round_all(&mut self, n: f64) {
        for u in &mut self.links {
            *u = u.round(n);
        }
    }

    /// Largest `|det U| - 1` over the field.
    #[must_use]
    pub fn max_manifold_deviation(&self) -> f64 {
        self.links
            .iter()
            .map(|u| (u.det().abs() - 1.0).abs())
            .fold(0.0, f64::max)
    }

    /// Snapshot size in bytes.
    #[must_use]
    pub fn storage_size(&self) -> usize {
        self.links.len() * std::mem::size_of::<G>()
    }

    /// Raw link array, in storage order.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice::<G, u8>(&self.links).to_vec()
    }

    /// Overwrite the links from a raw snapshot.
    ///
    /// # Errors
    ///
    /// [`LatticeError::SnapshotSize`] if `bytes` does not hold exactly
    /// `n_links` elements; the field is left untouched.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let expected = self.storage_size();
        if bytes.len() != expected {
            return Err(LatticeError::SnapshotSize {
                expected,
                found: bytes.len(),
            });
        }
        let elem = std::mem::size_of::<G>();
        for (u, chunk) in self.links.iter_mut().zip(bytes.chunks_exact(elem)) {
            *u = bytemuck::pod_read_unaligned(chunk);
        }
        Ok(())
    }

    /// Write the snapshot to `path`.
    ///
    /// # Errors
    ///
    /// Propagates I/O failures.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_bytes())?;
        tracing::info!(
            path = %path.as_ref().display(),
            bytes = self.storage_size(),
            group = G::NAME,
            "snapshot written"
        );
        Ok(())
    }

    /// Read a snapshot from `path` into this field.
    ///
    /// # Errors
    ///
    /// I/O failures, or [`LatticeError::SnapshotSize`] if the file does not
    /// match this geometry. The field is unmodified on error.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = std::fs::read(path.as_ref())?;
        self.load_bytes(&bytes)
    }
}

impl<G: GaugeGroup> LinkSource for GaugeField<G> {
    type Group = G;

    #[inline]
    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    fn link(&self, x: Coord, mu: usize) -> G {
        Self::link(self, x, mu)
    }
}

impl<G: GaugeGroup> Index<usize> for GaugeField<G> {
    type Output = G;

    fn index(&self, i: usize) -> &G {
        &self.links[i]
    }
}

impl<G: GaugeGroup> IndexMut<usize> for GaugeField<G> {
    fn index_mut(&mut self, i: usize) -> &mut G {
        &mut self.links[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::su2::Su2;
    use crate::lattice::u1::U1;
    use crate::tolerances::GROUP_MANIFOLD_ABS;

    fn geom() -> Geometry {
        Geometry::new([4, 2, 3, 2], 4).unwrap()
    }

    #[test]
    fn cold_start_is_identity() {
        let f = GaugeField::<Su2>::cold(geom());
        assert_eq!(f.len(), 4 * 2 * 3 * 2 * 4);
        assert!(f.links().iter().all(|&u| u == Su2::IDENTITY));
    }

    #[test]
    fn hot_start_on_manifold_and_reproducible() {
        let a = GaugeField::<Su2>::hot(geom(), 11, 1.0);
        let b = GaugeField::<Su2>::hot(geom(), 11, 1.0);
        let c = GaugeField::<Su2>::hot(geom(), 12, 1.0);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.max_manifold_deviation() < GROUP_MANIFOLD_ABS);
    }

    #[test]
    fn zero_disorder_hot_start_is_cold() {
        let f = GaugeField::<U1>::hot(geom(), 3, 0.0);
        assert!(f.links().iter().all(|u| u.theta == 0.0));
    }

    #[test]
    fn coordinate_and_flat_access_agree() {
        let mut f = GaugeField::<U1>::cold(geom());
        f.set_link([1, -1, 4, 2], 2, U1::new(0.5));
        let i = f.geometry().index([1, 1, 1, 0], 2);
        assert_eq!(f[i], U1::new(0.5));
        f[i] = U1::new(0.7);
        assert_eq!(f.link([5, 1, 1, 0], 6), U1::new(0.7));
    }

    #[test]
    fn snapshot_round_trip_is_bit_identical() {
        let f = GaugeField::<Su2>::hot(geom(), 5, 0.8);
        let bytes = f.to_bytes();
        assert_eq!(bytes.len(), f.storage_size());
        let mut g = GaugeField::<Su2>::cold(geom());
        g.load_bytes(&bytes).unwrap();
        assert_eq!(f, g);
        assert_eq!(g.to_bytes(), bytes);
    }

    #[test]
    fn snapshot_wrong_size_leaves_field_untouched() {
        let f = GaugeField::<U1>::hot(geom(), 6, 1.0);
        let mut g = GaugeField::<U1>::hot(geom(), 7, 1.0);
        let before = g.clone();
        let mut bytes = f.to_bytes();
        bytes.pop();
        let err = g.load_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            LatticeError::SnapshotSize { expected, found } if expected == found + 1
        ));
        assert_eq!(g, before);
    }

    #[test]
    fn snapshot_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "hotlattice_snapshot_{}.bin",
            std::process::id()
        ));
        let f = GaugeField::<U1>::hot(geom(), 8, 1.0);
        f.save_to_file(&path).unwrap();
        let mut g = GaugeField::<U1>::cold(geom());
        g.load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(f, g);
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut g = GaugeField::<U1>::cold(geom());
        let err = g.load_from_file("/nonexistent/dir/conf.bin").unwrap_err();
        assert!(matches!(err, LatticeError::Io(_)));
        assert!(g.links().iter().all(|u| u.theta == 0.0));
    }

    #[test]
    fn round_all_then_restore_stays_on_manifold() {
        let mut f = GaugeField::<Su2>::hot(geom(), 9, 1.0);
        f.round_all(1e6);
        assert!(f.max_manifold_deviation() < 1e-5);
        f.restore_all();
        assert!(f.max_manifold_deviation() < GROUP_MANIFOLD_ABS);
    }
}
