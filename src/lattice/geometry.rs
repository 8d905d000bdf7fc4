// SPDX-License-Identifier: AGPL-3.0-only

//! Periodic lattice geometry and link addressing.
//!
//! Coordinates are ordered `[t, x, y, z]` and extents `[Lt, Lx, Ly, Lz]`.
//! The flat link offset nests time outermost and direction innermost:
//!
//!   `index = (((t·Lx + x)·Ly + y)·Lz + z)·ndims + mu`
//!
//! so every time slice is one contiguous block of `Lx·Ly·Lz·ndims` links.
//! Snapshots reproduce this order byte for byte, and the parallel sweep
//! partitions the storage along these blocks.

use super::constants::{N_DIM_MAX, N_DIM_MIN};
use crate::error::{LatticeError, Result};
use serde::{Deserialize, Serialize};

/// Lattice coordinate `[t, x, y, z]`; any integer is legal and wraps.
pub type Coord = [isize; 4];

/// Immutable lattice shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    extents: [usize; 4],
    ndims: usize,
}

impl Geometry {
    /// Validate and build a geometry.
    ///
    /// Axes beyond `ndims` are pinned to extent 1 whatever was passed.
    ///
    /// # Errors
    ///
    /// [`LatticeError::InvalidDimensions`] if `ndims ∉ 2..=4`,
    /// [`LatticeError::InvalidExtent`] if an active extent is 0.
    pub fn new(extents: [usize; 4], ndims: usize) -> Result<Self> {
        if !(N_DIM_MIN..=N_DIM_MAX).contains(&ndims) {
            return Err(LatticeError::InvalidDimensions { ndims });
        }
        let mut pinned = [1; 4];
        for (axis, &extent) in extents.iter().enumerate().take(ndims) {
            if extent < 1 {
                return Err(LatticeError::InvalidExtent { axis, extent });
            }
            pinned[axis] = extent;
        }
        Ok(Self {
            extents: pinned,
            ndims,
        })
    }

    /// Hypercubic `L^ndims` lattice.
    ///
    /// # Errors
    ///
    /// See [`Geometry::new`].
    pub fn hypercubic(l: usize, ndims: usize) -> Result<Self> {
        Self::new([l; 4], ndims)
    }

    #[must_use]
    pub const fn extents(&self) -> [usize; 4] {
        self.extents
    }

    #[must_use]
    pub const fn ndims(&self) -> usize {
        self.ndims
    }

    /// Time extent `Lt`.
    #[must_use]
    pub const fn lt(&self) -> usize {
        self.extents[0]
    }

    /// Number of sites.
    #[must_use]
    pub const fn volume(&self) -> usize {
        self.extents[0] * self.extents[1] * self.extents[2] * self.extents[3]
    }

    /// Sites per time slice.
    #[must_use]
    pub const fn spatial_volume(&self) -> usize {
        self.extents[1] * self.extents[2] * self.extents[3]
    }

    /// Total number of links, `volume · ndims`.
    #[must_use]
    pub const fn n_links(&self) -> usize {
        self.volume() * self.ndims
    }

    /// Links per time slice.
    #[must_use]
    pub const fn slice_len(&self) -> usize {
        self.spatial_volume() * self.ndims
    }

    /// Number of unordered planes `mu < nu`.
    #[must_use]
    pub const fn n_planes(&self) -> usize {
        self.ndims * (self.ndims - 1) / 2
    }

    #[inline]
    fn wrap(&self, c: isize, axis: usize) -> usize {
        // extents are at least 1 and far below isize::MAX
        c.rem_euclid(self.extents[axis] as isize) as usize
    }

    /// Offset of link `(x, mu)` inside its time slice.
    #[inline]
    #[must_use]
    pub fn slice_offset(&self, x: Coord, mu: usize) -> usize {
        let sx = self.wrap(x[1], 1);
        let sy = self.wrap(x[2], 2);
        let sz = self.wrap(x[3], 3);
        ((sx * self.extents[2] + sy) * self.extents[3] + sz) * self.ndims + mu % self.ndims
    }

    /// Wrapped time coordinate.
    #[inline]
    #[must_use]
    pub fn time_of(&self, x: Coord) -> usize {
        self.wrap(x[0], 0)
    }

    /// Flat offset of link `(x, mu)`, periodic in every coordinate and in `mu`.
    #[inline]
    #[must_use]
    pub fn index(&self, x: Coord, mu: usize) -> usize {
        self.time_of(x) * self.slice_len() + self.slice_offset(x, mu)
    }

    /// Flat site number (`index(x, 0) / ndims`).
    #[inline]
    #[must_use]
    pub fn site_index(&self, x: Coord) -> usize {
        self.index(x, 0) / self.ndims
    }

    /// Coordinates of a flat site number.
    #[must_use]
    pub fn site_coords(&self, site: usize) -> Coord {
        let [_, lx, ly, lz] = self.extents;
        let z = site % lz;
        let y = (site / lz) % ly;
        let x = (site / (lz * ly)) % lx;
        let t = site / (lz * ly * lx);
        [t as isize, x as isize, y as isize, z as isize]
    }

    /// Inverse of [`Geometry::index`] on `[0, n_links)`.
    #[must_use]
    pub fn link_coords(&self, index: usize) -> (Coord, usize) {
        (self.site_coords(index / self.ndims), index % self.ndims)
    }

    /// `x + steps · ê_mu` (unwrapped).
    #[inline]
    #[must_use]
    pub fn shift(x: Coord, mu: usize, steps: isize) -> Coord {
        let mut y = x;
        y[mu] += steps;
        y
    }

    /// All sites in storage order.
    pub fn sites(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.volume()).map(move |s| self.site_coords(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_bad_dimensions() {
        assert!(matches!(
            Geometry::new([4; 4], 1),
            Err(LatticeError::InvalidDimensions { ndims: 1 })
        ));
        assert!(matches!(
            Geometry::new([4; 4], 5),
            Err(LatticeError::InvalidDimensions { ndims: 5 })
        ));
    }

    #[test]
    fn rejects_zero_active_extent() {
        assert!(matches!(
            Geometry::new([4, 0, 4, 4], 4),
            Err(LatticeError::InvalidExtent { axis: 1, extent: 0 })
        ));
    }

    #[test]
    fn pins_unused_extents() {
        let g = Geometry::new([6, 4, 0, 7], 2).unwrap();
        assert_eq!(g.extents(), [6, 4, 1, 1]);
        assert_eq!(g.volume(), 24);
        assert_eq!(g.n_links(), 48);
        let g3 = Geometry::new([2, 3, 5, 9], 3).unwrap();
        assert_eq!(g3.extents(), [2, 3, 5, 1]);
    }

    #[test]
    fn index_nesting_order() {
        let g = Geometry::new([3, 4, 5, 6], 4).unwrap();
        assert_eq!(g.index([0, 0, 0, 0], 1), 1);
        assert_eq!(g.index([0, 0, 0, 1], 0), 4);
        assert_eq!(g.index([0, 0, 1, 0], 0), 24);
        assert_eq!(g.index([0, 1, 0, 0], 0), 120);
        assert_eq!(g.index([1, 0, 0, 0], 0), 480);
        assert_eq!(g.slice_len(), 480);
    }

    #[test]
    fn index_is_bijective() {
        let g = Geometry::new([2, 3, 4, 5], 4).unwrap();
        let mut seen = vec![false; g.n_links()];
        for x in g.sites() {
            for mu in 0..g.ndims() {
                let i = g.index(x, mu);
                assert!(!seen[i]);
                seen[i] = true;
                assert_eq!(g.link_coords(i), (x, mu));
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn direction_wraps_modulo_ndims() {
        let g = Geometry::new([4, 4, 1, 1], 2).unwrap();
        assert_eq!(g.index([1, 2, 0, 0], 3), g.index([1, 2, 0, 0], 1));
    }

    proptest! {
        #[test]
        fn index_is_periodic(
            lt in 1usize..6, lx in 1usize..6, ly in 1usize..6, lz in 1usize..6,
            c in prop::array::uniform4(-20isize..20),
            axis in 0usize..4, mu in 0usize..4, k in -3isize..3,
        ) {
            let g = Geometry::new([lt, lx, ly, lz], 4).unwrap();
            let ext = g.extents()[axis] as isize;
            let shifted = Geometry::shift(c, axis, k * ext);
            prop_assert_eq!(g.index(shifted, mu), g.index(c, mu));
            prop_assert_eq!(g.index(c, mu + 4), g.index(c, mu));
            prop_assert!(g.index(c, mu) < g.n_links());
        }
    }
}
