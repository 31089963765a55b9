//! Halo-padded storage for the locally owned lattice partition.

use crate::error::LatticeError;
use sinter_core::{Site, SiteKind, SiteRng, Spin};

/// Per-site state record.
///
/// One arena of records rather than parallel per-field arrays: every
/// site carries its primary spin and a secondary kind classifier side
/// by side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SiteState {
    /// Primary discrete state (spin, grain id, or occupying species).
    pub spin: Spin,
    /// Secondary classifier; 0 for models without a kind concept.
    pub kind: SiteKind,
}

/// The locally owned lattice partition plus a one-site ghost halo.
///
/// Owned sites live at `1 <= i <= nx`, `1 <= j <= ny`; ghost sites fill
/// index 0 and `n + 1` on each axis. Ghosts are read-mostly caches of
/// neighboring state: they are written only by a [`GhostExchange`] at
/// sweep boundaries or by the per-site periodic aliasing used when one
/// process owns the full domain.
///
/// [`GhostExchange`]: crate::ghost::GhostExchange
///
/// # Examples
///
/// ```
/// use sinter_lattice::Lattice;
/// use sinter_core::Site;
///
/// let mut lat = Lattice::new(4, 4).unwrap();
/// lat.set_spin(Site::new(1, 1), 3);
/// assert_eq!(lat.spin(Site::new(1, 1)), 3);
/// assert_eq!(lat.owned_count(), 16);
/// ```
#[derive(Clone, Debug)]
pub struct Lattice {
    nx: u32,
    ny: u32,
    sites: Vec<SiteState>,
}

impl Lattice {
    /// Maximum owned dimension: coordinates (including the halo) must
    /// fit in `i32`.
    pub const MAX_DIM: u32 = i32::MAX as u32 - 2;

    /// Create an `nx` by `ny` owned lattice with all records zeroed.
    ///
    /// Returns `Err(LatticeError::EmptyLattice)` if either dimension is
    /// zero, or `Err(LatticeError::DimensionTooLarge)` if either exceeds
    /// [`Lattice::MAX_DIM`].
    pub fn new(nx: u32, ny: u32) -> Result<Self, LatticeError> {
        if nx == 0 || ny == 0 {
            return Err(LatticeError::EmptyLattice);
        }
        if nx > Self::MAX_DIM {
            return Err(LatticeError::DimensionTooLarge {
                name: "nx",
                value: nx,
                max: Self::MAX_DIM,
            });
        }
        if ny > Self::MAX_DIM {
            return Err(LatticeError::DimensionTooLarge {
                name: "ny",
                value: ny,
                max: Self::MAX_DIM,
            });
        }
        let padded = (nx as usize + 2) * (ny as usize + 2);
        Ok(Self {
            nx,
            ny,
            sites: vec![SiteState::default(); padded],
        })
    }

    /// Owned rows.
    pub fn nx(&self) -> u32 {
        self.nx
    }

    /// Owned columns.
    pub fn ny(&self) -> u32 {
        self.ny
    }

    /// Number of owned sites.
    pub fn owned_count(&self) -> usize {
        (self.nx as usize) * (self.ny as usize)
    }

    fn index(&self, site: Site) -> usize {
        debug_assert!(
            site.i >= 0
                && site.i <= self.nx as i32 + 1
                && site.j >= 0
                && site.j <= self.ny as i32 + 1,
            "site {site} outside halo-padded bounds"
        );
        (site.i as usize) * (self.ny as usize + 2) + site.j as usize
    }

    /// The full record at `site` (owned or ghost).
    pub fn state(&self, site: Site) -> SiteState {
        self.sites[self.index(site)]
    }

    /// Overwrite the full record at `site`.
    pub fn set_state(&mut self, site: Site, state: SiteState) {
        let idx = self.index(site);
        self.sites[idx] = state;
    }

    /// The spin at `site` (owned or ghost).
    pub fn spin(&self, site: Site) -> Spin {
        self.sites[self.index(site)].spin
    }

    /// Set the spin at `site`.
    pub fn set_spin(&mut self, site: Site, spin: Spin) {
        let idx = self.index(site);
        self.sites[idx].spin = spin;
    }

    /// The kind classifier at `site` (owned or ghost).
    pub fn kind(&self, site: Site) -> SiteKind {
        self.sites[self.index(site)].kind
    }

    /// Set the kind classifier at `site`.
    pub fn set_kind(&mut self, site: Site, kind: SiteKind) {
        let idx = self.index(site);
        self.sites[idx].kind = kind;
    }

    /// Whether `site` is an owned (locally authoritative) site.
    pub fn is_owned(&self, site: Site) -> bool {
        site.i >= 1 && site.i <= self.nx as i32 && site.j >= 1 && site.j <= self.ny as i32
    }

    /// Wrap a coordinate one step outside the owned region back into it
    /// under periodic boundaries.
    ///
    /// Used when a single process owns the full domain and a stencil
    /// neighbor lands in the halo: the authoritative copy is the owned
    /// site on the opposite edge.
    pub fn wrap_owned(&self, site: Site) -> Site {
        let mut i = site.i;
        let mut j = site.j;
        if i == 0 {
            i = self.nx as i32;
        } else if i == self.nx as i32 + 1 {
            i = 1;
        }
        if j == 0 {
            j = self.ny as i32;
        } else if j == self.ny as i32 + 1 {
            j = 1;
        }
        Site::new(i, j)
    }

    /// Refresh any ghost neighbors of `site` from their periodic owned
    /// aliases.
    ///
    /// Only meaningful when this process owns the full domain; callers
    /// running on a sector of a larger lattice rely on the exchanged
    /// halo instead. Must run before a propensity survey at a boundary
    /// site so the survey reads current neighbor state.
    pub fn update_ghosts_at(&mut self, site: Site) {
        let (i, j) = (site.i, site.j);
        let nx = self.nx as i32;
        let ny = self.ny as i32;
        if i == 1 {
            let v = self.state(Site::new(nx, j));
            self.set_state(Site::new(0, j), v);
        }
        if i == nx {
            let v = self.state(Site::new(1, j));
            self.set_state(Site::new(nx + 1, j), v);
        }
        if j == 1 {
            let v = self.state(Site::new(i, ny));
            self.set_state(Site::new(i, 0), v);
        }
        if j == ny {
            let v = self.state(Site::new(i, 1));
            self.set_state(Site::new(i, ny + 1), v);
        }
    }

    /// Iterate owned sites in row-major order.
    pub fn owned_sites(&self) -> impl Iterator<Item = Site> + '_ {
        let (nx, ny) = (self.nx as i32, self.ny as i32);
        (1..=nx).flat_map(move |i| (1..=ny).map(move |j| Site::new(i, j)))
    }

    /// Dense ordinal of an owned site, row-major from 0.
    ///
    /// Ordinals index per-site side tables (event-list heads, per-site
    /// RNG streams) without storing a map.
    pub fn ordinal(&self, site: Site) -> usize {
        debug_assert!(self.is_owned(site), "ordinal of non-owned site {site}");
        (site.i as usize - 1) * (self.ny as usize) + (site.j as usize - 1)
    }

    /// Assign every owned site a uniform random spin in `[0, n_states)`.
    ///
    /// Visits sites in row-major order so the assignment depends only on
    /// the generator state, not on the decomposition.
    pub fn randomize_spins(&mut self, n_states: u32, rng: &mut SiteRng) {
        let sites: Vec<Site> = self.owned_sites().collect();
        for site in sites {
            let spin = rng.index(n_states as usize) as Spin;
            self.set_spin(site, spin);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_zero_dimension_is_error() {
        assert!(matches!(Lattice::new(0, 4), Err(LatticeError::EmptyLattice)));
        assert!(matches!(Lattice::new(4, 0), Err(LatticeError::EmptyLattice)));
    }

    #[test]
    fn new_rejects_oversized_dimension() {
        let big = Lattice::MAX_DIM + 1;
        assert!(matches!(
            Lattice::new(big, 1),
            Err(LatticeError::DimensionTooLarge { name: "nx", .. })
        ));
        assert!(matches!(
            Lattice::new(1, big),
            Err(LatticeError::DimensionTooLarge { name: "ny", .. })
        ));
    }

    #[test]
    fn owned_iteration_is_row_major_and_complete() {
        let lat = Lattice::new(3, 2).unwrap();
        let sites: Vec<Site> = lat.owned_sites().collect();
        assert_eq!(sites.len(), 6);
        assert_eq!(sites[0], Site::new(1, 1));
        assert_eq!(sites[1], Site::new(1, 2));
        assert_eq!(sites[5], Site::new(3, 2));
        for (ord, site) in sites.iter().enumerate() {
            assert_eq!(lat.ordinal(*site), ord);
        }
    }

    #[test]
    fn wrap_owned_maps_halo_to_opposite_edge() {
        let lat = Lattice::new(4, 5).unwrap();
        assert_eq!(lat.wrap_owned(Site::new(0, 3)), Site::new(4, 3));
        assert_eq!(lat.wrap_owned(Site::new(5, 3)), Site::new(1, 3));
        assert_eq!(lat.wrap_owned(Site::new(2, 0)), Site::new(2, 5));
        assert_eq!(lat.wrap_owned(Site::new(2, 6)), Site::new(2, 1));
        assert_eq!(lat.wrap_owned(Site::new(2, 3)), Site::new(2, 3));
    }

    #[test]
    fn update_ghosts_at_copies_periodic_aliases() {
        let mut lat = Lattice::new(3, 3).unwrap();
        lat.set_spin(Site::new(3, 2), 7);
        lat.update_ghosts_at(Site::new(1, 2));
        assert_eq!(lat.spin(Site::new(0, 2)), 7);

        lat.set_spin(Site::new(2, 1), 9);
        lat.update_ghosts_at(Site::new(2, 3));
        assert_eq!(lat.spin(Site::new(2, 4)), 9);
    }

    #[test]
    fn corner_site_refreshes_both_ghost_neighbors() {
        let mut lat = Lattice::new(3, 3).unwrap();
        lat.set_spin(Site::new(3, 1), 4);
        lat.set_spin(Site::new(1, 3), 5);
        lat.update_ghosts_at(Site::new(1, 1));
        assert_eq!(lat.spin(Site::new(0, 1)), 4);
        assert_eq!(lat.spin(Site::new(1, 0)), 5);
    }

    #[test]
    fn randomize_spins_stays_in_range() {
        let mut lat = Lattice::new(8, 8).unwrap();
        let mut rng = SiteRng::seeded(11, 0);
        lat.randomize_spins(5, &mut rng);
        for site in lat.owned_sites().collect::<Vec<_>>() {
            assert!(lat.spin(site) < 5);
        }
    }

    #[test]
    fn record_round_trips_spin_and_kind() {
        let mut lat = Lattice::new(2, 2).unwrap();
        let s = Site::new(2, 1);
        lat.set_spin(s, 3);
        lat.set_kind(s, 1);
        assert_eq!(lat.state(s), SiteState { spin: 3, kind: 1 });
    }
}
