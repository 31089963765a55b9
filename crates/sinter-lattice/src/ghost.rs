//! Ghost-halo refresh seam.
//!
//! The sweep scheduler calls [`GhostExchange::exchange`] exactly once per
//! sweep, after the last sector. In a multi-process run the implementation
//! is the network exchange with neighboring partitions; that collaborator
//! lives outside this workspace. The single-process periodic case is
//! provided here: the halo is refreshed from the opposite owned edges.

use crate::lattice::Lattice;
use sinter_core::Site;

/// Refreshes the ghost halo from authoritative neighbor state.
///
/// Implementations must leave every owned site untouched and must make
/// every halo record current before returning; sectors in the following
/// sweep read ghosts without further checks.
pub trait GhostExchange {
    /// Refresh the full halo. Blocking.
    fn exchange(&mut self, lattice: &mut Lattice);
}

/// Single-process fully periodic halo refresh.
///
/// Copies each owned boundary row/column to the ghost strip on the
/// opposite side, corners included, turning the owned partition into a
/// torus.
#[derive(Clone, Copy, Debug, Default)]
pub struct PeriodicExchange;

impl GhostExchange for PeriodicExchange {
    fn exchange(&mut self, lattice: &mut Lattice) {
        let nx = lattice.nx() as i32;
        let ny = lattice.ny() as i32;

        for j in 1..=ny {
            let south = lattice.state(Site::new(nx, j));
            lattice.set_state(Site::new(0, j), south);
            let north = lattice.state(Site::new(1, j));
            lattice.set_state(Site::new(nx + 1, j), north);
        }
        for i in 1..=nx {
            let west = lattice.state(Site::new(i, ny));
            lattice.set_state(Site::new(i, 0), west);
            let east = lattice.state(Site::new(i, 1));
            lattice.set_state(Site::new(i, ny + 1), east);
        }

        // Corners, for stencils wider than the cardinal four.
        let c = lattice.state(Site::new(nx, ny));
        lattice.set_state(Site::new(0, 0), c);
        let c = lattice.state(Site::new(nx, 1));
        lattice.set_state(Site::new(0, ny + 1), c);
        let c = lattice.state(Site::new(1, ny));
        lattice.set_state(Site::new(nx + 1, 0), c);
        let c = lattice.state(Site::new(1, 1));
        lattice.set_state(Site::new(nx + 1, ny + 1), c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sinter_core::SiteRng;

    #[test]
    fn exchange_mirrors_opposite_edges() {
        let mut lat = Lattice::new(3, 4).unwrap();
        for (ord, site) in lat.owned_sites().collect::<Vec<_>>().into_iter().enumerate() {
            lat.set_spin(site, ord as u32);
        }
        PeriodicExchange.exchange(&mut lat);

        for j in 1..=4 {
            assert_eq!(lat.spin(Site::new(0, j)), lat.spin(Site::new(3, j)));
            assert_eq!(lat.spin(Site::new(4, j)), lat.spin(Site::new(1, j)));
        }
        for i in 1..=3 {
            assert_eq!(lat.spin(Site::new(i, 0)), lat.spin(Site::new(i, 4)));
            assert_eq!(lat.spin(Site::new(i, 5)), lat.spin(Site::new(i, 1)));
        }
        assert_eq!(lat.spin(Site::new(0, 0)), lat.spin(Site::new(3, 4)));
        assert_eq!(lat.spin(Site::new(4, 5)), lat.spin(Site::new(1, 1)));
    }

    #[test]
    fn exchange_leaves_owned_sites_untouched() {
        let mut lat = Lattice::new(5, 5).unwrap();
        let mut rng = SiteRng::seeded(3, 0);
        lat.randomize_spins(4, &mut rng);
        let before: Vec<u32> = lat.owned_sites().map(|s| lat.spin(s)).collect();
        PeriodicExchange.exchange(&mut lat);
        let after: Vec<u32> = lat.owned_sites().map(|s| lat.spin(s)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn full_exchange_agrees_with_per_site_aliasing() {
        // The per-site alias refresh used in full-domain mode must agree
        // with the bulk exchange at every boundary site.
        let mut a = Lattice::new(4, 4).unwrap();
        let mut rng = SiteRng::seeded(19, 0);
        a.randomize_spins(3, &mut rng);
        let mut b = a.clone();

        PeriodicExchange.exchange(&mut a);
        for site in b.owned_sites().collect::<Vec<_>>() {
            b.update_ghosts_at(site);
        }

        for i in 1..=4 {
            for j in 1..=4 {
                let s = Site::new(i, j);
                for n in s.stencil() {
                    assert_eq!(a.spin(n), b.spin(n), "mismatch at neighbor {n} of {s}");
                }
            }
        }
    }
}
