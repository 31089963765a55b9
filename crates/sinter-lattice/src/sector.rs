//! Sector (quadrant) decomposition of the owned lattice.
//!
//! Sectors partition the owned region exactly: disjoint, full coverage.
//! The sweep scheduler processes one sector at a time, which is the
//! whole correctness argument for lock-free intra-process updates — a
//! site's event writes only its own sector, while stencil reads of
//! inactive sectors and ghosts see stable state.

use crate::error::LatticeError;
use sinter_core::Site;

/// One axis-aligned sub-rectangle of the owned lattice.
///
/// Bounds are inclusive owned coordinates. The member list enumerates
/// the sector's sites in row-major order; member ordinals index the
/// scheduler's per-sector propensity table and selector.
#[derive(Clone, Debug)]
pub struct Sector {
    xlo: i32,
    xhi: i32,
    ylo: i32,
    yhi: i32,
    sites: Vec<Site>,
}

impl Sector {
    fn new(xlo: i32, xhi: i32, ylo: i32, yhi: i32) -> Self {
        let mut sites = Vec::with_capacity(((xhi - xlo + 1) * (yhi - ylo + 1)) as usize);
        for i in xlo..=xhi {
            for j in ylo..=yhi {
                sites.push(Site::new(i, j));
            }
        }
        Self {
            xlo,
            xhi,
            ylo,
            yhi,
            sites,
        }
    }

    /// Inclusive bounds `(xlo, xhi, ylo, yhi)`.
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        (self.xlo, self.xhi, self.ylo, self.yhi)
    }

    /// Number of member sites.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// Whether the sector has no members. Decomposition never produces
    /// an empty sector, so this is `false` for any constructed sector.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Member sites in row-major order.
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// The member at ordinal `m`.
    pub fn site(&self, m: usize) -> Site {
        self.sites[m]
    }

    /// Whether `site` lies inside this sector.
    pub fn contains(&self, site: Site) -> bool {
        site.i >= self.xlo && site.i <= self.xhi && site.j >= self.ylo && site.j <= self.yhi
    }

    /// Member ordinal of `site`, or `None` if outside the sector.
    pub fn member_index(&self, site: Site) -> Option<usize> {
        if !self.contains(site) {
            return None;
        }
        let width = (self.yhi - self.ylo + 1) as usize;
        Some((site.i - self.xlo) as usize * width + (site.j - self.ylo) as usize)
    }
}

/// Split an `nx` by `ny` owned lattice into `count` sectors.
///
/// Supported counts: 1 (whole domain), 2 (halves along the x axis), and
/// 4 (quadrants). Returns `Err(LatticeError::InvalidSectorCount)` for
/// any other count and `Err(LatticeError::SectorTooSmall)` when an axis
/// to be split has fewer than two sites.
pub fn decompose(nx: u32, ny: u32, count: u32) -> Result<Vec<Sector>, LatticeError> {
    let nxi = nx as i32;
    let nyi = ny as i32;
    match count {
        1 => Ok(vec![Sector::new(1, nxi, 1, nyi)]),
        2 => {
            if nx < 2 {
                return Err(LatticeError::SectorTooSmall { count, nx, ny });
            }
            let mid = nxi / 2;
            Ok(vec![
                Sector::new(1, mid, 1, nyi),
                Sector::new(mid + 1, nxi, 1, nyi),
            ])
        }
        4 => {
            if nx < 2 || ny < 2 {
                return Err(LatticeError::SectorTooSmall { count, nx, ny });
            }
            let xmid = nxi / 2;
            let ymid = nyi / 2;
            Ok(vec![
                Sector::new(1, xmid, 1, ymid),
                Sector::new(1, xmid, ymid + 1, nyi),
                Sector::new(xmid + 1, nxi, 1, ymid),
                Sector::new(xmid + 1, nxi, ymid + 1, nyi),
            ])
        }
        _ => Err(LatticeError::InvalidSectorCount { count }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn one_sector_covers_everything() {
        let sectors = decompose(4, 5, 1).unwrap();
        assert_eq!(sectors.len(), 1);
        assert_eq!(sectors[0].len(), 20);
        assert_eq!(sectors[0].bounds(), (1, 4, 1, 5));
    }

    #[test]
    fn four_sectors_are_quadrants() {
        let sectors = decompose(4, 4, 4).unwrap();
        assert_eq!(sectors.len(), 4);
        for s in &sectors {
            assert_eq!(s.len(), 4);
        }
        assert_eq!(sectors[0].bounds(), (1, 2, 1, 2));
        assert_eq!(sectors[3].bounds(), (3, 4, 3, 4));
    }

    #[test]
    fn member_index_matches_site_list() {
        let sectors = decompose(6, 6, 4).unwrap();
        for sector in &sectors {
            for (m, site) in sector.sites().iter().enumerate() {
                assert_eq!(sector.member_index(*site), Some(m));
                assert_eq!(sector.site(m), *site);
            }
        }
    }

    #[test]
    fn member_index_outside_is_none() {
        let sectors = decompose(4, 4, 4).unwrap();
        assert_eq!(sectors[0].member_index(Site::new(3, 3)), None);
        assert_eq!(sectors[0].member_index(Site::new(0, 1)), None);
    }

    #[test]
    fn unsupported_count_is_rejected() {
        assert!(matches!(
            decompose(4, 4, 3),
            Err(LatticeError::InvalidSectorCount { count: 3 })
        ));
        assert!(matches!(
            decompose(4, 4, 8),
            Err(LatticeError::InvalidSectorCount { count: 8 })
        ));
    }

    #[test]
    fn too_small_to_split_is_rejected() {
        assert!(matches!(
            decompose(1, 8, 2),
            Err(LatticeError::SectorTooSmall { .. })
        ));
        assert!(matches!(
            decompose(8, 1, 4),
            Err(LatticeError::SectorTooSmall { .. })
        ));
    }

    #[test]
    fn odd_dimensions_still_partition_exactly() {
        let sectors = decompose(5, 7, 4).unwrap();
        let total: usize = sectors.iter().map(Sector::len).sum();
        assert_eq!(total, 35);
    }

    proptest! {
        #[test]
        fn sectors_partition_the_owned_lattice(
            nx in 2u32..20,
            ny in 2u32..20,
            count in prop_oneof![Just(1u32), Just(2), Just(4)],
        ) {
            let sectors = decompose(nx, ny, count).unwrap();
            prop_assert_eq!(sectors.len(), count as usize);

            let mut seen = HashSet::new();
            for sector in &sectors {
                for site in sector.sites() {
                    prop_assert!(seen.insert(*site), "site {} in two sectors", site);
                }
            }
            prop_assert_eq!(seen.len(), (nx * ny) as usize);
            for i in 1..=nx as i32 {
                for j in 1..=ny as i32 {
                    prop_assert!(seen.contains(&Site::new(i, j)));
                }
            }
        }
    }
}
