//! The sector sweep scheduler.
//!
//! One sweep processes every sector in order, then synchronizes the
//! ghost halo and advances simulated time. Sector processing is
//! strictly sequential within a process; the only blocking point is
//! the ghost exchange between sweeps. Termination (sweep count or time
//! budget) is checked once per completed sweep, never mid-sector, so a
//! sector always runs to completion with its mask and propensity
//! invariants intact.

use crate::config::{ConfigError, SweepConfig, SweepStyle};
use crate::metrics::SweepMetrics;
use sinter_core::{Site, SiteRng};
use sinter_lattice::{decompose, GhostExchange, Lattice, MaskGrid, Sector};
use sinter_model::{PickMode, SiteModel, UpdateScope};
use sinter_solve::{Selector, SumTreeSelector};
use smallvec::SmallVec;

/// Guard against `ln(0)` in exponential waiting-time draws.
const MIN_UNIFORM: f64 = 1e-300;

/// Runtime state attached to one sector.
struct SectorRuntime {
    sector: Sector,
    /// Current propensity per member, mirrored into `selector`.
    propensity: Vec<f64>,
    selector: SumTreeSelector,
}

impl SectorRuntime {
    fn new(sector: Sector) -> Self {
        let n = sector.len();
        Self {
            sector,
            propensity: vec![0.0; n],
            selector: SumTreeSelector::new(n),
        }
    }

    fn scope(&self, full_domain: bool) -> UpdateScope {
        if full_domain {
            UpdateScope::FullDomain
        } else {
            let (xlo, xhi, ylo, yhi) = self.sector.bounds();
            UpdateScope::Sector { xlo, xhi, ylo, yhi }
        }
    }
}

/// Drives sweeps of a site model over a sector-decomposed lattice.
///
/// # Examples
///
/// ```
/// use sinter_engine::{SweepConfig, SweepScheduler, SweepStyle};
/// use sinter_lattice::{Lattice, PeriodicExchange};
/// use sinter_model::PottsModel;
/// use sinter_core::SiteRng;
///
/// let mut lattice = Lattice::new(8, 8).unwrap();
/// let mut rng = SiteRng::seeded(1, 0);
/// lattice.randomize_spins(4, &mut rng);
///
/// let model = PottsModel::new(4, 0.0).unwrap();
/// let config = SweepConfig { style: SweepStyle::Kmc, ..Default::default() };
/// let mut scheduler = SweepScheduler::new(
///     lattice,
///     Box::new(model),
///     Box::new(PeriodicExchange),
///     config,
/// ).unwrap();
///
/// scheduler.run_sweeps(10);
/// assert!(scheduler.time() > 0.0);
/// ```
pub struct SweepScheduler {
    lattice: Lattice,
    model: Box<dyn SiteModel>,
    comm: Box<dyn GhostExchange>,
    style: SweepStyle,
    delt: f64,
    /// One process owns the whole periodic domain: ghost aliases are
    /// refreshed in place instead of via the exchange.
    full_domain: bool,
    sectors: Vec<SectorRuntime>,
    mask: MaskGrid,
    rng: SiteRng,
    /// Per-site streams, indexed by owned ordinal. Strict style only.
    site_streams: Vec<SiteRng>,
    /// Pass stamp of the last perturbation per owned ordinal.
    perturbed: Vec<u64>,
    pass_stamp: u64,
    time: f64,
    metrics: SweepMetrics,
}

impl SweepScheduler {
    /// Assemble a scheduler.
    ///
    /// Validates the configuration, decomposes the lattice into
    /// sectors, runs the model's one-time site-configuration hook, and
    /// primes the ghost halo. Any configuration fault aborts before
    /// state is touched.
    pub fn new(
        mut lattice: Lattice,
        mut model: Box<dyn SiteModel>,
        mut comm: Box<dyn GhostExchange>,
        config: SweepConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let sectors: Vec<SectorRuntime> = decompose(lattice.nx(), lattice.ny(), config.sectors)?
            .into_iter()
            .map(SectorRuntime::new)
            .collect();
        let full_domain = sectors.len() == 1;

        let mut rng = SiteRng::seeded(config.seed, 0);
        model.configure_sites(&mut lattice, &mut rng);
        comm.exchange(&mut lattice);

        let n_owned = lattice.owned_count();
        let site_streams = if config.style == SweepStyle::Strict {
            (0..n_owned)
                .map(|ord| SiteRng::seeded(config.seed, ord as u64 + 1))
                .collect()
        } else {
            Vec::new()
        };

        let mask = MaskGrid::new(lattice.nx(), lattice.ny());
        Ok(Self {
            lattice,
            model,
            comm,
            style: config.style,
            delt: config.delt,
            full_domain,
            sectors,
            mask,
            rng,
            site_streams,
            perturbed: vec![0; n_owned],
            pass_stamp: 0,
            time: 0.0,
            metrics: SweepMetrics::default(),
        })
    }

    /// Simulated time elapsed so far.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The lattice, for inspection and snapshotting.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Counters accumulated so far.
    pub fn metrics(&self) -> &SweepMetrics {
        &self.metrics
    }

    /// Number of sectors in the decomposition.
    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    /// Sum of the model's local energy over all owned sites.
    pub fn total_energy(&self) -> f64 {
        self.lattice
            .owned_sites()
            .map(|s| self.model.energy(&self.lattice, s))
            .sum()
    }

    /// Run exactly `n` sweeps.
    pub fn run_sweeps(&mut self, n: u64) {
        for _ in 0..n {
            self.sweep();
        }
    }

    /// Sweep until simulated time reaches `t_stop`.
    ///
    /// The budget is checked between sweeps only; the final sweep may
    /// overshoot it.
    pub fn run_until(&mut self, t_stop: f64) {
        while self.time < t_stop {
            self.sweep();
        }
    }

    /// One full pass over all sectors plus the ghost synchronization.
    pub fn sweep(&mut self) {
        for k in 0..self.sectors.len() {
            match self.style {
                SweepStyle::Plain => self.sweep_sector_plain(k),
                SweepStyle::Masked => self.sweep_sector_masked(k, PickMode::Random),
                SweepStyle::MaskedLocal => self.sweep_sector_masked(k, PickMode::Local),
                SweepStyle::Strict => self.sweep_sector_strict(k),
                SweepStyle::Kmc => self.sweep_sector_kmc(k),
            }
        }
        self.comm.exchange(&mut self.lattice);

        // Rejection styles advance one Monte Carlo step per sweep; the
        // exact style advances by the per-sector budget, frozen sectors
        // included.
        self.time += match self.style {
            SweepStyle::Kmc => self.delt,
            _ => 1.0,
        };
        self.metrics.sweeps += 1;
    }

    /// Maximum absolute difference between stored sector propensities
    /// and values recomputed from the current lattice.
    ///
    /// Meaningful between sweeps on a full-domain run, where the stored
    /// tables must match a from-scratch recomputation exactly. Only the
    /// exact style maintains the tables.
    pub fn propensity_drift(&mut self) -> f64 {
        let Self {
            sectors,
            lattice,
            model,
            full_domain,
            ..
        } = self;
        let mut drift: f64 = 0.0;
        for rt in sectors.iter() {
            for (m, &stored) in rt.propensity.iter().enumerate() {
                let fresh = model.propensity(lattice, rt.sector.site(m), *full_domain);
                drift = drift.max((stored - fresh).abs());
            }
        }
        drift
    }

    // ── Rejection styles ────────────────────────────────────────

    fn sweep_sector_plain(&mut self, k: usize) {
        for m in 0..self.sectors[k].sector.len() {
            let site = self.sectors[k].sector.site(m);
            if self.full_domain {
                self.lattice.update_ghosts_at(site);
            }
            let u_pick = self.rng.uniform();
            let u_accept = self.rng.uniform();
            let accepted =
                self.model
                    .event_rejection(&mut self.lattice, site, u_pick, u_accept, PickMode::Random);
            self.metrics.proposals += 1;
            if accepted {
                self.metrics.accepted += 1;
            }
        }
    }

    fn sweep_sector_masked(&mut self, k: usize, pick: PickMode) {
        let limit = self.model.mask_limit();
        for m in 0..self.sectors[k].sector.len() {
            let site = self.sectors[k].sector.site(m);
            if self.mask.is_set(site) {
                self.metrics.masked_skips += 1;
                continue;
            }
            if self.full_domain {
                self.lattice.update_ghosts_at(site);
            }
            if self.model.energy(&self.lattice, site) <= limit {
                self.mask.set(site);
                continue;
            }
            let u_pick = self.rng.uniform();
            let u_accept = self.rng.uniform();
            let accepted = self
                .model
                .event_rejection(&mut self.lattice, site, u_pick, u_accept, pick);
            self.metrics.proposals += 1;
            if accepted {
                self.metrics.accepted += 1;
                self.mask.clear_stencil(site);
            }
        }
    }

    fn sweep_sector_strict(&mut self, k: usize) {
        let limit = self.model.mask_limit();
        // Checkerboard passes: same-color sites are never stencil
        // neighbors, so results within a pass cannot depend on visit
        // order. Each site draws from its own stream, and draws happen
        // unconditionally so every site consumes the same count per
        // sweep whatever the masks say.
        for color in 0..2i32 {
            self.pass_stamp += 1;
            for m in 0..self.sectors[k].sector.len() {
                let site = self.sectors[k].sector.site(m);
                if (site.i + site.j) & 1 != color {
                    continue;
                }
                let ord = self.lattice.ordinal(site);
                let u_pick = self.site_streams[ord].uniform();
                let u_accept = self.site_streams[ord].uniform();

                if self.mask.is_set(site) {
                    self.metrics.masked_skips += 1;
                    continue;
                }
                if self.full_domain {
                    self.lattice.update_ghosts_at(site);
                }
                if self.model.energy(&self.lattice, site) <= limit {
                    self.mask.set(site);
                    continue;
                }
                if self.neighborhood_perturbed_this_pass(site) {
                    self.metrics.strict_discards += 1;
                    continue;
                }

                let accepted = self.model.event_rejection(
                    &mut self.lattice,
                    site,
                    u_pick,
                    u_accept,
                    PickMode::Random,
                );
                self.metrics.proposals += 1;
                if accepted {
                    self.metrics.accepted += 1;
                    self.mask.clear_stencil(site);
                    self.stamp_neighborhood(site);
                }
            }
        }
    }

    fn neighborhood_perturbed_this_pass(&self, site: Site) -> bool {
        site.stencil().iter().any(|n| {
            self.resolve_owned(*n)
                .map(|owned| self.perturbed[self.lattice.ordinal(owned)] == self.pass_stamp)
                .unwrap_or(false)
        })
    }

    fn stamp_neighborhood(&mut self, site: Site) {
        let stamp = self.pass_stamp;
        let ord = self.lattice.ordinal(site);
        self.perturbed[ord] = stamp;
        for n in site.stencil() {
            if let Some(owned) = self.resolve_owned(n) {
                let ord = self.lattice.ordinal(owned);
                self.perturbed[ord] = stamp;
            }
        }
    }

    fn resolve_owned(&self, site: Site) -> Option<Site> {
        if self.lattice.is_owned(site) {
            Some(site)
        } else if self.full_domain {
            Some(self.lattice.wrap_owned(site))
        } else {
            None
        }
    }

    // ── Exact event-driven style ────────────────────────────────

    fn sweep_sector_kmc(&mut self, k: usize) {
        let Self {
            sectors,
            lattice,
            model,
            rng,
            metrics,
            full_domain,
            delt,
            ..
        } = self;
        let rt = &mut sectors[k];
        let full = *full_domain;
        let scope = rt.scope(full);

        // Refresh the whole sector: neighboring sectors and the halo
        // have moved since this sector last ran.
        for m in 0..rt.sector.len() {
            rt.propensity[m] = model.propensity(lattice, rt.sector.site(m), full);
        }
        rt.selector.fill(&rt.propensity);

        let mut local_time = 0.0;
        loop {
            let total = rt.selector.total();
            if total <= 0.0 {
                // Physically frozen: nothing can fire here until a
                // neighboring sector perturbs the boundary.
                metrics.frozen_sectors += 1;
                break;
            }

            let m = rt
                .selector
                .sample(rng.uniform())
                .expect("positive total propensity must yield a site");
            let site = rt.sector.site(m);
            // The draw must stay off exact zero: a zero threshold would
            // commit the first surveyed candidate even when its
            // contribution is zero (e.g. uphill at T = 0).
            let threshold = rng.uniform().max(MIN_UNIFORM) * rt.propensity[m];
            let dt = -rng.uniform().max(MIN_UNIFORM).ln() / total;

            let affected = model.apply_event(lattice, site, threshold, scope);
            metrics.events += 1;

            let mut touched: SmallVec<[usize; 8]> = SmallVec::new();
            for s in affected {
                if let Some(mi) = rt.sector.member_index(s) {
                    rt.propensity[mi] = model.propensity(lattice, s, full);
                    touched.push(mi);
                }
            }
            rt.selector.update(&touched, &rt.propensity);

            local_time += dt;
            if local_time >= *delt {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sinter_lattice::PeriodicExchange;
    use sinter_model::PottsModel;

    fn scheduler(style: SweepStyle, sectors: u32, seed: u64) -> SweepScheduler {
        let mut lattice = Lattice::new(8, 8).unwrap();
        let mut rng = SiteRng::seeded(seed, 0);
        lattice.randomize_spins(4, &mut rng);
        let model = PottsModel::new(4, 0.0).unwrap();
        SweepScheduler::new(
            lattice,
            Box::new(model),
            Box::new(PeriodicExchange),
            SweepConfig {
                style,
                sectors,
                delt: 1.0,
                seed,
            },
        )
        .unwrap()
    }

    #[test]
    fn rejection_sweep_advances_one_step() {
        let mut s = scheduler(SweepStyle::Plain, 1, 7);
        s.run_sweeps(3);
        assert_eq!(s.time(), 3.0);
        assert_eq!(s.metrics().sweeps, 3);
        assert_eq!(s.metrics().proposals, 3 * 64);
    }

    #[test]
    fn kmc_sweep_advances_by_budget() {
        let mut s = scheduler(SweepStyle::Kmc, 4, 7);
        s.run_sweeps(2);
        assert_eq!(s.time(), 2.0);
    }

    #[test]
    fn run_until_overshoots_by_at_most_one_sweep() {
        let mut s = scheduler(SweepStyle::Plain, 1, 7);
        s.run_until(2.5);
        assert_eq!(s.time(), 3.0);
    }

    #[test]
    fn zero_temperature_never_raises_total_energy() {
        let mut s = scheduler(SweepStyle::Plain, 1, 11);
        let mut prev = s.total_energy();
        for _ in 0..5 {
            s.sweep();
            let now = s.total_energy();
            assert!(now <= prev, "energy rose from {prev} to {now} at T = 0");
            prev = now;
        }
    }

    #[test]
    fn masked_style_skips_stable_interior() {
        // A uniform lattice is entirely stable: the first sweep masks
        // every site, the second skips them all.
        let mut lattice = Lattice::new(6, 6).unwrap();
        for site in lattice.owned_sites().collect::<Vec<_>>() {
            lattice.set_spin(site, 1);
        }
        let model = PottsModel::new(3, 0.0).unwrap();
        let mut s = SweepScheduler::new(
            lattice,
            Box::new(model),
            Box::new(PeriodicExchange),
            SweepConfig {
                style: SweepStyle::Masked,
                sectors: 1,
                delt: 1.0,
                seed: 3,
            },
        )
        .unwrap();
        s.run_sweeps(2);
        assert_eq!(s.metrics().proposals, 0);
        assert_eq!(s.metrics().masked_skips, 36);
    }

    #[test]
    fn frozen_sector_is_not_an_error() {
        let mut lattice = Lattice::new(4, 4).unwrap();
        for site in lattice.owned_sites().collect::<Vec<_>>() {
            lattice.set_spin(site, 0);
        }
        let model = PottsModel::new(2, 0.0).unwrap();
        let mut s = SweepScheduler::new(
            lattice,
            Box::new(model),
            Box::new(PeriodicExchange),
            SweepConfig {
                style: SweepStyle::Kmc,
                sectors: 1,
                delt: 1.0,
                seed: 3,
            },
        )
        .unwrap();
        s.run_sweeps(1);
        assert_eq!(s.metrics().events, 0);
        assert_eq!(s.metrics().frozen_sectors, 1);
        assert_eq!(s.time(), 1.0);
    }

    #[test]
    fn strict_style_consumes_site_streams() {
        let mut s = scheduler(SweepStyle::Strict, 4, 13);
        s.run_sweeps(4);
        assert_eq!(s.metrics().sweeps, 4);
    }

    #[test]
    fn invalid_budget_rejected_at_assembly() {
        let lattice = Lattice::new(4, 4).unwrap();
        let model = PottsModel::new(2, 0.0).unwrap();
        let err = SweepScheduler::new(
            lattice,
            Box::new(model),
            Box::new(PeriodicExchange),
            SweepConfig {
                delt: 0.0,
                ..Default::default()
            },
        )
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::InvalidTimeBudget { .. }));
    }

    #[test]
    fn sector_decomposition_errors_surface_as_config_errors() {
        let lattice = Lattice::new(1, 8).unwrap();
        let model = PottsModel::new(2, 0.0).unwrap();
        let err = SweepScheduler::new(
            lattice,
            Box::new(model),
            Box::new(PeriodicExchange),
            SweepConfig {
                sectors: 4,
                ..Default::default()
            },
        )
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::Lattice(_)));
    }
}
