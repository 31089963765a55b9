//! Pinned-site variant of the spin-flip model.

use crate::error::ModelError;
use crate::model::{AffectedSites, PickMode, SiteModel, UpdateScope};
use crate::potts::PottsModel;
use sinter_core::{Site, SiteRng, Spin};
use sinter_lattice::Lattice;
use smallvec::SmallVec;

/// A spin-flip model where a random fraction of sites is frozen.
///
/// Pinned sites carry the reserved spin value one past the alphabet.
/// They never flip, are never offered as flip candidates, and have zero
/// propensity, but they still count as differing neighbors in every
/// energy sum — grain boundaries drag on them, which is the point of
/// the variant.
///
/// Pin placement happens once, through the [`SiteModel::configure_sites`]
/// hook, after lattice initialization.
#[derive(Clone, Debug)]
pub struct PinnedPottsModel {
    inner: PottsModel,
    pin_fraction: f64,
}

impl PinnedPottsModel {
    /// Create a model with `n_states` mobile spins at `temperature`,
    /// pinning each site independently with probability `pin_fraction`.
    pub fn new(n_states: u32, temperature: f64, pin_fraction: f64) -> Result<Self, ModelError> {
        if !pin_fraction.is_finite() || !(0.0..1.0).contains(&pin_fraction) {
            return Err(ModelError::InvalidPinFraction {
                value: pin_fraction,
            });
        }
        Ok(Self {
            inner: PottsModel::new(n_states, temperature)?,
            pin_fraction,
        })
    }

    /// The reserved spin marking a pinned site.
    pub fn pin_spin(&self) -> Spin {
        self.inner.n_states()
    }

    /// Whether `site` is pinned.
    pub fn is_pinned(&self, lattice: &Lattice, site: Site) -> bool {
        lattice.spin(site) == self.pin_spin()
    }

    /// Distinct mobile candidate spins among `site`'s differing
    /// neighbors: the pin spin never qualifies.
    fn survey_mobile(&self, lattice: &Lattice, site: Site) -> SmallVec<[Spin; 4]> {
        let own = lattice.spin(site);
        let pin = self.pin_spin();
        let mut out = SmallVec::new();
        for n in site.stencil() {
            let spin = lattice.spin(n);
            if spin == own || spin == pin || out.contains(&spin) {
                continue;
            }
            out.push(spin);
        }
        out
    }
}

impl SiteModel for PinnedPottsModel {
    fn name(&self) -> &str {
        "potts/pin"
    }

    fn n_states(&self) -> u32 {
        self.inner.n_states()
    }

    fn energy(&self, lattice: &Lattice, site: Site) -> f64 {
        self.inner.energy(lattice, site)
    }

    fn propensity(&mut self, lattice: &mut Lattice, site: Site, full_domain: bool) -> f64 {
        if full_domain {
            lattice.update_ghosts_at(site);
        }
        if self.is_pinned(lattice, site) {
            return 0.0;
        }
        let einitial = self.energy(lattice, site);
        let mut prob = 0.0;
        for candidate in self.survey_mobile(lattice, site) {
            let efinal = PottsModel::energy_if(lattice, site, candidate);
            prob += self.inner.contribution(einitial, efinal);
        }
        prob
    }

    fn apply_event(
        &mut self,
        lattice: &mut Lattice,
        site: Site,
        threshold: f64,
        scope: UpdateScope,
    ) -> AffectedSites {
        debug_assert!(
            !self.is_pinned(lattice, site),
            "event scheduled at pinned site {site}"
        );
        let einitial = self.energy(lattice, site);
        let survey = self.survey_mobile(lattice, site);

        let mut running = 0.0;
        let mut committed = false;
        for candidate in survey {
            let efinal = PottsModel::energy_if(lattice, site, candidate);
            running += self.inner.contribution(einitial, efinal);
            lattice.set_spin(site, candidate);
            if running >= threshold {
                committed = true;
                break;
            }
        }
        debug_assert!(
            committed,
            "event threshold {threshold} exceeds surveyed propensity {running} at {site}; \
             the stored propensity was stale"
        );

        let mut affected = AffectedSites::new();
        affected.push(site);
        for n in site.stencil() {
            if let Some(owned) = scope.resolve(lattice, n) {
                affected.push(owned);
            }
        }
        affected
    }

    fn event_rejection(
        &mut self,
        lattice: &mut Lattice,
        site: Site,
        u_pick: f64,
        u_accept: f64,
        pick: PickMode,
    ) -> bool {
        if self.is_pinned(lattice, site) {
            return false;
        }
        if pick == PickMode::Local {
            let stencil = site.stencil();
            let idx = ((u_pick * 4.0) as usize).min(3);
            if lattice.spin(stencil[idx]) == self.pin_spin() {
                return false;
            }
        }
        // Random picks draw from [0, n_states) and can never produce
        // the reserved spin.
        self.inner
            .event_rejection(lattice, site, u_pick, u_accept, pick)
    }

    fn mask_limit(&self) -> f64 {
        self.inner.mask_limit()
    }

    fn configure_sites(&mut self, lattice: &mut Lattice, rng: &mut SiteRng) {
        let pin = self.pin_spin();
        for site in lattice.owned_sites().collect::<Vec<_>>() {
            if rng.uniform() < self.pin_fraction {
                lattice.set_spin(site, pin);
            }
        }
    }
}
