//! Energy-driven spin-flip model on the 4-neighbor stencil.

use crate::error::ModelError;
use crate::model::{AffectedSites, PickMode, SiteModel, UpdateScope};
use sinter_core::{Site, Spin};
use sinter_lattice::Lattice;
use smallvec::SmallVec;

/// Distinct candidate spins offered by a site's differing neighbors.
///
/// The multiplicity counts how many neighbors share the candidate value.
/// It only folds repeated neighbor values into one entry; each candidate
/// contributes once to the propensity regardless of multiplicity.
type Survey = SmallVec<[(Spin, u32); 4]>;

/// A q-state spin model where the local energy is the count of stencil
/// neighbors whose spin differs.
///
/// Downhill and neutral flips carry unit rate; uphill flips carry the
/// Boltzmann factor `exp(-ΔE / T)`, and are forbidden outright at zero
/// temperature.
///
/// # Examples
///
/// ```
/// use sinter_model::{PottsModel, SiteModel};
/// use sinter_lattice::Lattice;
/// use sinter_core::Site;
///
/// let model = PottsModel::new(3, 0.0).unwrap();
/// let mut lat = Lattice::new(4, 4).unwrap();
/// lat.set_spin(Site::new(1, 2), 1);
/// // (1,1) has one differing neighbor: energy 1.
/// assert_eq!(model.energy(&lat, Site::new(1, 1)), 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct PottsModel {
    n_states: u32,
    temperature: f64,
    /// Cached `1 / temperature`; meaningless (and unused) at T = 0.
    t_inverse: f64,
}

impl PottsModel {
    /// Smallest usable alphabet: a single state admits no events.
    pub const MIN_STATES: u32 = 2;
    /// Largest accepted alphabet.
    pub const MAX_STATES: u32 = 1 << 24;

    /// Create a model with `n_states` spins at `temperature`.
    ///
    /// Returns `Err(ModelError::StateCountOutOfRange)` or
    /// `Err(ModelError::InvalidTemperature)` on bad configuration.
    pub fn new(n_states: u32, temperature: f64) -> Result<Self, ModelError> {
        if !(Self::MIN_STATES..=Self::MAX_STATES).contains(&n_states) {
            return Err(ModelError::StateCountOutOfRange {
                count: n_states,
                min: Self::MIN_STATES,
                max: Self::MAX_STATES,
            });
        }
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(ModelError::InvalidTemperature { value: temperature });
        }
        let t_inverse = if temperature > 0.0 {
            1.0 / temperature
        } else {
            0.0
        };
        Ok(Self {
            n_states,
            temperature,
            t_inverse,
        })
    }

    /// Configured temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Hypothetical energy of `site` if its spin were `candidate`.
    ///
    /// Recounted over the full stencil for every candidate rather than
    /// patched incrementally; somewhat wasteful, but independent of how
    /// the candidate was found.
    pub(crate) fn energy_if(lattice: &Lattice, site: Site, candidate: Spin) -> f64 {
        let mut eng = 0;
        for n in site.stencil() {
            if lattice.spin(n) != candidate {
                eng += 1;
            }
        }
        f64::from(eng)
    }

    /// Collect the distinct neighbor spins that differ from `site`'s.
    fn survey(lattice: &Lattice, site: Site) -> Survey {
        let own = lattice.spin(site);
        let mut out = Survey::new();
        for n in site.stencil() {
            let spin = lattice.spin(n);
            if spin == own {
                continue;
            }
            match out.iter_mut().find(|(s, _)| *s == spin) {
                Some(entry) => entry.1 += 1,
                None => out.push((spin, 1)),
            }
        }
        out
    }

    /// Rate contribution of flipping from `einitial` to `efinal`.
    pub(crate) fn contribution(&self, einitial: f64, efinal: f64) -> f64 {
        if efinal <= einitial {
            1.0
        } else if self.temperature > 0.0 {
            ((einitial - efinal) * self.t_inverse).exp()
        } else {
            0.0
        }
    }
}

impl SiteModel for PottsModel {
    fn name(&self) -> &str {
        "potts"
    }

    fn n_states(&self) -> u32 {
        self.n_states
    }

    fn energy(&self, lattice: &Lattice, site: Site) -> f64 {
        Self::energy_if(lattice, site, lattice.spin(site))
    }

    fn propensity(&mut self, lattice: &mut Lattice, site: Site, full_domain: bool) -> f64 {
        if full_domain {
            lattice.update_ghosts_at(site);
        }
        let einitial = self.energy(lattice, site);
        let mut prob = 0.0;
        for (candidate, _) in Self::survey(lattice, site) {
            let efinal = Self::energy_if(lattice, site, candidate);
            prob += self.contribution(einitial, efinal);
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
        let einitial = self.energy(lattice, site);
        let survey = Self::survey(lattice, site);

        // Identical enumeration order and arithmetic as the propensity
        // survey, so the running sum reaches `threshold` before the
        // candidates run out.
        let mut running = 0.0;
        let mut committed = false;
        for (candidate, _) in survey {
            let efinal = Self::energy_if(lattice, site, candidate);
            running += self.contribution(einitial, efinal);
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
        let old = lattice.spin(site);
        let candidate = match pick {
            PickMode::Random => {
                let idx = ((u_pick * f64::from(self.n_states)) as u32).min(self.n_states - 1);
                idx as Spin
            }
            PickMode::Local => {
                let stencil = site.stencil();
                let idx = ((u_pick * 4.0) as usize).min(3);
                lattice.spin(stencil[idx])
            }
        };
        if candidate == old {
            return false;
        }

        let einitial = self.energy(lattice, site);
        let efinal = Self::energy_if(lattice, site, candidate);
        let accept = if efinal <= einitial {
            true
        } else if self.temperature > 0.0 {
            u_accept < ((einitial - efinal) * self.t_inverse).exp()
        } else {
            false
        };
        if accept {
            lattice.set_spin(site, candidate);
        }
        accept
    }

    fn mask_limit(&self) -> f64 {
        // Half the stencil: with two or fewer differing neighbors no
        // downhill flip exists, so the site can sit out until perturbed.
        2.0
    }
}
