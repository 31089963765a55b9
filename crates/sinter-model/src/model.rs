//! The [`SiteModel`] capability.

use sinter_core::{Site, SiteRng};
use sinter_lattice::Lattice;
use smallvec::SmallVec;

/// How a rejection-sampling proposal picks the candidate state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickMode {
    /// Uniform over the model's full state alphabet.
    Random,
    /// The current state of a uniformly chosen stencil neighbor.
    Local,
}

/// Which sites an event may report as needing a propensity refresh.
///
/// An event at a boundary site perturbs stencil neighbors that may lie
/// outside the active region. Under `FullDomain` (one process owns the
/// whole periodic lattice) such neighbors wrap back onto owned sites;
/// under `Sector` they belong to an inactive sector or another process
/// and are dropped — their owner refreshes them when its turn comes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateScope {
    /// Single process owns the full periodic domain.
    FullDomain,
    /// Only sites inside the inclusive bounds are refreshable.
    Sector {
        /// Lowest row.
        xlo: i32,
        /// Highest row.
        xhi: i32,
        /// Lowest column.
        ylo: i32,
        /// Highest column.
        yhi: i32,
    },
}

impl UpdateScope {
    /// Map a stencil neighbor to the owned site whose propensity it
    /// perturbs, or `None` when that site is outside the scope.
    pub fn resolve(&self, lattice: &Lattice, site: Site) -> Option<Site> {
        match self {
            Self::FullDomain => Some(lattice.wrap_owned(site)),
            Self::Sector { xlo, xhi, ylo, yhi } => {
                if site.i >= *xlo && site.i <= *xhi && site.j >= *ylo && site.j <= *yhi {
                    Some(site)
                } else {
                    None
                }
            }
        }
    }
}

/// Sites returned by [`SiteModel::apply_event`] for propensity refresh.
pub type AffectedSites = SmallVec<[Site; 8]>;

/// The per-site contract a lattice model satisfies.
///
/// The sweep scheduler is generic over this capability and never names
/// a concrete variant. Implementations keep all their state in the
/// lattice records plus whatever private bookkeeping they need (e.g.
/// the multi-reaction event arena); the scheduler owns the propensity
/// tables and selectors.
///
/// Randomness is supplied by the caller as explicit uniform draws, so a
/// model is a deterministic function of lattice state and draw values.
pub trait SiteModel {
    /// Human-readable model name for diagnostics.
    fn name(&self) -> &str;

    /// Size of the primary state alphabet.
    fn n_states(&self) -> u32;

    /// Local disorder energy of `site`: how many stencil neighbors
    /// differ. Pure; reads owned and ghost state only.
    fn energy(&self, lattice: &Lattice, site: Site) -> f64;

    /// Total propensity of `site` given current neighbor state.
    ///
    /// With `full_domain` set, first refreshes the site's periodic ghost
    /// aliases so the survey reads current values. Never negative, never
    /// NaN; zero means no event can fire here.
    fn propensity(&mut self, lattice: &mut Lattice, site: Site, full_domain: bool) -> f64;

    /// Choose and perform one event at `site`.
    ///
    /// `threshold` is `uniform(0,1) * propensity(site)`, supplied by the
    /// caller. The model re-derives the candidate survey in its fixed
    /// enumeration order, accumulates the same per-candidate
    /// contributions, and commits the first candidate at which the
    /// running sum reaches `threshold`.
    ///
    /// Returns the owned sites whose propensities the event may have
    /// changed (the event site and its perturbed stencil, resolved
    /// through `scope`), so the caller can recompute them and push the
    /// refreshed values into its selector.
    fn apply_event(
        &mut self,
        lattice: &mut Lattice,
        site: Site,
        threshold: f64,
        scope: UpdateScope,
    ) -> AffectedSites;

    /// Propose-and-test one rejection-sampling update at `site`.
    ///
    /// `u_pick` drives the candidate choice, `u_accept` the acceptance
    /// test; both are uniform in `[0, 1)`. Returns whether the site's
    /// state changed.
    fn event_rejection(
        &mut self,
        lattice: &mut Lattice,
        site: Site,
        u_pick: f64,
        u_accept: f64,
        pick: PickMode,
    ) -> bool;

    /// Energy at or below which a site may be masked as locally stable.
    ///
    /// The default disables masking: site energies are never negative,
    /// so no site qualifies.
    fn mask_limit(&self) -> f64 {
        -1.0
    }

    /// One-time mutable site configuration hook, run after lattice
    /// initialization and before the first sweep.
    ///
    /// Default is a no-op; the pinned variant uses it to freeze a
    /// random fraction of sites.
    fn configure_sites(&mut self, lattice: &mut Lattice, rng: &mut SiteRng) {
        let _ = (lattice, rng);
    }
}
