//! Multi-reaction site model with explicit per-site event lists.
//!
//! Each site hosts a species (`spin`) on a fixed site class (`kind`).
//! Reactions consume the species at one, two, or three sites — the site
//! itself plus up to two stencil partners — and are driven by base
//! rates from a configuration-time [`ReactionTable`]. Enumerated events
//! are cached in an [`EventArena`] so the exact-event scheduler can walk
//! a site's options without re-deriving them.

use crate::error::ModelError;
use crate::events::EventArena;
use crate::model::{AffectedSites, PickMode, SiteModel, UpdateScope};
use indexmap::IndexMap;
use sinter_core::{Site, SiteKind, Spin};
use sinter_lattice::Lattice;
use smallvec::SmallVec;

/// One enumerated reaction instance at a specific site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReactionEvent {
    /// Converts the site's own species.
    Single {
        /// Index into the single-reaction table.
        which: u16,
    },
    /// Converts the site's and one neighbor's species.
    Double {
        /// Index into the double-reaction table.
        which: u16,
        /// The participating neighbor.
        partner: Site,
    },
    /// Converts the site's and two distinct neighbors' species.
    Triple {
        /// Index into the triple-reaction table.
        which: u16,
        /// First participating neighbor.
        partner_j: Site,
        /// Second participating neighbor.
        partner_k: Site,
    },
}

impl ReactionEvent {
    /// Filler payload for free arena slots.
    pub(crate) fn placeholder() -> Self {
        Self::Single { which: 0 }
    }
}

/// A one-site reaction: `input -> output` at rate `rate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SingleReaction {
    /// Site class the reaction occurs on.
    pub kind: SiteKind,
    /// Species consumed.
    pub input: Spin,
    /// Species produced.
    pub output: Spin,
    /// Base rate.
    pub rate: f64,
}

/// A two-site reaction over a site and one stencil neighbor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoubleReaction {
    /// Site classes of (site, neighbor).
    pub kinds: [SiteKind; 2],
    /// Species consumed at (site, neighbor).
    pub inputs: [Spin; 2],
    /// Species produced at (site, neighbor).
    pub outputs: [Spin; 2],
    /// Base rate.
    pub rate: f64,
}

/// A three-site reaction over a site and two distinct stencil neighbors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TripleReaction {
    /// Site classes of (site, neighbor j, neighbor k).
    pub kinds: [SiteKind; 3],
    /// Species consumed at (site, j, k).
    pub inputs: [Spin; 3],
    /// Species produced at (site, j, k).
    pub outputs: [Spin; 3],
    /// Base rate.
    pub rate: f64,
}

/// Configuration-time reaction tables.
///
/// Supplied whole at model construction and validated eagerly; the
/// model never mutates it.
#[derive(Clone, Debug, Default)]
pub struct ReactionTable {
    /// Number of species; every input/output must be below this.
    pub n_species: u32,
    /// One-site reactions.
    pub singles: Vec<SingleReaction>,
    /// Two-site reactions.
    pub doubles: Vec<DoubleReaction>,
    /// Three-site reactions.
    pub triples: Vec<TripleReaction>,
}

impl ReactionTable {
    fn check_species(
        which: usize,
        state: Spin,
        n_species: u32,
    ) -> Result<(), ModelError> {
        if state >= n_species {
            return Err(ModelError::StateOutOfRange {
                which,
                state,
                n_species,
            });
        }
        Ok(())
    }

    fn check_rate(which: usize, rate: f64) -> Result<(), ModelError> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(ModelError::InvalidRate { which, rate });
        }
        Ok(())
    }

    /// Validate the whole table.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.singles.is_empty() && self.doubles.is_empty() && self.triples.is_empty() {
            return Err(ModelError::EmptyReactionTable);
        }
        for (which, rx) in self.singles.iter().enumerate() {
            Self::check_rate(which, rx.rate)?;
            Self::check_species(which, rx.input, self.n_species)?;
            Self::check_species(which, rx.output, self.n_species)?;
        }
        for (which, rx) in self.doubles.iter().enumerate() {
            Self::check_rate(which, rx.rate)?;
            for m in 0..2 {
                Self::check_species(which, rx.inputs[m], self.n_species)?;
                Self::check_species(which, rx.outputs[m], self.n_species)?;
            }
        }
        for (which, rx) in self.triples.iter().enumerate() {
            Self::check_rate(which, rx.rate)?;
            for m in 0..3 {
                Self::check_species(which, rx.inputs[m], self.n_species)?;
                Self::check_species(which, rx.outputs[m], self.n_species)?;
            }
        }
        Ok(())
    }
}

/// Reaction indices bucketed by the I-site's `(kind, species)` pair.
type SiteBuckets = IndexMap<(SiteKind, Spin), SmallVec<[u16; 4]>>;

/// The multi-reaction site model.
///
/// Propensity enumeration rebuilds the site's event list from scratch:
/// clear, then one `add` per matching reaction instance, in table order
/// (singles, then doubles per stencil neighbor, then triples per
/// ordered neighbor pair). The identical order is what makes the
/// threshold walk in [`SiteModel::apply_event`] land on the same event
/// the stored propensity promised.
#[derive(Clone, Debug)]
pub struct ReactionModel {
    table: ReactionTable,
    singles_by_site: SiteBuckets,
    doubles_by_site: SiteBuckets,
    triples_by_site: SiteBuckets,
    arena: EventArena,
}

impl ReactionModel {
    /// Create a model for `n_sites` owned sites from a validated table.
    pub fn new(table: ReactionTable, n_sites: usize) -> Result<Self, ModelError> {
        table.validate()?;
        assert!(
            table.singles.len() <= u16::MAX as usize
                && table.doubles.len() <= u16::MAX as usize
                && table.triples.len() <= u16::MAX as usize,
            "reaction table exceeds u16 index range"
        );

        let mut singles_by_site = SiteBuckets::default();
        for (which, rx) in table.singles.iter().enumerate() {
            singles_by_site
                .entry((rx.kind, rx.input))
                .or_default()
                .push(which as u16);
        }
        let mut doubles_by_site = SiteBuckets::default();
        for (which, rx) in table.doubles.iter().enumerate() {
            doubles_by_site
                .entry((rx.kinds[0], rx.inputs[0]))
                .or_default()
                .push(which as u16);
        }
        let mut triples_by_site = SiteBuckets::default();
        for (which, rx) in table.triples.iter().enumerate() {
            triples_by_site
                .entry((rx.kinds[0], rx.inputs[0]))
                .or_default()
                .push(which as u16);
        }

        Ok(Self {
            table,
            singles_by_site,
            doubles_by_site,
            triples_by_site,
            arena: EventArena::new(n_sites),
        })
    }

    /// The event arena, for invariant audits.
    pub fn arena(&self) -> &EventArena {
        &self.arena
    }

    /// Re-enumerate `site`'s events into the arena; returns the total.
    fn enumerate(&mut self, lattice: &Lattice, site: Site) -> f64 {
        let ord = lattice.ordinal(site);
        self.arena.clear(ord);

        let own = lattice.state(site);
        let mut total = 0.0;

        if let Some(bucket) = self.singles_by_site.get(&(own.kind, own.spin)) {
            for &which in bucket {
                let rate = self.table.singles[which as usize].rate;
                total += self.arena.add(ord, ReactionEvent::Single { which }, rate);
            }
        }

        let stencil = site.stencil();
        if let Some(bucket) = self.doubles_by_site.get(&(own.kind, own.spin)) {
            for n in stencil {
                let ns = lattice.state(n);
                for &which in bucket {
                    let rx = &self.table.doubles[which as usize];
                    if rx.kinds[1] == ns.kind && rx.inputs[1] == ns.spin {
                        total += self.arena.add(
                            ord,
                            ReactionEvent::Double { which, partner: n },
                            rx.rate,
                        );
                    }
                }
            }
        }

        if let Some(bucket) = self.triples_by_site.get(&(own.kind, own.spin)) {
            for (a, &j) in stencil.iter().enumerate() {
                for (b, &k) in stencil.iter().enumerate() {
                    if a == b {
                        continue;
                    }
                    let js = lattice.state(j);
                    let ks = lattice.state(k);
                    for &which in bucket {
                        let rx = &self.table.triples[which as usize];
                        if rx.kinds[1] == js.kind
                            && rx.inputs[1] == js.spin
                            && rx.kinds[2] == ks.kind
                            && rx.inputs[2] == ks.spin
                        {
                            total += self.arena.add(
                                ord,
                                ReactionEvent::Triple {
                                    which,
                                    partner_j: j,
                                    partner_k: k,
                                },
                                rx.rate,
                            );
                        }
                    }
                }
            }
        }

        total
    }

    /// Commit one event's outputs to the lattice.
    fn commit(&self, lattice: &mut Lattice, site: Site, event: ReactionEvent, scope: UpdateScope) {
        match event {
            ReactionEvent::Single { which } => {
                lattice.set_spin(site, self.table.singles[which as usize].output);
            }
            ReactionEvent::Double { which, partner } => {
                let rx = &self.table.doubles[which as usize];
                lattice.set_spin(site, rx.outputs[0]);
                let target = Self::commit_target(lattice, partner, scope);
                lattice.set_spin(target, rx.outputs[1]);
            }
            ReactionEvent::Triple {
                which,
                partner_j,
                partner_k,
            } => {
                let rx = &self.table.triples[which as usize];
                lattice.set_spin(site, rx.outputs[0]);
                let tj = Self::commit_target(lattice, partner_j, scope);
                lattice.set_spin(tj, rx.outputs[1]);
                let tk = Self::commit_target(lattice, partner_k, scope);
                lattice.set_spin(tk, rx.outputs[2]);
            }
        }
    }

    /// Where a partner write lands.
    ///
    /// Under full-domain periodicity a halo partner's authoritative copy
    /// is the owned site on the opposite edge. In sector mode the write
    /// goes where it was addressed: a ghost partner is corrected by the
    /// owning process at the next exchange.
    fn commit_target(lattice: &Lattice, partner: Site, scope: UpdateScope) -> Site {
        match scope {
            UpdateScope::FullDomain => lattice.wrap_owned(partner),
            UpdateScope::Sector { .. } => partner,
        }
    }

    fn push_affected(
        lattice: &Lattice,
        scope: UpdateScope,
        center: Site,
        affected: &mut AffectedSites,
    ) {
        let mut push = |s: Site| {
            if let Some(owned) = scope.resolve(lattice, s) {
                if !affected.contains(&owned) {
                    affected.push(owned);
                }
            }
        };
        push(center);
        for n in center.stencil() {
            push(n);
        }
    }
}

impl SiteModel for ReactionModel {
    fn name(&self) -> &str {
        "reaction"
    }

    fn n_states(&self) -> u32 {
        self.table.n_species
    }

    /// Reactions carry no energy notion; every neighborhood is flat.
    fn energy(&self, _lattice: &Lattice, _site: Site) -> f64 {
        0.0
    }

    fn propensity(&mut self, lattice: &mut Lattice, site: Site, full_domain: bool) -> f64 {
        if full_domain {
            lattice.update_ghosts_at(site);
        }
        self.enumerate(lattice, site)
    }

    fn apply_event(
        &mut self,
        lattice: &mut Lattice,
        site: Site,
        threshold: f64,
        scope: UpdateScope,
    ) -> AffectedSites {
        let ord = lattice.ordinal(site);

        let mut running = 0.0;
        let mut chosen = None;
        for record in self.arena.events(ord) {
            running += record.propensity;
            chosen = Some(record.event);
            if running >= threshold {
                break;
            }
        }
        let event = chosen.expect("event scheduled at site with empty event list");
        debug_assert!(
            running >= threshold,
            "event threshold {threshold} exceeds listed propensity {running} at {site}; \
             the stored propensity was stale"
        );

        self.commit(lattice, site, event, scope);

        let mut affected = AffectedSites::new();
        Self::push_affected(lattice, scope, site, &mut affected);
        match event {
            ReactionEvent::Single { .. } => {}
            ReactionEvent::Double { partner, .. } => {
                let target = Self::commit_target(lattice, partner, scope);
                Self::push_affected(lattice, scope, target, &mut affected);
            }
            ReactionEvent::Triple {
                partner_j,
                partner_k,
                ..
            } => {
                let tj = Self::commit_target(lattice, partner_j, scope);
                Self::push_affected(lattice, scope, tj, &mut affected);
                let tk = Self::commit_target(lattice, partner_k, scope);
                Self::push_affected(lattice, scope, tk, &mut affected);
            }
        }
        affected
    }

    /// Rejection sweeps degenerate to one exact pick per visited site:
    /// enumerate, then fire the thresholded event if any exists.
    fn event_rejection(
        &mut self,
        lattice: &mut Lattice,
        site: Site,
        u_pick: f64,
        _u_accept: f64,
        _pick: PickMode,
    ) -> bool {
        let total = self.enumerate(lattice, site);
        if total <= 0.0 {
            return false;
        }
        self.apply_event(lattice, site, u_pick * total, UpdateScope::FullDomain);
        true
    }
}
