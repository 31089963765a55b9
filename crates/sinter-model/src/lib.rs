//! Site models for the Sinter KMC engine.
//!
//! A site model is the per-site contract a lattice plugin satisfies:
//! local energy, total event propensity, exact event application, and a
//! rejection-sampling kernel. The sweep scheduler depends only on the
//! [`SiteModel`] capability; the variants here are the energy-driven
//! spin-flip model ([`PottsModel`]), its pinned-site extension
//! ([`PinnedPottsModel`]), and the multi-reaction model
//! ([`ReactionModel`]) with its per-site event-list arena.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod events;
pub mod model;
pub mod pin;
pub mod potts;
pub mod reaction;

pub use error::ModelError;
pub use events::{EventArena, EventRecord};
pub use model::{AffectedSites, PickMode, SiteModel, UpdateScope};
pub use pin::PinnedPottsModel;
pub use potts::PottsModel;
pub use reaction::{
    DoubleReaction, ReactionEvent, ReactionModel, ReactionTable, SingleReaction, TripleReaction,
};
