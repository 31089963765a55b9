//! Lattice storage and spatial decomposition for the Sinter KMC engine.
//!
//! A process owns one contiguous rectangular partition of the global
//! lattice plus a one-site halo of ghost state. This crate provides the
//! halo-padded site store ([`Lattice`]), the ghost-refresh seam
//! ([`GhostExchange`]) with a single-process periodic implementation,
//! the per-site mask grid ([`MaskGrid`]), and the sector (quadrant)
//! decomposition ([`Sector`]) that the sweep scheduler iterates.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod ghost;
pub mod lattice;
pub mod mask;
pub mod sector;

pub use error::LatticeError;
pub use ghost::{GhostExchange, PeriodicExchange};
pub use lattice::{Lattice, SiteState};
pub use mask::MaskGrid;
pub use sector::{decompose, Sector};
