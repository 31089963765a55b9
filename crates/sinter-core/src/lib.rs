//! Core types and the deterministic random source for the Sinter
//! kinetic Monte Carlo engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the site identifier types shared across the workspace and the seeded
//! random source that makes every run bit-reproducible.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod rng;

pub use id::{Site, SiteKind, Spin};
pub use rng::SiteRng;
