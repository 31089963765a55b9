//! Weighted event selection for the Sinter KMC engine.
//!
//! Exact event-driven sweeps need to pick one site with probability
//! proportional to its propensity, then update a handful of propensities
//! and pick again. [`SumTreeSelector`] supports both in O(log n); the
//! [`Selector`] trait is the seam the scheduler depends on, so tests can
//! substitute simpler implementations.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod selector;
pub mod tree;

pub use selector::Selector;
pub use tree::SumTreeSelector;
