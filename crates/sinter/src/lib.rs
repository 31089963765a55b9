//! Sinter: a spatially-decomposed kinetic Monte Carlo engine for
//! lattice models.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Sinter sub-crates. For most users, adding `sinter` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use sinter::prelude::*;
//!
//! // An 8x8 two-state lattice, cold (zero temperature), exact
//! // event-driven sweeps over four sectors.
//! let mut lattice = Lattice::new(8, 8).unwrap();
//! let mut rng = SiteRng::seeded(42, 0);
//! lattice.randomize_spins(2, &mut rng);
//!
//! let model = PottsModel::new(2, 0.0).unwrap();
//! let config = SweepConfig {
//!     style: SweepStyle::Kmc,
//!     sectors: 4,
//!     delt: 1.0,
//!     seed: 42,
//! };
//! let mut scheduler = SweepScheduler::new(
//!     lattice,
//!     Box::new(model),
//!     Box::new(PeriodicExchange),
//!     config,
//! )
//! .unwrap();
//!
//! scheduler.run_sweeps(20);
//! assert!(scheduler.time() > 0.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `sinter-core` | Site identifiers and the seeded random source |
//! | [`lattice`] | `sinter-lattice` | Halo-padded storage, ghost exchange, masks, sectors |
//! | [`solve`] | `sinter-solve` | Weighted event selection |
//! | [`model`] | `sinter-model` | Site models and the event-list arena |
//! | [`engine`] | `sinter-engine` | Sweep scheduling, configuration, metrics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Site identifiers and the seeded random source (`sinter-core`).
pub use sinter_core as types;

/// Lattice storage and spatial decomposition (`sinter-lattice`).
///
/// Provides [`lattice::Lattice`], the [`lattice::GhostExchange`] seam
/// with its periodic single-process implementation, the mask grid, and
/// the sector decomposition.
pub use sinter_lattice as lattice;

/// Weighted event selection (`sinter-solve`).
///
/// The [`solve::Selector`] trait and the O(log n)
/// [`solve::SumTreeSelector`].
pub use sinter_solve as solve;

/// Site models (`sinter-model`).
///
/// The [`model::SiteModel`] capability and its variants:
/// [`model::PottsModel`], [`model::PinnedPottsModel`], and
/// [`model::ReactionModel`].
pub use sinter_model as model;

/// Sweep scheduling (`sinter-engine`).
///
/// [`engine::SweepScheduler`] drives sectors with a configured
/// [`engine::SweepStyle`] and accounts simulated time.
pub use sinter_engine as engine;

/// Common imports for typical Sinter usage.
///
/// ```rust
/// use sinter::prelude::*;
/// ```
pub mod prelude {
    // Core identifiers and randomness
    pub use sinter_core::{Site, SiteKind, SiteRng, Spin};

    // Lattice
    pub use sinter_lattice::{GhostExchange, Lattice, LatticeError, PeriodicExchange};

    // Selection
    pub use sinter_solve::{Selector, SumTreeSelector};

    // Models
    pub use sinter_model::{
        ModelError, PickMode, PinnedPottsModel, PottsModel, ReactionModel, ReactionTable,
        SiteModel, UpdateScope,
    };

    // Engine
    pub use sinter_engine::{ConfigError, SweepConfig, SweepMetrics, SweepScheduler, SweepStyle};
}
