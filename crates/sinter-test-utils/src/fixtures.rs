//! Reusable lattice and model fixtures.
//!
//! Small canned inputs shared by the engine's unit and integration
//! tests: seeded random lattices, uniform (frozen) lattices, and a
//! minimal two-species reaction table.

use sinter_core::{SiteRng, Spin};
use sinter_lattice::{GhostExchange, Lattice, PeriodicExchange};
use sinter_model::{DoubleReaction, ReactionTable, SingleReaction};

/// An `n` by `n` lattice with seeded uniform random spins in
/// `[0, n_states)` and a primed periodic halo.
pub fn random_lattice(n: u32, n_states: u32, seed: u64) -> Lattice {
    let mut lattice = Lattice::new(n, n).expect("fixture dimensions are valid");
    let mut rng = SiteRng::seeded(seed, 0);
    lattice.randomize_spins(n_states, &mut rng);
    PeriodicExchange.exchange(&mut lattice);
    lattice
}

/// An `n` by `n` lattice with every owned site at `spin` and a primed
/// periodic halo. Frozen under any energy-driven model.
pub fn uniform_lattice(n: u32, spin: Spin) -> Lattice {
    let mut lattice = Lattice::new(n, n).expect("fixture dimensions are valid");
    for site in lattice.owned_sites().collect::<Vec<_>>() {
        lattice.set_spin(site, spin);
    }
    PeriodicExchange.exchange(&mut lattice);
    lattice
}

/// A minimal two-species table: `A -> B` everywhere, plus an `A + B ->
/// B + A` exchange with a stencil neighbor.
pub fn two_species_table() -> ReactionTable {
    ReactionTable {
        n_species: 2,
        singles: vec![SingleReaction {
            kind: 0,
            input: 0,
            output: 1,
            rate: 1.0,
        }],
        doubles: vec![DoubleReaction {
            kinds: [0, 0],
            inputs: [0, 1],
            outputs: [1, 0],
            rate: 0.5,
        }],
        triples: Vec::new(),
    }
}
