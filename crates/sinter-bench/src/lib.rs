//! Benchmark profiles for the Sinter KMC engine.
//!
//! Pre-built scheduler configurations shared by the criterion benches:
//!
//! - [`reference_scheduler`]: 64x64 four-state lattice (4K sites)
//! - [`stress_scheduler`]: 256x256 four-state lattice (64K sites)

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use sinter_core::SiteRng;
use sinter_engine::{SweepConfig, SweepScheduler, SweepStyle};
use sinter_lattice::{Lattice, PeriodicExchange};
use sinter_model::PottsModel;

fn scheduler(n: u32, style: SweepStyle, sectors: u32, seed: u64) -> SweepScheduler {
    let mut lattice = Lattice::new(n, n).expect("bench dimensions are valid");
    let mut rng = SiteRng::seeded(seed, 0);
    lattice.randomize_spins(4, &mut rng);
    let model = PottsModel::new(4, 0.5).expect("bench model config is valid");
    SweepScheduler::new(
        lattice,
        Box::new(model),
        Box::new(PeriodicExchange),
        SweepConfig {
            style,
            sectors,
            delt: 1.0,
            seed,
        },
    )
    .expect("bench scheduler config is valid")
}

/// Reference profile: 64x64 four-state lattice (4K sites) at T = 0.5.
pub fn reference_scheduler(style: SweepStyle, sectors: u32, seed: u64) -> SweepScheduler {
    scheduler(64, style, sectors, seed)
}

/// Stress profile: 256x256 four-state lattice (64K sites) at T = 0.5.
pub fn stress_scheduler(style: SweepStyle, sectors: u32, seed: u64) -> SweepScheduler {
    scheduler(256, style, sectors, seed)
}
