//! Test fixtures for Sinter development.

#![forbid(unsafe_code)]

pub mod fixtures;

pub use fixtures::{random_lattice, two_species_table, uniform_lattice};
