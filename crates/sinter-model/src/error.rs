//! Error types for model configuration.

use std::error::Error;
use std::fmt;

/// Errors detected while constructing a site model.
///
/// All variants are configuration faults: detected eagerly, fatal to
/// the run, never retried.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelError {
    /// The state alphabet is too small or too large.
    StateCountOutOfRange {
        /// The offending count.
        count: u32,
        /// Smallest accepted count.
        min: u32,
        /// Largest accepted count.
        max: u32,
    },
    /// Temperature is NaN, infinite, or negative.
    InvalidTemperature {
        /// The offending value.
        value: f64,
    },
    /// A reaction rate is NaN, infinite, or negative.
    InvalidRate {
        /// Index of the reaction within its class table.
        which: usize,
        /// The offending rate.
        rate: f64,
    },
    /// A reaction references a species outside the configured alphabet.
    StateOutOfRange {
        /// Index of the reaction within its class table.
        which: usize,
        /// The offending species id.
        state: u32,
        /// Number of configured species.
        n_species: u32,
    },
    /// The reaction table has no reactions at all.
    EmptyReactionTable,
    /// The pinned-site fraction is not in `[0, 1)`.
    InvalidPinFraction {
        /// The offending value.
        value: f64,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StateCountOutOfRange { count, min, max } => {
                write!(f, "state count {count} outside [{min}, {max}]")
            }
            Self::InvalidTemperature { value } => {
                write!(f, "temperature must be finite and >= 0, got {value}")
            }
            Self::InvalidRate { which, rate } => {
                write!(f, "reaction {which} has invalid rate {rate}")
            }
            Self::StateOutOfRange {
                which,
                state,
                n_species,
            } => {
                write!(
                    f,
                    "reaction {which} references species {state}, but only {n_species} configured"
                )
            }
            Self::EmptyReactionTable => write!(f, "reaction table is empty"),
            Self::InvalidPinFraction { value } => {
                write!(f, "pin fraction must be in [0, 1), got {value}")
            }
        }
    }
}

impl Error for ModelError {}
