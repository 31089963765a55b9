//! Sweep configuration, validation, and error types.

use std::error::Error;
use std::fmt;

use sinter_lattice::LatticeError;
use sinter_model::ModelError;

/// How sites are updated within a sector. Mutually exclusive per run,
/// resolved once at setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SweepStyle {
    /// Visit every sector site once, always proposing a rejection-
    /// sampling event with a uniformly drawn candidate.
    Plain,
    /// As `Plain`, but skip sites masked as locally stable and mask
    /// newly stable ones.
    Masked,
    /// As `Masked`, with candidates drawn from a stencil neighbor's
    /// current state instead of the full alphabet.
    MaskedLocal,
    /// As `Masked`, with per-site random streams, checkerboard color
    /// ordering, and discarding of picks whose neighborhood was
    /// perturbed earlier in the same pass. Trajectories are independent
    /// of visit order within a sector.
    Strict,
    /// Exact event-driven selection: one weighted selector per sector,
    /// continuous-time advance, per-sweep time budget.
    Kmc,
}

/// Configuration for a [`SweepScheduler`](crate::SweepScheduler).
#[derive(Clone, Debug)]
pub struct SweepConfig {
    /// Update style for every sector.
    pub style: SweepStyle,
    /// Number of sectors: 1, 2, or 4.
    pub sectors: u32,
    /// Per-sector simulated-time budget per sweep, used by
    /// [`SweepStyle::Kmc`]. Must be finite and positive.
    pub delt: f64,
    /// Base seed for every random stream in the run.
    pub seed: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            style: SweepStyle::Plain,
            sectors: 1,
            delt: 1.0,
            seed: 0,
        }
    }
}

impl SweepConfig {
    /// Check structural invariants that do not depend on the lattice.
    ///
    /// Sector-count compatibility with the lattice dimensions is
    /// checked by the decomposition itself at scheduler construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.delt.is_finite() || self.delt <= 0.0 {
            return Err(ConfigError::InvalidTimeBudget { value: self.delt });
        }
        Ok(())
    }
}

/// Errors detected while assembling a scheduler.
///
/// Configuration faults are fatal before any state mutates: a run
/// either starts whole or not at all.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Lattice construction or sector decomposition failed.
    Lattice(LatticeError),
    /// Model construction failed.
    Model(ModelError),
    /// The per-sweep time budget is NaN, infinite, zero, or negative.
    InvalidTimeBudget {
        /// The offending value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lattice(e) => write!(f, "lattice: {e}"),
            Self::Model(e) => write!(f, "model: {e}"),
            Self::InvalidTimeBudget { value } => {
                write!(f, "time budget must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Lattice(e) => Some(e),
            Self::Model(e) => Some(e),
            Self::InvalidTimeBudget { .. } => None,
        }
    }
}

impl From<LatticeError> for ConfigError {
    fn from(e: LatticeError) -> Self {
        Self::Lattice(e)
    }
}

impl From<ModelError> for ConfigError {
    fn from(e: ModelError) -> Self {
        Self::Model(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(SweepConfig::default().validate().is_ok());
    }

    #[test]
    fn bad_time_budget_is_rejected() {
        for delt in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = SweepConfig {
                delt,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidTimeBudget { .. })
            ));
        }
    }

    #[test]
    fn error_wrapping_preserves_source() {
        let err = ConfigError::from(LatticeError::EmptyLattice);
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "lattice: lattice has a zero dimension");
    }
}
