//! Error types for lattice construction and decomposition.

use std::error::Error;
use std::fmt;

/// Errors detected while building a lattice or its sector decomposition.
///
/// All of these are configuration errors: they are reported eagerly at
/// construction time and abort the run before any state is mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LatticeError {
    /// A lattice dimension is zero.
    EmptyLattice,
    /// A lattice dimension exceeds the addressable maximum.
    DimensionTooLarge {
        /// Which dimension ("nx" or "ny").
        name: &'static str,
        /// The offending value.
        value: u32,
        /// The maximum supported value.
        max: u32,
    },
    /// The requested sector count is not 1, 2, or 4.
    InvalidSectorCount {
        /// The offending count.
        count: u32,
    },
    /// The lattice is too small to be split into the requested sectors.
    SectorTooSmall {
        /// The requested sector count.
        count: u32,
        /// Owned rows.
        nx: u32,
        /// Owned columns.
        ny: u32,
    },
}

impl fmt::Display for LatticeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLattice => write!(f, "lattice has a zero dimension"),
            Self::DimensionTooLarge { name, value, max } => {
                write!(f, "dimension {name} = {value} exceeds maximum {max}")
            }
            Self::InvalidSectorCount { count } => {
                write!(f, "sector count must be 1, 2, or 4, got {count}")
            }
            Self::SectorTooSmall { count, nx, ny } => {
                write!(f, "{nx}x{ny} lattice cannot be split into {count} sectors")
            }
        }
    }
}

impl Error for LatticeError {}
