//! Error types for the annealing engine.
//!
//! Every variant is a construction-time configuration error. Numeric
//! degeneracy during a run (temperature reaching zero, exponent overflow) is
//! absorbed by clamping in the kernel and never surfaces here.

use thiserror::Error;

/// Errors produced while building a coupling model or validating a run.
#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum AnnealError {
    /// Dense coupling matrix is not `n × n`.
    #[error("coupling matrix has {len} entries, expected {n}x{n}")]
    MatrixShape {
        /// Number of entries supplied.
        len: usize,
        /// Number of sites implied by the other inputs.
        n: usize,
    },

    /// Bias (or QUBO linear) vector length differs from the site count.
    #[error("bias vector has length {len}, expected {n}")]
    BiasLength {
        /// Length supplied.
        len: usize,
        /// Number of sites.
        n: usize,
    },

    /// Grid extents do not multiply to the site count, or an extent is zero.
    #[error("grid shape {nx}x{ny} is invalid")]
    GridShape {
        /// Extent along x.
        nx: usize,
        /// Extent along y.
        ny: usize,
    },

    /// Coupling matrix has a non-zero self-interaction.
    #[error("coupling matrix diagonal entry ({site},{site}) is {value}, expected 0")]
    NonZeroDiagonal {
        /// Offending site.
        site: usize,
        /// Offending value.
        value: f64,
    },

    /// Coupling or QUBO matrix is not symmetric.
    #[error("matrix entries ({i},{j}) and ({j},{i}) differ")]
    Asymmetric {
        /// Row of the offending entry.
        i: usize,
        /// Column of the offending entry.
        j: usize,
    },

    /// A coupling, bias or QUBO coefficient is NaN or infinite.
    #[error("non-finite coefficient at index {0}")]
    NonFinite(usize),

    /// Edge or index refers to a site outside the model.
    #[error("site {site} out of range for {n} sites")]
    SiteOutOfRange {
        /// Offending index.
        site: usize,
        /// Number of sites.
        n: usize,
    },

    /// Topology has no sites.
    #[error("coupling model must have at least one site")]
    NoSites,

    /// Run configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for engine construction.
pub type AnnealResult<T> = Result<T, AnnealError>;
