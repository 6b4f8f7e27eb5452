//! Error taxonomy (spec §7): one enum per concern.
//!
//! - [`ConfigError`] — construction-time validation failures.
//! - [`UsageError`] — protocol violations driving the engines.
//! - [`EvalError`] — per-individual evaluation failures (may wrap a
//!   [`UsageError`] encountered while resolving coordinates).

use thiserror::Error;

/// Construction-time validation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A required collection parameter was empty. Carries its name.
    #[error("`{0}` must not be empty")]
    Empty(&'static str),

    /// A parameter failed validation. Carries a human-readable reason.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Two fitness-table entries share the same genotype key.
    #[error("conflicting fitness keys: {0}")]
    ConflictingKeys(String),

    /// The number of supplied names does not match the number of VSPs.
    #[error("expected {expected} names, got {actual}")]
    NameCountMismatch { expected: usize, actual: usize },

    /// A fitness table has the wrong number of entries for its loci.
    #[error("expected {expected} fitness entries, got {actual}")]
    TableLengthMismatch { expected: usize, actual: usize },

    /// Proportions did not sum to 1.0. Carries the observed sum.
    #[error("proportions must sum to 1.0, got {0}")]
    BadProportions(f64),

    /// Range/info cutoffs were not in ascending order.
    #[error("cutoffs must be strictly ascending")]
    UnsortedCutoffs,
}

/// Protocol violations: out-of-range indices and activation-state misuse.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UsageError {
    /// A subpopulation index was out of range.
    #[error("subpopulation {sub_pop} out of range (have {count})")]
    SubPopOutOfRange { sub_pop: usize, count: usize },

    /// An individual index was out of range within its subpopulation.
    #[error("individual {index} out of range (size {size})")]
    IndividualOutOfRange { index: usize, size: usize },

    /// A virtual-subpopulation index was out of range.
    #[error("virtual subpopulation {vsp} out of range (have {count})")]
    VspOutOfRange { vsp: usize, count: usize },

    /// A coordinate referenced a VSP without a resolved subpopulation.
    #[error("subpopulation not set")]
    UnsetSubPop,

    /// Activation requested while another subpopulation is already active.
    #[error("subpopulation {activated} already activated (requested {requested})")]
    AlreadyActivated { activated: usize, requested: usize },

    /// Deactivation requested while nothing is active.
    #[error("cannot deactivate subpopulation {requested}: none active")]
    DeactivateInactive { requested: usize },

    /// Deactivation requested for a subpopulation other than the active one.
    #[error("cannot deactivate subpopulation {requested}: {activated} is active")]
    DeactivateMismatch { requested: usize, activated: usize },
}

/// Per-individual evaluation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A chromosome-copy index exceeded the ploidy.
    #[error("chromosome copy {copy} out of range")]
    CopyOutOfRange { copy: usize },

    /// A locus index exceeded the genome length.
    #[error("locus {locus} out of range (have {num_loci})")]
    LocusOutOfRange { locus: usize, num_loci: usize },

    /// A required information field was absent.
    #[error("missing info field `{0}`")]
    MissingInfoField(String),

    /// A genotype key had no entry in the fitness map.
    #[error("unmapped genotype `{0}`")]
    UnmappedGenotype(String),

    /// A user callback returned an error. Carries its message.
    #[error("callback error: {0}")]
    Callback(String),

    /// A fitness value was non-finite or negative.
    #[error("invalid fitness {0}")]
    InvalidFitness(f64),

    /// A usage error encountered while resolving an evaluation coordinate.
    #[error(transparent)]
    Usage(#[from] UsageError),
}
