//! Fitness/selection evaluation engine.
//!
//! Selectors compute a per-individual fitness scalar and write it into a
//! designated information field on every visible individual in scope;
//! downstream mating logic reads that field to bias reproduction. This
//! module provides:
//! - the [`Selector`] capability contract with a data-parallel `apply`
//! - [`MapSelector`]: genotype-dictionary lookup
//! - [`MultiAlleleSelector`]: wildtype/disease-allele table lookup
//! - [`MultiLocusSelector`]: multiplicative or additive composition of
//!   child models
//! - [`CallbackSelector`]: an injected external fitness function

pub mod models;
pub mod selector;

pub use models::{
    CallbackSelector, FitnessCallback, LocusModel, MapSelector, MultiAlleleSelector,
    MultiLocusSelector, SelectionMode,
};
pub use selector::Selector;
