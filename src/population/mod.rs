//! Population storage consumed by splitters and selectors.
//!
//! The partitioning and selection engines only read from and write into the
//! narrow surface exposed here: per-subpopulation counts and stable storage
//! order, per-individual genotype/sex/affection access, named information
//! fields, and the visibility flag toggled by splitter activation.

pub mod individual;
pub mod population;

pub use individual::Individual;
pub use population::Population;
