//! Scalar domain types shared by the partitioning and selection engines.

pub mod fitness;

pub use fitness::FitnessValue;

use serde::{Deserialize, Serialize};
use std::fmt;

/// An allele code at one locus on one chromosome copy.
pub type Allele = u32;

/// Number of chromosome copies per individual. The evaluation engines
/// currently assume diploid individuals.
pub const PLOIDY: usize = 2;

/// Name of the information field selectors write by default.
pub const DEFAULT_FITNESS_FIELD: &str = "fitness";

/// Biological sex of an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "MALE"),
            Sex::Female => write!(f, "FEMALE"),
        }
    }
}
