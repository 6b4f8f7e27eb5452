//! # vspop
//!
//! Virtual-subpopulation partitioning and fitness/selection evaluation for
//! forward-time population simulations.
//!
//! The crate provides two engines over an externally driven [`Population`]:
//! - the **VSP engine** ([`vsp`]): splitters carve subpopulations into
//!   named, possibly-overlapping virtual subpopulations without copying or
//!   reordering individuals, and activate/deactivate them by toggling
//!   per-individual visibility;
//! - the **selection engine** ([`selection`]): selectors compute a
//!   per-individual fitness value from pluggable, composable models and
//!   write it into an information field for mating logic to consume.
//!
//! A typical driver loop activates one VSP, applies a selector (or another
//! operator) over the now-restricted subpopulation, then deactivates:
//!
//! ```
//! use vspop::prelude::*;
//!
//! let inds = vec![
//!     Individual::new("a", Sex::Male, vec![0], vec![1]),
//!     Individual::new("b", Sex::Female, vec![1], vec![1]),
//! ];
//! let mut pop = Population::new("demo", vec![inds]);
//!
//! let mut splitter = SexSplitter::new();
//! let selector = MultiAlleleSelector::new(vec![0], vec![1.0, 0.9, 0.5]).unwrap();
//!
//! for vsp in 0..splitter.num_virtual_subpops() {
//!     splitter.activate(&mut pop, 0, vsp).unwrap();
//!     selector.apply(&mut pop).unwrap();
//!     splitter.deactivate(&mut pop, 0).unwrap();
//! }
//! assert_eq!(pop.individual(0, 0).unwrap().info("fitness").unwrap(), 0.9);
//! ```

pub mod base;
pub mod config;
pub mod errors;
pub mod population;
pub mod prelude;
pub mod selection;
pub mod vsp;

pub use base::{Allele, FitnessValue, Sex};
pub use population::{Individual, Population};
