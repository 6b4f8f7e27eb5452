//! Virtual-subpopulation (VSP) partitioning engine.
//!
//! A VSP is a named, possibly-overlapping logical grouping of individuals
//! within a subpopulation, defined by a predicate rather than physical
//! storage. This module provides:
//! - [`VspId`] and [`VspList`]: identities and ordered selections of VSPs
//! - the [`Splitter`] capability contract (enumerate, name, test, size,
//!   activate/deactivate)
//! - leaf splitters: [`SexSplitter`], [`AffectionSplitter`], [`InfoSplitter`],
//!   [`ProportionSplitter`], [`RangeSplitter`], [`GenotypeSplitter`]
//! - composite splitters: [`CombinedSplitter`] (stacks child VSP spaces,
//!   optionally unioning groups of them) and [`ProductSplitter`]
//!   (cross-multiplies child VSP spaces into intersections)

pub mod basic;
pub mod composite;
pub mod genotype;
pub mod id;
pub mod splitter;

pub use basic::{AffectionSplitter, InfoSplitter, ProportionSplitter, RangeSplitter, SexSplitter};
pub use composite::{CombinedSplitter, ProductSplitter};
pub use genotype::GenotypeSplitter;
pub use id::{VspId, VspList};
pub use splitter::Splitter;
