//! Commonly used imports for convenience.
//!
//! ```
//! use vspop::prelude::*;
//!
//! let splitter = SexSplitter::new();
//! assert_eq!(splitter.num_virtual_subpops(), 2);
//! ```

pub use crate::base::{Allele, FitnessValue, Sex, DEFAULT_FITNESS_FIELD, PLOIDY};
pub use crate::errors::{ConfigError, EvalError, UsageError};
pub use crate::population::{Individual, Population};
pub use crate::selection::{
    CallbackSelector, FitnessCallback, LocusModel, MapSelector, MultiAlleleSelector,
    MultiLocusSelector, SelectionMode, Selector,
};
pub use crate::vsp::{
    AffectionSplitter, CombinedSplitter, GenotypeSplitter, InfoSplitter, ProductSplitter,
    ProportionSplitter, RangeSplitter, SexSplitter, Splitter, VspId, VspList,
};
