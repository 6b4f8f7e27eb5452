//! Leaf splitters over individual properties and storage position.
//!
//! - [`SexSplitter`]: male / female
//! - [`AffectionSplitter`]: unaffected / affected
//! - [`InfoSplitter`]: information-field value, cutoff bins, or ranges
//! - [`ProportionSplitter`]: contiguous blocks by proportion of the
//!   subpopulation, in storage order
//! - [`RangeSplitter`]: contiguous index ranges in storage order

use crate::base::Sex;
use crate::errors::{ConfigError, EvalError, UsageError};
use crate::population::Population;
use crate::vsp::splitter::{
    apply_visibility, resolve_vsp, vsp_name, Resolved, Splitter, SplitterCore,
};
use crate::vsp::VspId;

/// Two VSPs by individual sex: VSP 0 is male, VSP 1 is female.
#[derive(Debug, Clone, Default)]
pub struct SexSplitter {
    core: SplitterCore,
}

impl SexSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default `MALE` / `FEMALE` names.
    pub fn with_names(mut self, names: Vec<String>) -> Result<Self, ConfigError> {
        self.core.set_names(names, 2)?;
        Ok(self)
    }
}

impl Splitter for SexSplitter {
    fn num_virtual_subpops(&self) -> usize {
        2
    }

    fn name(&self, vsp: usize) -> Result<String, UsageError> {
        vsp_name(&self.core, vsp, 2, || {
            match vsp {
                0 => Sex::Male,
                _ => Sex::Female,
            }
            .to_string()
        })
    }

    fn contains(&self, pop: &Population, index: usize, vsp: VspId) -> Result<bool, EvalError> {
        match resolve_vsp(pop, index, vsp, 2)? {
            Resolved::Whole => Ok(true),
            Resolved::Vsp(ind, 0) => Ok(ind.sex() == Sex::Male),
            Resolved::Vsp(ind, _) => Ok(ind.sex() == Sex::Female),
        }
    }

    fn activate(
        &mut self,
        pop: &mut Population,
        sub_pop: usize,
        vsp: usize,
    ) -> Result<(), EvalError> {
        self.core.check_activate(pop, sub_pop, vsp, 2)?;
        apply_visibility(&*self, pop, sub_pop, vsp)?;
        self.core.mark_activated(sub_pop);
        Ok(())
    }

    fn deactivate(&mut self, pop: &mut Population, sub_pop: usize) -> Result<(), UsageError> {
        self.core.deactivate(pop, sub_pop)
    }

    fn activated_sub_pop(&self) -> Option<usize> {
        self.core.activated()
    }

    fn clone_box(&self) -> Box<dyn Splitter> {
        Box::new(self.clone())
    }
}

/// Two VSPs by affection status: VSP 0 is unaffected, VSP 1 is affected.
#[derive(Debug, Clone, Default)]
pub struct AffectionSplitter {
    core: SplitterCore,
}

impl AffectionSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default `UNAFFECTED` / `AFFECTED` names.
    pub fn with_names(mut self, names: Vec<String>) -> Result<Self, ConfigError> {
        self.core.set_names(names, 2)?;
        Ok(self)
    }
}

impl Splitter for AffectionSplitter {
    fn num_virtual_subpops(&self) -> usize {
        2
    }

    fn name(&self, vsp: usize) -> Result<String, UsageError> {
        vsp_name(&self.core, vsp, 2, || {
            match vsp {
                0 => "UNAFFECTED",
                _ => "AFFECTED",
            }
            .to_string()
        })
    }

    fn contains(&self, pop: &Population, index: usize, vsp: VspId) -> Result<bool, EvalError> {
        match resolve_vsp(pop, index, vsp, 2)? {
            Resolved::Whole => Ok(true),
            Resolved::Vsp(ind, 0) => Ok(!ind.is_affected()),
            Resolved::Vsp(ind, _) => Ok(ind.is_affected()),
        }
    }

    fn activate(
        &mut self,
        pop: &mut Population,
        sub_pop: usize,
        vsp: usize,
    ) -> Result<(), EvalError> {
        self.core.check_activate(pop, sub_pop, vsp, 2)?;
        apply_visibility(&*self, pop, sub_pop, vsp)?;
        self.core.mark_activated(sub_pop);
        Ok(())
    }

    fn deactivate(&mut self, pop: &mut Population, sub_pop: usize) -> Result<(), UsageError> {
        self.core.deactivate(pop, sub_pop)
    }

    fn activated_sub_pop(&self) -> Option<usize> {
        self.core.activated()
    }

    fn clone_box(&self) -> Box<dyn Splitter> {
        Box::new(self.clone())
    }
}

/// How an [`InfoSplitter`] partitions the value axis of its field.
#[derive(Debug, Clone)]
enum InfoPartition {
    /// One VSP per exact value.
    Values(Vec<f64>),
    /// Half-open bins induced by strictly increasing cutoff points:
    /// `(-inf, c0)`, `[c0, c1)`, ..., `[c_last, +inf)`.
    Cutoffs(Vec<f64>),
    /// One VSP per half-open interval `[lo, hi)`; intervals may overlap.
    Ranges(Vec<[f64; 2]>),
}

/// VSPs defined by the value of one information field per individual.
#[derive(Debug, Clone)]
pub struct InfoSplitter {
    field: String,
    partition: InfoPartition,
    core: SplitterCore,
}

impl InfoSplitter {
    /// One VSP per exact field value.
    pub fn by_values(field: impl Into<String>, values: Vec<f64>) -> Result<Self, ConfigError> {
        if values.is_empty() {
            return Err(ConfigError::Empty("values"));
        }
        Ok(Self {
            field: field.into(),
            partition: InfoPartition::Values(values),
            core: SplitterCore::new(),
        })
    }

    /// `len(cutoffs) + 1` VSPs bucketed by half-open intervals induced by
    /// the strictly increasing cutoff points.
    pub fn by_cutoffs(field: impl Into<String>, cutoffs: Vec<f64>) -> Result<Self, ConfigError> {
        if cutoffs.is_empty() {
            return Err(ConfigError::Empty("cutoffs"));
        }
        if cutoffs.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::UnsortedCutoffs);
        }
        Ok(Self {
            field: field.into(),
            partition: InfoPartition::Cutoffs(cutoffs),
            core: SplitterCore::new(),
        })
    }

    /// One VSP per half-open interval `[lo, hi)`; intervals may overlap.
    pub fn by_ranges(field: impl Into<String>, ranges: Vec<[f64; 2]>) -> Result<Self, ConfigError> {
        if ranges.is_empty() {
            return Err(ConfigError::Empty("ranges"));
        }
        for r in &ranges {
            if !(r[0] < r[1]) {
                return Err(ConfigError::InvalidParameter(format!(
                    "info range [{}, {}) is not a well-formed interval",
                    r[0], r[1]
                )));
            }
        }
        Ok(Self {
            field: field.into(),
            partition: InfoPartition::Ranges(ranges),
            core: SplitterCore::new(),
        })
    }

    pub fn with_names(mut self, names: Vec<String>) -> Result<Self, ConfigError> {
        let count = self.num_virtual_subpops();
        self.core.set_names(names, count)?;
        Ok(self)
    }

    /// The information field this splitter reads.
    pub fn field(&self) -> &str {
        &self.field
    }

    fn member(&self, value: f64, vsp: usize) -> bool {
        match &self.partition {
            InfoPartition::Values(values) => value == values[vsp],
            InfoPartition::Cutoffs(cutoffs) => {
                let below = if vsp == 0 {
                    value < cutoffs[0]
                } else {
                    value >= cutoffs[vsp - 1]
                };
                let above = if vsp == cutoffs.len() {
                    true
                } else {
                    value < cutoffs[vsp]
                };
                below && above
            }
            InfoPartition::Ranges(ranges) => value >= ranges[vsp][0] && value < ranges[vsp][1],
        }
    }
}

impl Splitter for InfoSplitter {
    fn num_virtual_subpops(&self) -> usize {
        match &self.partition {
            InfoPartition::Values(values) => values.len(),
            InfoPartition::Cutoffs(cutoffs) => cutoffs.len() + 1,
            InfoPartition::Ranges(ranges) => ranges.len(),
        }
    }

    fn name(&self, vsp: usize) -> Result<String, UsageError> {
        let count = self.num_virtual_subpops();
        vsp_name(&self.core, vsp, count, || match &self.partition {
            InfoPartition::Values(values) => format!("{} = {}", self.field, values[vsp]),
            InfoPartition::Cutoffs(cutoffs) => {
                if vsp == 0 {
                    format!("{} < {}", self.field, cutoffs[0])
                } else if vsp == cutoffs.len() {
                    format!("{} >= {}", self.field, cutoffs[vsp - 1])
                } else {
                    format!("{} <= {} < {}", cutoffs[vsp - 1], self.field, cutoffs[vsp])
                }
            }
            InfoPartition::Ranges(ranges) => {
                format!("{} <= {} < {}", ranges[vsp][0], self.field, ranges[vsp][1])
            }
        })
    }

    fn contains(&self, pop: &Population, index: usize, vsp: VspId) -> Result<bool, EvalError> {
        match resolve_vsp(pop, index, vsp, self.num_virtual_subpops())? {
            Resolved::Whole => Ok(true),
            Resolved::Vsp(ind, v) => Ok(self.member(ind.info(&self.field)?, v)),
        }
    }

    fn activate(
        &mut self,
        pop: &mut Population,
        sub_pop: usize,
        vsp: usize,
    ) -> Result<(), EvalError> {
        self.core
            .check_activate(pop, sub_pop, vsp, self.num_virtual_subpops())?;
        apply_visibility(&*self, pop, sub_pop, vsp)?;
        self.core.mark_activated(sub_pop);
        Ok(())
    }

    fn deactivate(&mut self, pop: &mut Population, sub_pop: usize) -> Result<(), UsageError> {
        self.core.deactivate(pop, sub_pop)
    }

    fn activated_sub_pop(&self) -> Option<usize> {
        self.core.activated()
    }

    fn clone_box(&self) -> Box<dyn Splitter> {
        Box::new(self.clone())
    }
}

/// VSPs that partition each subpopulation, in storage order, into contiguous
/// blocks whose sizes are proportional to the given proportions.
#[derive(Debug, Clone)]
pub struct ProportionSplitter {
    proportions: Vec<f64>,
    core: SplitterCore,
}

impl ProportionSplitter {
    /// Create a splitter from proportions, which must be positive and sum
    /// to 1.
    pub fn new(proportions: Vec<f64>) -> Result<Self, ConfigError> {
        if proportions.is_empty() {
            return Err(ConfigError::Empty("proportions"));
        }
        let sum: f64 = proportions.iter().sum();
        if proportions.iter().any(|&p| !(p > 0.0)) || (sum - 1.0).abs() > 1e-8 {
            return Err(ConfigError::BadProportions(sum));
        }
        Ok(Self {
            proportions,
            core: SplitterCore::new(),
        })
    }

    pub fn with_names(mut self, names: Vec<String>) -> Result<Self, ConfigError> {
        let count = self.proportions.len();
        self.core.set_names(names, count)?;
        Ok(self)
    }

    /// Block boundaries for a subpopulation of `n` individuals.
    ///
    /// Block `v` has size `round(proportions[v] * n)` clamped to what
    /// remains; the last block absorbs the rounding remainder so the blocks
    /// exactly cover the subpopulation.
    fn block_bounds(&self, n: usize) -> Vec<(usize, usize)> {
        let last = self.proportions.len() - 1;
        let mut bounds = Vec::with_capacity(self.proportions.len());
        let mut start = 0usize;
        for (v, p) in self.proportions.iter().enumerate() {
            let len = if v == last {
                n - start
            } else {
                (((p * n as f64).round()) as usize).min(n - start)
            };
            bounds.push((start, start + len));
            start += len;
        }
        bounds
    }
}

impl Splitter for ProportionSplitter {
    fn num_virtual_subpops(&self) -> usize {
        self.proportions.len()
    }

    fn name(&self, vsp: usize) -> Result<String, UsageError> {
        let count = self.proportions.len();
        vsp_name(&self.core, vsp, count, || {
            format!("Prop {}", self.proportions[vsp])
        })
    }

    fn contains(&self, pop: &Population, index: usize, vsp: VspId) -> Result<bool, EvalError> {
        let sub_pop = vsp.sub_pop().ok_or(UsageError::UnsetSubPop)?;
        match resolve_vsp(pop, index, vsp, self.num_virtual_subpops())? {
            Resolved::Whole => Ok(true),
            Resolved::Vsp(_, v) => {
                let n = pop.sub_pop_size(sub_pop)?;
                let (lo, hi) = self.block_bounds(n)[v];
                Ok(index >= lo && index < hi)
            }
        }
    }

    fn size(&self, pop: &Population, sub_pop: usize, vsp: usize) -> Result<usize, EvalError> {
        let count = self.proportions.len();
        if vsp >= count {
            return Err(UsageError::VspOutOfRange { vsp, count }.into());
        }
        let n = pop.sub_pop_size(sub_pop)?;
        let (lo, hi) = self.block_bounds(n)[vsp];
        Ok(hi - lo)
    }

    fn activate(
        &mut self,
        pop: &mut Population,
        sub_pop: usize,
        vsp: usize,
    ) -> Result<(), EvalError> {
        self.core
            .check_activate(pop, sub_pop, vsp, self.proportions.len())?;
        apply_visibility(&*self, pop, sub_pop, vsp)?;
        self.core.mark_activated(sub_pop);
        Ok(())
    }

    fn deactivate(&mut self, pop: &mut Population, sub_pop: usize) -> Result<(), UsageError> {
        self.core.deactivate(pop, sub_pop)
    }

    fn activated_sub_pop(&self) -> Option<usize> {
        self.core.activated()
    }

    fn clone_box(&self) -> Box<dyn Splitter> {
        Box::new(self.clone())
    }
}

/// VSPs defined by contiguous storage-order index ranges `[lo, hi)`.
#[derive(Debug, Clone)]
pub struct RangeSplitter {
    ranges: Vec<[usize; 2]>,
    core: SplitterCore,
}

impl RangeSplitter {
    /// Create a splitter from half-open index ranges.
    pub fn new(ranges: Vec<[usize; 2]>) -> Result<Self, ConfigError> {
        if ranges.is_empty() {
            return Err(ConfigError::Empty("ranges"));
        }
        for r in &ranges {
            if r[0] >= r[1] {
                return Err(ConfigError::InvalidParameter(format!(
                    "index range [{}, {}) is not a well-formed interval",
                    r[0], r[1]
                )));
            }
        }
        Ok(Self {
            ranges,
            core: SplitterCore::new(),
        })
    }

    pub fn with_names(mut self, names: Vec<String>) -> Result<Self, ConfigError> {
        let count = self.ranges.len();
        self.core.set_names(names, count)?;
        Ok(self)
    }
}

impl Splitter for RangeSplitter {
    fn num_virtual_subpops(&self) -> usize {
        self.ranges.len()
    }

    fn name(&self, vsp: usize) -> Result<String, UsageError> {
        let count = self.ranges.len();
        vsp_name(&self.core, vsp, count, || {
            format!("Range [{}, {}]", self.ranges[vsp][0], self.ranges[vsp][1])
        })
    }

    fn contains(&self, pop: &Population, index: usize, vsp: VspId) -> Result<bool, EvalError> {
        match resolve_vsp(pop, index, vsp, self.num_virtual_subpops())? {
            Resolved::Whole => Ok(true),
            Resolved::Vsp(_, v) => Ok(index >= self.ranges[v][0] && index < self.ranges[v][1]),
        }
    }

    fn size(&self, pop: &Population, sub_pop: usize, vsp: usize) -> Result<usize, EvalError> {
        let count = self.ranges.len();
        if vsp >= count {
            return Err(UsageError::VspOutOfRange { vsp, count }.into());
        }
        let n = pop.sub_pop_size(sub_pop)?;
        let [lo, hi] = self.ranges[vsp];
        Ok(hi.min(n).saturating_sub(lo))
    }

    fn activate(
        &mut self,
        pop: &mut Population,
        sub_pop: usize,
        vsp: usize,
    ) -> Result<(), EvalError> {
        self.core
            .check_activate(pop, sub_pop, vsp, self.ranges.len())?;
        apply_visibility(&*self, pop, sub_pop, vsp)?;
        self.core.mark_activated(sub_pop);
        Ok(())
    }

    fn deactivate(&mut self, pop: &mut Population, sub_pop: usize) -> Result<(), UsageError> {
        self.core.deactivate(pop, sub_pop)
    }

    fn activated_sub_pop(&self) -> Option<usize> {
        self.core.activated()
    }

    fn clone_box(&self) -> Box<dyn Splitter> {
        Box::new(self.clone())
    }
}
