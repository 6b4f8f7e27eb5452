//! The splitter capability contract and shared activation machinery.

use crate::errors::{ConfigError, EvalError, UsageError};
use crate::population::{Individual, Population};
use crate::vsp::VspId;
use std::fmt;

/// Contract every VSP partitioning strategy satisfies.
///
/// A splitter defines a fixed number of named VSPs over any subpopulation of
/// any population. VSPs do not have to add up to the whole subpopulation,
/// nor do they have to be distinct. Activation restricts the visible
/// individuals of one subpopulation to one VSP; deactivation makes everyone
/// visible again. At most one subpopulation may be activated at a time per
/// splitter instance, and `deactivate` must name the activated one.
pub trait Splitter: Send + Sync + fmt::Debug {
    /// Number of VSPs defined by this splitter. Fixed at construction,
    /// independent of any population.
    fn num_virtual_subpops(&self) -> usize;

    /// Name of VSP `vsp` (an index in `[0, num_virtual_subpops())`).
    ///
    /// Returns the user-supplied override when one was given at
    /// construction, otherwise a model-specific default.
    fn name(&self, vsp: usize) -> Result<String, UsageError>;

    /// Whether individual `index` (relative to the id's subpopulation)
    /// belongs to the given VSP. Pure predicate; never mutates state.
    ///
    /// A valid id without a virtual index tests plain subpopulation
    /// membership, so expanded "all available" selections flow through the
    /// same path.
    fn contains(&self, pop: &Population, index: usize, vsp: VspId) -> Result<bool, EvalError>;

    /// Number of individuals of `sub_pop` in VSP `vsp`.
    ///
    /// Always agrees with counting `contains` over the subpopulation;
    /// implementations may compute it directly when cheaper.
    fn size(&self, pop: &Population, sub_pop: usize, vsp: usize) -> Result<usize, EvalError> {
        count_members(self, pop, sub_pop, vsp)
    }

    /// Mark individuals of `sub_pop` in VSP `vsp` visible and all others
    /// invisible, and record `sub_pop` as activated.
    ///
    /// Every individual's flag is written, so re-activating the already
    /// activated subpopulation resets then applies. Activating a different
    /// subpopulation while one is active is a usage error.
    fn activate(&mut self, pop: &mut Population, sub_pop: usize, vsp: usize)
        -> Result<(), EvalError>;

    /// Make every individual of `sub_pop` visible again and clear the
    /// activation record. Fails if `sub_pop` is not the activated one.
    fn deactivate(&mut self, pop: &mut Population, sub_pop: usize) -> Result<(), UsageError>;

    /// Which subpopulation is currently activated, if any.
    fn activated_sub_pop(&self) -> Option<usize>;

    /// Deep copy with independent activation state.
    fn clone_box(&self) -> Box<dyn Splitter>;
}

impl Clone for Box<dyn Splitter> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Name-override list and activation record shared by every splitter.
#[derive(Debug, Clone, Default)]
pub struct SplitterCore {
    names: Vec<String>,
    activated: Option<usize>,
}

impl SplitterCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a user-supplied name list; its length must equal the VSP
    /// count.
    pub fn set_names(&mut self, names: Vec<String>, count: usize) -> Result<(), ConfigError> {
        if names.len() != count {
            return Err(ConfigError::NameCountMismatch {
                expected: count,
                actual: names.len(),
            });
        }
        self.names = names;
        Ok(())
    }

    pub fn override_name(&self, vsp: usize) -> Option<&str> {
        self.names.get(vsp).map(String::as_str)
    }

    pub fn activated(&self) -> Option<usize> {
        self.activated
    }

    /// Validate an activation request against the index contracts and the
    /// single-activation invariant.
    pub fn check_activate(
        &self,
        pop: &Population,
        sub_pop: usize,
        vsp: usize,
        count: usize,
    ) -> Result<(), UsageError> {
        if vsp >= count {
            return Err(UsageError::VspOutOfRange { vsp, count });
        }
        if sub_pop >= pop.num_sub_pops() {
            return Err(UsageError::SubPopOutOfRange {
                sub_pop,
                count: pop.num_sub_pops(),
            });
        }
        match self.activated {
            Some(activated) if activated != sub_pop => Err(UsageError::AlreadyActivated {
                activated,
                requested: sub_pop,
            }),
            _ => Ok(()),
        }
    }

    pub fn mark_activated(&mut self, sub_pop: usize) {
        self.activated = Some(sub_pop);
    }

    /// Restore full visibility for `sub_pop` and clear the record.
    pub fn deactivate(
        &mut self,
        pop: &mut Population,
        sub_pop: usize,
    ) -> Result<(), UsageError> {
        match self.activated {
            None => {
                return Err(UsageError::DeactivateInactive {
                    requested: sub_pop,
                })
            }
            Some(activated) if activated != sub_pop => {
                return Err(UsageError::DeactivateMismatch {
                    requested: sub_pop,
                    activated,
                })
            }
            Some(_) => {}
        }
        pop.reset_visibility(sub_pop)?;
        self.activated = None;
        Ok(())
    }
}

/// Resolution of a [`VspId`] against one individual.
pub(crate) enum Resolved<'a> {
    /// Valid non-virtual id: plain subpopulation membership.
    Whole,
    /// Virtual id: the individual and the virtual index to test.
    Vsp(&'a Individual, usize),
}

/// Validate a membership query and fetch the individual it targets.
pub(crate) fn resolve_vsp<'a>(
    pop: &'a Population,
    index: usize,
    vsp: VspId,
    count: usize,
) -> Result<Resolved<'a>, EvalError> {
    let sub_pop = vsp.sub_pop().ok_or(UsageError::UnsetSubPop)?;
    let inds = pop.sub_pop(sub_pop)?;
    let individual = inds.get(index).ok_or(UsageError::IndividualOutOfRange {
        index,
        size: inds.len(),
    })?;
    match vsp.virtual_sub_pop() {
        None => Ok(Resolved::Whole),
        Some(v) if v >= count => Err(UsageError::VspOutOfRange { vsp: v, count }.into()),
        Some(v) => Ok(Resolved::Vsp(individual, v)),
    }
}

/// Write the visibility flag of every individual in `sub_pop` from the
/// splitter's own `contains` predicate.
///
/// Membership is evaluated in a read-only pass before any flag is written,
/// so a composite's predicate can consult prior flags without observing its
/// own partial writes.
pub(crate) fn apply_visibility<S: Splitter + ?Sized>(
    splitter: &S,
    pop: &mut Population,
    sub_pop: usize,
    vsp: usize,
) -> Result<(), EvalError> {
    let id = VspId::new(sub_pop, vsp);
    let size = pop.sub_pop_size(sub_pop)?;
    let mut mask = Vec::with_capacity(size);
    for index in 0..size {
        mask.push(splitter.contains(pop, index, id)?);
    }
    for (individual, member) in pop.sub_pop_mut(sub_pop)?.iter_mut().zip(mask) {
        individual.set_visible(member);
    }
    Ok(())
}

/// Count members of a VSP by evaluating `contains` over the subpopulation.
pub(crate) fn count_members<S: Splitter + ?Sized>(
    splitter: &S,
    pop: &Population,
    sub_pop: usize,
    vsp: usize,
) -> Result<usize, EvalError> {
    let count = splitter.num_virtual_subpops();
    if vsp >= count {
        return Err(UsageError::VspOutOfRange { vsp, count }.into());
    }
    let id = VspId::new(sub_pop, vsp);
    let size = pop.sub_pop_size(sub_pop)?;
    let mut members = 0;
    for index in 0..size {
        if splitter.contains(pop, index, id)? {
            members += 1;
        }
    }
    Ok(members)
}

/// Default-name helper: override if present, otherwise the supplied default.
pub(crate) fn vsp_name(
    core: &SplitterCore,
    vsp: usize,
    count: usize,
    default: impl FnOnce() -> String,
) -> Result<String, UsageError> {
    if vsp >= count {
        return Err(UsageError::VspOutOfRange { vsp, count });
    }
    Ok(match core.override_name(vsp) {
        Some(name) => name.to_string(),
        None => default(),
    })
}
