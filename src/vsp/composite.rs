//! Composite splitters: stacking and cross-multiplying child VSP spaces.
//!
//! Composites hold owned child splitters behind the [`Splitter`] interface
//! and translate flattened VSP indices into child-local ones. Activation is
//! computed entirely through `contains`: children's own activation state is
//! never touched, which yields union (OR) semantics for combined groups and
//! intersection (AND) semantics for products without one child's flag
//! writes clobbering another's.

use crate::errors::{ConfigError, EvalError, UsageError};
use crate::population::Population;
use crate::vsp::splitter::{apply_visibility, resolve_vsp, Resolved, Splitter, SplitterCore};
use crate::vsp::VspId;

/// Stacks child splitters' VSP spaces in order, optionally appending union
/// VSPs.
///
/// With children defining 3 and 2 VSPs, the combined splitter defines 5: the
/// second child's VSPs become flattened indices 3 and 4. Union groups, each
/// a list of original flattened indices, define additional VSPs appended
/// after the originals whose membership is the union of their members'.
#[derive(Debug, Clone)]
pub struct CombinedSplitter {
    splitters: Vec<Box<dyn Splitter>>,
    /// Flattened VSP index -> (child index, child-local VSP index) pairs.
    /// Originals map to a single pair; union VSPs map to several.
    vsp_map: Vec<Vec<(usize, usize)>>,
    core: SplitterCore,
}

impl CombinedSplitter {
    /// Concatenate the children's VSP spaces.
    pub fn new(splitters: Vec<Box<dyn Splitter>>) -> Result<Self, ConfigError> {
        Self::with_unions(splitters, Vec::new())
    }

    /// Concatenate the children's VSP spaces and append one union VSP per
    /// group of original flattened indices.
    pub fn with_unions(
        splitters: Vec<Box<dyn Splitter>>,
        unions: Vec<Vec<usize>>,
    ) -> Result<Self, ConfigError> {
        if splitters.is_empty() {
            return Err(ConfigError::Empty("splitters"));
        }
        let mut vsp_map = Vec::new();
        for (child, splitter) in splitters.iter().enumerate() {
            for local in 0..splitter.num_virtual_subpops() {
                vsp_map.push(vec![(child, local)]);
            }
        }
        let originals = vsp_map.len();
        for (g, group) in unions.iter().enumerate() {
            if group.is_empty() {
                return Err(ConfigError::Empty("union group"));
            }
            let mut members = Vec::with_capacity(group.len());
            for &flat in group {
                if flat >= originals {
                    return Err(ConfigError::InvalidParameter(format!(
                        "union group {g} references VSP {flat}, but only {originals} original \
                         VSPs exist"
                    )));
                }
                members.push(vsp_map[flat][0]);
            }
            vsp_map.push(members);
        }
        Ok(Self {
            splitters,
            vsp_map,
            core: SplitterCore::new(),
        })
    }

    pub fn with_names(mut self, names: Vec<String>) -> Result<Self, ConfigError> {
        let count = self.vsp_map.len();
        self.core.set_names(names, count)?;
        Ok(self)
    }

    /// The (child, child-local) pairs a flattened index maps to.
    fn members(&self, vsp: usize) -> &[(usize, usize)] {
        &self.vsp_map[vsp]
    }
}

impl Splitter for CombinedSplitter {
    fn num_virtual_subpops(&self) -> usize {
        self.vsp_map.len()
    }

    fn name(&self, vsp: usize) -> Result<String, UsageError> {
        let count = self.vsp_map.len();
        if vsp >= count {
            return Err(UsageError::VspOutOfRange { vsp, count });
        }
        if let Some(name) = self.core.override_name(vsp) {
            return Ok(name.to_string());
        }
        let names = self
            .members(vsp)
            .iter()
            .map(|&(child, local)| self.splitters[child].name(local))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names.join(" or "))
    }

    fn contains(&self, pop: &Population, index: usize, vsp: VspId) -> Result<bool, EvalError> {
        let sub_pop = vsp.sub_pop().ok_or(UsageError::UnsetSubPop)?;
        match resolve_vsp(pop, index, vsp, self.num_virtual_subpops())? {
            Resolved::Whole => Ok(true),
            Resolved::Vsp(_, v) => {
                for &(child, local) in self.members(v) {
                    if self.splitters[child].contains(pop, index, VspId::new(sub_pop, local))? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    fn activate(
        &mut self,
        pop: &mut Population,
        sub_pop: usize,
        vsp: usize,
    ) -> Result<(), EvalError> {
        self.core
            .check_activate(pop, sub_pop, vsp, self.vsp_map.len())?;
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

/// Cross-multiplies child splitters' VSP spaces into intersection VSPs.
///
/// A flattened index decomposes by mixed-radix arithmetic over the children's
/// VSP counts, the first child varying slowest. Membership requires
/// simultaneous containment in every child's decomposed VSP.
#[derive(Debug, Clone)]
pub struct ProductSplitter {
    splitters: Vec<Box<dyn Splitter>>,
    num_vsps: usize,
    core: SplitterCore,
}

impl ProductSplitter {
    pub fn new(splitters: Vec<Box<dyn Splitter>>) -> Result<Self, ConfigError> {
        if splitters.is_empty() {
            return Err(ConfigError::Empty("splitters"));
        }
        let mut num_vsps = 1usize;
        for (child, splitter) in splitters.iter().enumerate() {
            let count = splitter.num_virtual_subpops();
            if count == 0 {
                return Err(ConfigError::InvalidParameter(format!(
                    "child splitter {child} defines no VSPs"
                )));
            }
            num_vsps *= count;
        }
        Ok(Self {
            splitters,
            num_vsps,
            core: SplitterCore::new(),
        })
    }

    pub fn with_names(mut self, names: Vec<String>) -> Result<Self, ConfigError> {
        let count = self.num_vsps;
        self.core.set_names(names, count)?;
        Ok(self)
    }

    /// Decompose a flattened index into one child-local index per child.
    fn decompose(&self, vsp: usize) -> Vec<usize> {
        let mut locals = vec![0; self.splitters.len()];
        let mut rest = vsp;
        for (child, splitter) in self.splitters.iter().enumerate().rev() {
            let count = splitter.num_virtual_subpops();
            locals[child] = rest % count;
            rest /= count;
        }
        locals
    }
}

impl Splitter for ProductSplitter {
    fn num_virtual_subpops(&self) -> usize {
        self.num_vsps
    }

    fn name(&self, vsp: usize) -> Result<String, UsageError> {
        let count = self.num_vsps;
        if vsp >= count {
            return Err(UsageError::VspOutOfRange { vsp, count });
        }
        if let Some(name) = self.core.override_name(vsp) {
            return Ok(name.to_string());
        }
        let locals = self.decompose(vsp);
        let names = self
            .splitters
            .iter()
            .zip(locals)
            .map(|(splitter, local)| splitter.name(local))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names.join(", "))
    }

    fn contains(&self, pop: &Population, index: usize, vsp: VspId) -> Result<bool, EvalError> {
        let sub_pop = vsp.sub_pop().ok_or(UsageError::UnsetSubPop)?;
        match resolve_vsp(pop, index, vsp, self.num_vsps)? {
            Resolved::Whole => Ok(true),
            Resolved::Vsp(_, v) => {
                for (splitter, local) in self.splitters.iter().zip(self.decompose(v)) {
                    if !splitter.contains(pop, index, VspId::new(sub_pop, local))? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    fn activate(
        &mut self,
        pop: &mut Population,
        sub_pop: usize,
        vsp: usize,
    ) -> Result<(), EvalError> {
        self.core.check_activate(pop, sub_pop, vsp, self.num_vsps)?;
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
