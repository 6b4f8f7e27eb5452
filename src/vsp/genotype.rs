//! Genotype-pattern splitter.

use crate::base::{Allele, PLOIDY};
use crate::errors::{ConfigError, EvalError, UsageError};
use crate::population::{Individual, Population};
use crate::vsp::splitter::{
    apply_visibility, resolve_vsp, vsp_name, Resolved, Splitter, SplitterCore,
};
use crate::vsp::VspId;

/// VSPs defined by individual genotype at declared loci.
///
/// Each VSP is declared by one allele group: a flat list of alleles arranged
/// locus-major, two per locus (`[l0c0, l0c1, l1c0, l1c1, ...]`). A group may
/// concatenate several such genotypes; an individual belongs to the VSP if
/// its genotype matches any of them. With `phase = false` the two copies at
/// each locus match in either order; with `phase = true` copy order is
/// significant.
#[derive(Debug, Clone)]
pub struct GenotypeSplitter {
    loci: Vec<usize>,
    groups: Vec<Vec<Allele>>,
    phase: bool,
    core: SplitterCore,
}

impl GenotypeSplitter {
    /// Create a splitter from loci and one allele group per VSP.
    ///
    /// Every group's length must be a positive multiple of
    /// `PLOIDY * loci.len()`.
    pub fn new(loci: Vec<usize>, groups: Vec<Vec<Allele>>, phase: bool) -> Result<Self, ConfigError> {
        if loci.is_empty() {
            return Err(ConfigError::Empty("loci"));
        }
        if groups.is_empty() {
            return Err(ConfigError::Empty("allele groups"));
        }
        let stride = PLOIDY * loci.len();
        for (v, group) in groups.iter().enumerate() {
            if group.is_empty() || group.len() % stride != 0 {
                return Err(ConfigError::InvalidParameter(format!(
                    "allele group {v} has length {}, expected a positive multiple of {stride}",
                    group.len()
                )));
            }
        }
        Ok(Self {
            loci,
            groups,
            phase,
            core: SplitterCore::new(),
        })
    }

    pub fn with_names(mut self, names: Vec<String>) -> Result<Self, ConfigError> {
        let count = self.groups.len();
        self.core.set_names(names, count)?;
        Ok(self)
    }

    /// Whether one genotype chunk matches the individual at every declared
    /// locus.
    fn match_single(&self, ind: &Individual, chunk: &[Allele]) -> Result<bool, EvalError> {
        for (j, &locus) in self.loci.iter().enumerate() {
            let want0 = chunk[PLOIDY * j];
            let want1 = chunk[PLOIDY * j + 1];
            let have0 = ind.allele(locus, 0)?;
            let have1 = ind.allele(locus, 1)?;
            let hit = if self.phase {
                want0 == have0 && want1 == have1
            } else {
                (want0 == have0 && want1 == have1) || (want0 == have1 && want1 == have0)
            };
            if !hit {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Whether any genotype chunk of the group matches.
    fn matches(&self, ind: &Individual, vsp: usize) -> Result<bool, EvalError> {
        let stride = PLOIDY * self.loci.len();
        for chunk in self.groups[vsp].chunks(stride) {
            if self.match_single(ind, chunk)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Splitter for GenotypeSplitter {
    fn num_virtual_subpops(&self) -> usize {
        self.groups.len()
    }

    fn name(&self, vsp: usize) -> Result<String, UsageError> {
        let count = self.groups.len();
        vsp_name(&self.core, vsp, count, || {
            let loci = self
                .loci
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(",");
            let alleles = self.groups[vsp]
                .iter()
                .map(Allele::to_string)
                .collect::<Vec<_>>()
                .join(",");
            format!("Genotype {loci}:{alleles}")
        })
    }

    fn contains(&self, pop: &Population, index: usize, vsp: VspId) -> Result<bool, EvalError> {
        match resolve_vsp(pop, index, vsp, self.num_virtual_subpops())? {
            Resolved::Whole => Ok(true),
            Resolved::Vsp(ind, v) => self.matches(ind, v),
        }
    }

    fn activate(
        &mut self,
        pop: &mut Population,
        sub_pop: usize,
        vsp: usize,
    ) -> Result<(), EvalError> {
        self.core
            .check_activate(pop, sub_pop, vsp, self.groups.len())?;
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
