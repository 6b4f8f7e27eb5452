//! Concrete fitness models.

use crate::base::{Allele, FitnessValue, DEFAULT_FITNESS_FIELD, PLOIDY};
use crate::errors::{ConfigError, EvalError};
use crate::population::Individual;
use crate::selection::Selector;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Read the two alleles of one individual at one locus.
fn locus_pair(ind: &Individual, locus: usize) -> Result<(Allele, Allele), EvalError> {
    Ok((ind.allele(locus, 0)?, ind.allele(locus, 1)?))
}

/// Selection according to a genotype-to-fitness dictionary.
///
/// A key is an ordered tuple of alleles across the declared loci and ploidy,
/// arranged locus-major (`[l0c0, l0c1, l1c0, l1c1, ...]`). With
/// `phase = false` a key and its per-locus copy permutation are equivalent:
/// keys are canonicalized at construction and at lookup, so `[0, 1]` and
/// `[1, 0]` resolve to the same configured value. A genotype absent from the
/// dictionary is an evaluation error, not a default.
#[derive(Debug, Clone)]
pub struct MapSelector {
    loci: Vec<usize>,
    table: HashMap<Vec<Allele>, f64>,
    phase: bool,
    sub_pops: Vec<usize>,
    field: String,
}

impl MapSelector {
    /// Create a map selector from a genotype-to-fitness table.
    pub fn new(
        loci: Vec<usize>,
        table: impl IntoIterator<Item = (Vec<Allele>, f64)>,
        phase: bool,
    ) -> Result<Self, ConfigError> {
        if loci.is_empty() {
            return Err(ConfigError::Empty("loci"));
        }
        let stride = PLOIDY * loci.len();
        let mut canonical: HashMap<Vec<Allele>, f64> = HashMap::new();
        for (mut key, fitness) in table {
            if key.len() != stride {
                return Err(ConfigError::InvalidParameter(format!(
                    "genotype key has length {}, expected {stride}",
                    key.len()
                )));
            }
            if !fitness.is_finite() || fitness < 0.0 {
                return Err(ConfigError::InvalidParameter(format!(
                    "fitness {fitness} must be finite and non-negative"
                )));
            }
            if !phase {
                canonicalize(&mut key);
            }
            if let Some(&existing) = canonical.get(&key) {
                if existing != fitness {
                    return Err(ConfigError::ConflictingKeys(format_key(&key)));
                }
            }
            canonical.insert(key, fitness);
        }
        if canonical.is_empty() {
            return Err(ConfigError::Empty("fitness table"));
        }
        Ok(Self {
            loci,
            table: canonical,
            phase,
            sub_pops: Vec::new(),
            field: DEFAULT_FITNESS_FIELD.to_string(),
        })
    }

    /// Restrict the selector to a subset of subpopulations.
    pub fn with_sub_pops(mut self, sub_pops: Vec<usize>) -> Self {
        self.sub_pops = sub_pops;
        self
    }

    /// Write fitness into a field other than the default.
    pub fn with_output_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    fn key_of(&self, ind: &Individual) -> Result<Vec<Allele>, EvalError> {
        let mut key = Vec::with_capacity(PLOIDY * self.loci.len());
        for &locus in &self.loci {
            let (a, b) = locus_pair(ind, locus)?;
            key.push(a);
            key.push(b);
        }
        if !self.phase {
            canonicalize(&mut key);
        }
        Ok(key)
    }
}

/// Sort each locus's copy pair so unphased keys compare equal.
fn canonicalize(key: &mut [Allele]) {
    for pair in key.chunks_mut(PLOIDY) {
        if pair[0] > pair[1] {
            pair.swap(0, 1);
        }
    }
}

fn format_key(key: &[Allele]) -> String {
    key.iter()
        .map(Allele::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl Selector for MapSelector {
    fn ind_fitness(
        &self,
        individual: &Individual,
        _generation: u64,
    ) -> Result<FitnessValue, EvalError> {
        let key = self.key_of(individual)?;
        self.table
            .get(&key)
            .map(|&f| FitnessValue::new(f))
            .ok_or_else(|| EvalError::UnmappedGenotype(format_key(&key)))
    }

    fn sub_pops(&self) -> &[usize] {
        &self.sub_pops
    }

    fn output_field(&self) -> &str {
        &self.field
    }

    fn clone_box(&self) -> Box<dyn Selector> {
        Box::new(self.clone())
    }
}

/// Selection according to counts of non-wildtype alleles.
///
/// Alleles split into a wildtype set and disease alleles (everything else).
/// The flat fitness table is indexed by the count of non-wildtype alleles at
/// each locus (0, 1 or 2 per diploid locus), combined locus-major with the
/// first locus varying slowest; its length must equal `3^num_loci`. For one
/// locus the table reads `[AA, Aa, aa]` with `A` wildtype.
#[derive(Debug, Clone)]
pub struct MultiAlleleSelector {
    loci: Vec<usize>,
    fitness: Vec<f64>,
    wildtype: Vec<Allele>,
    sub_pops: Vec<usize>,
    field: String,
}

impl MultiAlleleSelector {
    /// Create a selector with wildtype allele 0.
    pub fn new(loci: Vec<usize>, fitness: Vec<f64>) -> Result<Self, ConfigError> {
        Self::with_wildtype(loci, fitness, vec![0])
    }

    /// Create a selector with an explicit wildtype allele set.
    pub fn with_wildtype(
        loci: Vec<usize>,
        fitness: Vec<f64>,
        wildtype: Vec<Allele>,
    ) -> Result<Self, ConfigError> {
        if loci.is_empty() {
            return Err(ConfigError::Empty("loci"));
        }
        if wildtype.is_empty() {
            return Err(ConfigError::Empty("wildtype"));
        }
        let expected = 3usize
            .checked_pow(loci.len() as u32)
            .ok_or_else(|| ConfigError::InvalidParameter("too many loci".to_string()))?;
        if fitness.len() != expected {
            return Err(ConfigError::TableLengthMismatch {
                expected,
                actual: fitness.len(),
            });
        }
        if let Some(&bad) = fitness.iter().find(|f| !f.is_finite() || **f < 0.0) {
            return Err(ConfigError::InvalidParameter(format!(
                "fitness {bad} must be finite and non-negative"
            )));
        }
        Ok(Self {
            loci,
            fitness,
            wildtype,
            sub_pops: Vec::new(),
            field: DEFAULT_FITNESS_FIELD.to_string(),
        })
    }

    pub fn with_sub_pops(mut self, sub_pops: Vec<usize>) -> Self {
        self.sub_pops = sub_pops;
        self
    }

    pub fn with_output_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }
}

impl Selector for MultiAlleleSelector {
    fn ind_fitness(
        &self,
        individual: &Individual,
        _generation: u64,
    ) -> Result<FitnessValue, EvalError> {
        let mut index = 0usize;
        for &locus in &self.loci {
            let (a, b) = locus_pair(individual, locus)?;
            let non_wildtype = usize::from(!self.wildtype.contains(&a))
                + usize::from(!self.wildtype.contains(&b));
            index = index * 3 + non_wildtype;
        }
        Ok(FitnessValue::new(self.fitness[index]))
    }

    fn sub_pops(&self) -> &[usize] {
        &self.sub_pops
    }

    fn output_field(&self) -> &str {
        &self.field
    }

    fn clone_box(&self) -> Box<dyn Selector> {
        Box::new(self.clone())
    }
}

/// External fitness function, injected by the embedding runtime.
///
/// The callback receives the individual's alleles at the declared loci,
/// ploidy-major (`locus 0 copy 0, locus 0 copy 1, locus 1 copy 0, ...`),
/// plus the generation number, and returns one numeric fitness. The core
/// treats it as a black box.
pub type FitnessCallback = Arc<dyn Fn(&[Allele], u64) -> Result<f64, String> + Send + Sync>;

/// Selection using an external callback.
///
/// Any callback failure, and any negative or non-finite return, propagates
/// as an evaluation error rather than a silent default.
#[derive(Clone)]
pub struct CallbackSelector {
    loci: Vec<usize>,
    callback: FitnessCallback,
    sub_pops: Vec<usize>,
    field: String,
}

impl CallbackSelector {
    pub fn new(loci: Vec<usize>, callback: FitnessCallback) -> Result<Self, ConfigError> {
        if loci.is_empty() {
            return Err(ConfigError::Empty("loci"));
        }
        Ok(Self {
            loci,
            callback,
            sub_pops: Vec::new(),
            field: DEFAULT_FITNESS_FIELD.to_string(),
        })
    }

    pub fn with_sub_pops(mut self, sub_pops: Vec<usize>) -> Self {
        self.sub_pops = sub_pops;
        self
    }

    pub fn with_output_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }
}

impl fmt::Debug for CallbackSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSelector")
            .field("loci", &self.loci)
            .field("sub_pops", &self.sub_pops)
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}

impl Selector for CallbackSelector {
    fn ind_fitness(
        &self,
        individual: &Individual,
        generation: u64,
    ) -> Result<FitnessValue, EvalError> {
        let mut alleles = Vec::with_capacity(PLOIDY * self.loci.len());
        for &locus in &self.loci {
            let (a, b) = locus_pair(individual, locus)?;
            alleles.push(a);
            alleles.push(b);
        }
        let fitness = (self.callback)(&alleles, generation).map_err(EvalError::Callback)?;
        if !fitness.is_finite() || fitness < 0.0 {
            return Err(EvalError::InvalidFitness(fitness));
        }
        Ok(FitnessValue::new(fitness))
    }

    fn sub_pops(&self) -> &[usize] {
        &self.sub_pops
    }

    fn output_field(&self) -> &str {
        &self.field
    }

    fn clone_box(&self) -> Box<dyn Selector> {
        Box::new(self.clone())
    }
}

/// A child model of a [`MultiLocusSelector`].
///
/// The variants deliberately exclude `MultiLocusSelector` itself: the
/// no-nesting restriction is enforced by the type system rather than a
/// runtime check.
#[derive(Debug, Clone)]
pub enum LocusModel {
    Map(MapSelector),
    MultiAllele(MultiAlleleSelector),
    Callback(CallbackSelector),
}

impl LocusModel {
    fn ind_fitness(
        &self,
        individual: &Individual,
        generation: u64,
    ) -> Result<FitnessValue, EvalError> {
        match self {
            LocusModel::Map(s) => s.ind_fitness(individual, generation),
            LocusModel::MultiAllele(s) => s.ind_fitness(individual, generation),
            LocusModel::Callback(s) => s.ind_fitness(individual, generation),
        }
    }
}

impl From<MapSelector> for LocusModel {
    fn from(s: MapSelector) -> Self {
        LocusModel::Map(s)
    }
}

impl From<MultiAlleleSelector> for LocusModel {
    fn from(s: MultiAlleleSelector) -> Self {
        LocusModel::MultiAllele(s)
    }
}

impl From<CallbackSelector> for LocusModel {
    fn from(s: CallbackSelector) -> Self {
        LocusModel::Callback(s)
    }
}

/// How a [`MultiLocusSelector`] combines its children's fitness values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// `f = prod(f_i)`
    Multiplicative,
    /// `f = max(0, 1 - sum(1 - f_i))`: selection coefficients add, and the
    /// result floors at zero.
    Additive,
}

/// Selection over multiple loci by composing child models.
#[derive(Debug, Clone)]
pub struct MultiLocusSelector {
    models: Vec<LocusModel>,
    mode: SelectionMode,
    sub_pops: Vec<usize>,
    field: String,
}

impl MultiLocusSelector {
    pub fn new(
        models: impl IntoIterator<Item = LocusModel>,
        mode: SelectionMode,
    ) -> Result<Self, ConfigError> {
        let models: Vec<LocusModel> = models.into_iter().collect();
        if models.is_empty() {
            return Err(ConfigError::Empty("models"));
        }
        Ok(Self {
            models,
            mode,
            sub_pops: Vec::new(),
            field: DEFAULT_FITNESS_FIELD.to_string(),
        })
    }

    pub fn with_sub_pops(mut self, sub_pops: Vec<usize>) -> Self {
        self.sub_pops = sub_pops;
        self
    }

    pub fn with_output_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }
}

impl Selector for MultiLocusSelector {
    fn ind_fitness(
        &self,
        individual: &Individual,
        generation: u64,
    ) -> Result<FitnessValue, EvalError> {
        match self.mode {
            SelectionMode::Multiplicative => {
                let mut fitness = FitnessValue::NEUTRAL;
                for model in &self.models {
                    fitness = fitness * model.ind_fitness(individual, generation)?;
                }
                Ok(fitness)
            }
            SelectionMode::Additive => {
                let mut coefficient_sum = 0.0;
                for model in &self.models {
                    coefficient_sum += model
                        .ind_fitness(individual, generation)?
                        .selection_coefficient();
                }
                Ok(FitnessValue::new(1.0 - coefficient_sum))
            }
        }
    }

    fn sub_pops(&self) -> &[usize] {
        &self.sub_pops
    }

    fn output_field(&self) -> &str {
        &self.field
    }

    fn clone_box(&self) -> Box<dyn Selector> {
        Box::new(self.clone())
    }
}
