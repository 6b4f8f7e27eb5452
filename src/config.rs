//! Declarative splitter and selector configuration.
//!
//! Drivers describe partitioning schemes and fitness models as plain data
//! (deserializable from JSON/TOML), then `build()` validated engine objects
//! before any generation is simulated. Malformed parameters surface here as
//! [`ConfigError`]s. The callback selector wraps an injected function and is
//! deliberately absent: it cannot be described as data.

use crate::base::Allele;
use crate::errors::ConfigError;
use crate::selection::{
    LocusModel, MapSelector, MultiAlleleSelector, MultiLocusSelector, SelectionMode, Selector,
};
use crate::vsp::{
    AffectionSplitter, CombinedSplitter, GenotypeSplitter, InfoSplitter, ProductSplitter,
    ProportionSplitter, RangeSplitter, SexSplitter, Splitter,
};
use serde::{Deserialize, Serialize};

fn default_fitness_field() -> String {
    crate::base::DEFAULT_FITNESS_FIELD.to_string()
}

/// Declarative description of a splitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SplitterSpec {
    Sex {
        #[serde(default)]
        names: Vec<String>,
    },
    Affection {
        #[serde(default)]
        names: Vec<String>,
    },
    InfoValues {
        field: String,
        values: Vec<f64>,
        #[serde(default)]
        names: Vec<String>,
    },
    InfoCutoffs {
        field: String,
        cutoffs: Vec<f64>,
        #[serde(default)]
        names: Vec<String>,
    },
    InfoRanges {
        field: String,
        ranges: Vec<[f64; 2]>,
        #[serde(default)]
        names: Vec<String>,
    },
    Proportion {
        proportions: Vec<f64>,
        #[serde(default)]
        names: Vec<String>,
    },
    Range {
        ranges: Vec<[usize; 2]>,
        #[serde(default)]
        names: Vec<String>,
    },
    Genotype {
        loci: Vec<usize>,
        genotypes: Vec<Vec<Allele>>,
        #[serde(default)]
        phase: bool,
        #[serde(default)]
        names: Vec<String>,
    },
    Combined {
        splitters: Vec<SplitterSpec>,
        #[serde(default)]
        unions: Vec<Vec<usize>>,
        #[serde(default)]
        names: Vec<String>,
    },
    Product {
        splitters: Vec<SplitterSpec>,
        #[serde(default)]
        names: Vec<String>,
    },
}

impl SplitterSpec {
    /// Build a validated splitter from this description.
    pub fn build(&self) -> Result<Box<dyn Splitter>, ConfigError> {
        fn named<S: Splitter + 'static>(
            splitter: S,
            names: &[String],
            with_names: impl FnOnce(S, Vec<String>) -> Result<S, ConfigError>,
        ) -> Result<Box<dyn Splitter>, ConfigError> {
            if names.is_empty() {
                Ok(Box::new(splitter))
            } else {
                Ok(Box::new(with_names(splitter, names.to_vec())?))
            }
        }

        match self {
            SplitterSpec::Sex { names } => named(SexSplitter::new(), names, SexSplitter::with_names),
            SplitterSpec::Affection { names } => {
                named(AffectionSplitter::new(), names, AffectionSplitter::with_names)
            }
            SplitterSpec::InfoValues {
                field,
                values,
                names,
            } => named(
                InfoSplitter::by_values(field.clone(), values.clone())?,
                names,
                InfoSplitter::with_names,
            ),
            SplitterSpec::InfoCutoffs {
                field,
                cutoffs,
                names,
            } => named(
                InfoSplitter::by_cutoffs(field.clone(), cutoffs.clone())?,
                names,
                InfoSplitter::with_names,
            ),
            SplitterSpec::InfoRanges {
                field,
                ranges,
                names,
            } => named(
                InfoSplitter::by_ranges(field.clone(), ranges.clone())?,
                names,
                InfoSplitter::with_names,
            ),
            SplitterSpec::Proportion { proportions, names } => named(
                ProportionSplitter::new(proportions.clone())?,
                names,
                ProportionSplitter::with_names,
            ),
            SplitterSpec::Range { ranges, names } => named(
                RangeSplitter::new(ranges.clone())?,
                names,
                RangeSplitter::with_names,
            ),
            SplitterSpec::Genotype {
                loci,
                genotypes,
                phase,
                names,
            } => named(
                GenotypeSplitter::new(loci.clone(), genotypes.clone(), *phase)?,
                names,
                GenotypeSplitter::with_names,
            ),
            SplitterSpec::Combined {
                splitters,
                unions,
                names,
            } => {
                let children = splitters
                    .iter()
                    .map(SplitterSpec::build)
                    .collect::<Result<Vec<_>, _>>()?;
                named(
                    CombinedSplitter::with_unions(children, unions.clone())?,
                    names,
                    CombinedSplitter::with_names,
                )
            }
            SplitterSpec::Product { splitters, names } => {
                let children = splitters
                    .iter()
                    .map(SplitterSpec::build)
                    .collect::<Result<Vec<_>, _>>()?;
                named(
                    ProductSplitter::new(children)?,
                    names,
                    ProductSplitter::with_names,
                )
            }
        }
    }
}

/// Declarative description of a genotype-dictionary model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSpec {
    pub loci: Vec<usize>,
    /// Genotype keys paired with fitness values.
    pub table: Vec<(Vec<Allele>, f64)>,
    #[serde(default)]
    pub phase: bool,
}

impl MapSpec {
    fn build(&self) -> Result<MapSelector, ConfigError> {
        MapSelector::new(self.loci.clone(), self.table.iter().cloned(), self.phase)
    }
}

/// Declarative description of a wildtype/disease-allele model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiAlleleSpec {
    pub loci: Vec<usize>,
    pub fitness: Vec<f64>,
    /// Wildtype allele set; allele 0 when omitted.
    #[serde(default)]
    pub wildtype: Option<Vec<Allele>>,
}

impl MultiAlleleSpec {
    fn build(&self) -> Result<MultiAlleleSelector, ConfigError> {
        match &self.wildtype {
            Some(wildtype) => MultiAlleleSelector::with_wildtype(
                self.loci.clone(),
                self.fitness.clone(),
                wildtype.clone(),
            ),
            None => MultiAlleleSelector::new(self.loci.clone(), self.fitness.clone()),
        }
    }
}

/// A child model of a multi-locus composition. Multi-locus specs cannot
/// nest, matching the engine's structural restriction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum LocusModelSpec {
    Map(MapSpec),
    MultiAllele(MultiAlleleSpec),
}

impl LocusModelSpec {
    fn build(&self) -> Result<LocusModel, ConfigError> {
        Ok(match self {
            LocusModelSpec::Map(spec) => spec.build()?.into(),
            LocusModelSpec::MultiAllele(spec) => spec.build()?.into(),
        })
    }
}

/// The fitness model of a [`SelectorSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum SelectorModelSpec {
    Map(MapSpec),
    MultiAllele(MultiAlleleSpec),
    MultiLocus {
        models: Vec<LocusModelSpec>,
        mode: SelectionMode,
    },
}

/// Declarative description of a selector: a model plus scope and output
/// field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorSpec {
    #[serde(flatten)]
    pub model: SelectorModelSpec,
    /// Subpopulations the selector applies to; empty means all.
    #[serde(default)]
    pub sub_pops: Vec<usize>,
    /// Information field the fitness value is written into.
    #[serde(default = "default_fitness_field")]
    pub field: String,
}

impl SelectorSpec {
    /// Build a validated selector from this description.
    pub fn build(&self) -> Result<Box<dyn Selector>, ConfigError> {
        let selector: Box<dyn Selector> = match &self.model {
            SelectorModelSpec::Map(spec) => Box::new(
                spec.build()?
                    .with_sub_pops(self.sub_pops.clone())
                    .with_output_field(self.field.clone()),
            ),
            SelectorModelSpec::MultiAllele(spec) => Box::new(
                spec.build()?
                    .with_sub_pops(self.sub_pops.clone())
                    .with_output_field(self.field.clone()),
            ),
            SelectorModelSpec::MultiLocus { models, mode } => {
                let children = models
                    .iter()
                    .map(LocusModelSpec::build)
                    .collect::<Result<Vec<_>, _>>()?;
                Box::new(
                    MultiLocusSelector::new(children, *mode)?
                        .with_sub_pops(self.sub_pops.clone())
                        .with_output_field(self.field.clone()),
                )
            }
        };
        Ok(selector)
    }
}
