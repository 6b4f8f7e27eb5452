//! The selector capability contract.

use crate::base::FitnessValue;
use crate::errors::{EvalError, UsageError};
use crate::population::{Individual, Population};
use rayon::prelude::*;
use std::fmt;

/// Contract every fitness model satisfies.
///
/// A selector computes one non-negative fitness value per individual and,
/// through [`apply`](Selector::apply), stores it into its output information
/// field for every currently visible individual of every subpopulation in
/// scope. Selectors never own the population they are applied to.
pub trait Selector: Send + Sync + fmt::Debug {
    /// Fitness of one individual at the given generation.
    ///
    /// Pure function of the individual's state and the generation number;
    /// evaluation failures propagate instead of substituting a default.
    fn ind_fitness(&self, individual: &Individual, generation: u64)
        -> Result<FitnessValue, EvalError>;

    /// Subpopulations this selector applies to. Empty means all.
    fn sub_pops(&self) -> &[usize];

    /// Information field the fitness value is written into.
    fn output_field(&self) -> &str;

    /// Deep copy of the selector.
    fn clone_box(&self) -> Box<dyn Selector>;

    /// Evaluate and store fitness for every visible individual in scope.
    ///
    /// Individuals are evaluated in parallel; each write targets a distinct
    /// individual. The first error aborts the run and propagates. Writes
    /// completed before the error remain — callers needing atomicity must
    /// snapshot externally.
    fn apply(&self, pop: &mut Population) -> Result<(), EvalError> {
        let generation = pop.generation();
        let targets: Vec<usize> = if self.sub_pops().is_empty() {
            (0..pop.num_sub_pops()).collect()
        } else {
            self.sub_pops().to_vec()
        };
        for sub_pop in targets {
            if sub_pop >= pop.num_sub_pops() {
                return Err(UsageError::SubPopOutOfRange {
                    sub_pop,
                    count: pop.num_sub_pops(),
                }
                .into());
            }
            let field = self.output_field().to_string();
            pop.sub_pop_mut(sub_pop)?
                .par_iter_mut()
                .filter(|ind| ind.visible())
                .try_for_each(|ind| -> Result<(), EvalError> {
                    let fitness = self.ind_fitness(ind, generation)?;
                    ind.set_info(&field, fitness.get());
                    Ok(())
                })?;
        }
        Ok(())
    }
}

impl Clone for Box<dyn Selector> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
