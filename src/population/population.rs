//! Population container with ordered subpopulations.

use crate::errors::UsageError;
use crate::population::Individual;
use std::sync::Arc;

/// A population of diploid individuals grouped into ordered subpopulations.
///
/// Individuals keep a stable storage order within each subpopulation; range
/// and proportion splitters depend on it. All splitter and selector indices
/// are relative to a subpopulation.
#[derive(Debug, Clone)]
pub struct Population {
    /// Population ID
    id: Arc<str>,
    /// Generation counter, fed to time-varying fitness models
    generation: u64,
    /// The subpopulations, each an ordered list of individuals
    sub_pops: Vec<Vec<Individual>>,
}

impl Population {
    /// Create a new population from subpopulations of individuals.
    pub fn new(id: impl Into<Arc<str>>, sub_pops: Vec<Vec<Individual>>) -> Self {
        Self {
            id: id.into(),
            generation: 0,
            sub_pops,
        }
    }

    /// Get population ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the current generation number.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Set the generation counter.
    pub fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    /// Increment the generation counter.
    pub fn increment_generation(&mut self) {
        self.generation += 1;
    }

    /// Number of subpopulations.
    pub fn num_sub_pops(&self) -> usize {
        self.sub_pops.len()
    }

    /// Total number of individuals across all subpopulations.
    pub fn total_size(&self) -> usize {
        self.sub_pops.iter().map(Vec::len).sum()
    }

    /// Check if the population has no individuals.
    pub fn is_empty(&self) -> bool {
        self.total_size() == 0
    }

    /// Number of individuals in one subpopulation.
    pub fn sub_pop_size(&self, sub_pop: usize) -> Result<usize, UsageError> {
        self.sub_pop(sub_pop).map(<[Individual]>::len)
    }

    /// Borrow one subpopulation's individuals in storage order.
    pub fn sub_pop(&self, sub_pop: usize) -> Result<&[Individual], UsageError> {
        self.sub_pops
            .get(sub_pop)
            .map(Vec::as_slice)
            .ok_or(UsageError::SubPopOutOfRange {
                sub_pop,
                count: self.sub_pops.len(),
            })
    }

    /// Borrow one subpopulation's individuals mutably.
    pub fn sub_pop_mut(&mut self, sub_pop: usize) -> Result<&mut [Individual], UsageError> {
        let count = self.sub_pops.len();
        self.sub_pops
            .get_mut(sub_pop)
            .map(Vec::as_mut_slice)
            .ok_or(UsageError::SubPopOutOfRange { sub_pop, count })
    }

    /// Borrow one individual by subpopulation-relative index.
    pub fn individual(&self, sub_pop: usize, index: usize) -> Result<&Individual, UsageError> {
        let inds = self.sub_pop(sub_pop)?;
        inds.get(index).ok_or(UsageError::IndividualOutOfRange {
            index,
            size: inds.len(),
        })
    }

    /// Borrow one individual mutably by subpopulation-relative index.
    pub fn individual_mut(
        &mut self,
        sub_pop: usize,
        index: usize,
    ) -> Result<&mut Individual, UsageError> {
        let inds = self.sub_pop_mut(sub_pop)?;
        let size = inds.len();
        inds.get_mut(index)
            .ok_or(UsageError::IndividualOutOfRange { index, size })
    }

    /// Make every individual of a subpopulation visible again.
    pub fn reset_visibility(&mut self, sub_pop: usize) -> Result<(), UsageError> {
        for ind in self.sub_pop_mut(sub_pop)? {
            ind.set_visible(true);
        }
        Ok(())
    }

    /// Number of currently visible individuals in a subpopulation.
    pub fn num_visible(&self, sub_pop: usize) -> Result<usize, UsageError> {
        Ok(self
            .sub_pop(sub_pop)?
            .iter()
            .filter(|ind| ind.visible())
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Sex;

    fn test_individual(id: &str, sex: Sex) -> Individual {
        Individual::new(id, sex, vec![0, 0], vec![0, 0])
    }

    fn test_population() -> Population {
        Population::new(
            "pop1",
            vec![
                vec![
                    test_individual("a", Sex::Male),
                    test_individual("b", Sex::Female),
                ],
                vec![test_individual("c", Sex::Female)],
            ],
        )
    }

    #[test]
    fn test_population_new() {
        let pop = test_population();
        assert_eq!(pop.id(), "pop1");
        assert_eq!(pop.generation(), 0);
        assert_eq!(pop.num_sub_pops(), 2);
        assert_eq!(pop.total_size(), 3);
        assert!(!pop.is_empty());
    }

    #[test]
    fn test_generation_counter() {
        let mut pop = test_population();
        pop.increment_generation();
        pop.increment_generation();
        assert_eq!(pop.generation(), 2);
        pop.set_generation(10);
        assert_eq!(pop.generation(), 10);
    }

    #[test]
    fn test_sub_pop_access() {
        let pop = test_population();
        assert_eq!(pop.sub_pop_size(0).unwrap(), 2);
        assert_eq!(pop.sub_pop_size(1).unwrap(), 1);
        assert_eq!(
            pop.sub_pop_size(2),
            Err(UsageError::SubPopOutOfRange {
                sub_pop: 2,
                count: 2
            })
        );
    }

    #[test]
    fn test_individual_access() {
        let pop = test_population();
        assert_eq!(pop.individual(0, 1).unwrap().id(), "b");
        assert_eq!(
            pop.individual(1, 5).unwrap_err(),
            UsageError::IndividualOutOfRange { index: 5, size: 1 }
        );
    }

    #[test]
    fn test_reset_visibility() {
        let mut pop = test_population();
        pop.individual_mut(0, 0).unwrap().set_visible(false);
        assert_eq!(pop.num_visible(0).unwrap(), 1);
        pop.reset_visibility(0).unwrap();
        assert_eq!(pop.num_visible(0).unwrap(), 2);
    }

    #[test]
    fn test_empty_population() {
        let pop = Population::new("empty", Vec::new());
        assert_eq!(pop.num_sub_pops(), 0);
        assert!(pop.is_empty());
    }
}
