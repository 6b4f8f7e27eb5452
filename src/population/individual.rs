//! A diploid individual with the state the evaluation engines read.

use crate::base::{Allele, Sex, PLOIDY};
use crate::errors::EvalError;
use std::collections::HashMap;
use std::sync::Arc;

/// An individual organism with a diploid genotype.
///
/// `Individual` carries two allele vectors (one per chromosome copy), a sex,
/// an affection flag, a mapping from information-field name to numeric value,
/// and the visibility flag splitter activation toggles. The `id` is stored in
/// an `Arc<str>` so cloning individuals is cheap for the identifier field.
#[derive(Debug, Clone)]
pub struct Individual {
    /// Unique identifier
    id: Arc<str>,
    sex: Sex,
    affected: bool,
    /// Visibility flag, toggled exclusively by splitter activation.
    visible: bool,
    /// Alleles on the first chromosome copy, indexed by locus.
    copy1: Vec<Allele>,
    /// Alleles on the second chromosome copy, indexed by locus.
    copy2: Vec<Allele>,
    /// Named numeric information fields (fitness is written here).
    info: HashMap<String, f64>,
}

impl Individual {
    /// Create a new `Individual` from two allele vectors.
    ///
    /// The two vectors are expected to have equal length; locus coordinates
    /// beyond either vector error at access time. Individuals start
    /// unaffected, visible, and with no information fields.
    pub fn new(
        id: impl Into<Arc<str>>,
        sex: Sex,
        copy1: Vec<Allele>,
        copy2: Vec<Allele>,
    ) -> Self {
        Self {
            id: id.into(),
            sex,
            affected: false,
            visible: true,
            copy1,
            copy2,
            info: HashMap::new(),
        }
    }

    /// Set the affection flag, builder style.
    pub fn with_affected(mut self, affected: bool) -> Self {
        self.affected = affected;
        self
    }

    /// Set an information field, builder style.
    pub fn with_info(mut self, field: impl Into<String>, value: f64) -> Self {
        self.info.insert(field.into(), value);
        self
    }

    /// Return the individual's identifier as a `&str`.
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn sex(&self) -> Sex {
        self.sex
    }

    #[inline]
    pub fn is_affected(&self) -> bool {
        self.affected
    }

    #[inline]
    pub fn set_affected(&mut self, affected: bool) {
        self.affected = affected;
    }

    /// Whether the individual is currently visible to operators.
    #[inline]
    pub fn visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Number of loci in the genotype.
    ///
    /// If the two copies disagree in length, the shorter one bounds the
    /// addressable loci.
    pub fn num_loci(&self) -> usize {
        self.copy1.len().min(self.copy2.len())
    }

    /// Read the allele at a `(locus, copy)` coordinate.
    pub fn allele(&self, locus: usize, copy: usize) -> Result<Allele, EvalError> {
        if copy >= PLOIDY {
            return Err(EvalError::CopyOutOfRange { copy });
        }
        let genome = if copy == 0 { &self.copy1 } else { &self.copy2 };
        genome
            .get(locus)
            .copied()
            .ok_or(EvalError::LocusOutOfRange {
                locus,
                num_loci: genome.len(),
            })
    }

    /// Read a named information field.
    pub fn info(&self, field: &str) -> Result<f64, EvalError> {
        self.info
            .get(field)
            .copied()
            .ok_or_else(|| EvalError::MissingInfoField(field.to_string()))
    }

    /// Write a named information field, creating it if absent.
    pub fn set_info(&mut self, field: &str, value: f64) {
        self.info.insert(field.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_individual() -> Individual {
        Individual::new("ind1", Sex::Male, vec![0, 1, 2], vec![1, 1, 0])
    }

    #[test]
    fn test_new_defaults() {
        let ind = test_individual();
        assert_eq!(ind.id(), "ind1");
        assert_eq!(ind.sex(), Sex::Male);
        assert!(!ind.is_affected());
        assert!(ind.visible());
        assert_eq!(ind.num_loci(), 3);
    }

    #[test]
    fn test_allele_access() {
        let ind = test_individual();
        assert_eq!(ind.allele(0, 0).unwrap(), 0);
        assert_eq!(ind.allele(0, 1).unwrap(), 1);
        assert_eq!(ind.allele(2, 0).unwrap(), 2);
        assert_eq!(ind.allele(2, 1).unwrap(), 0);
    }

    #[test]
    fn test_allele_locus_out_of_range() {
        let ind = test_individual();
        assert_eq!(
            ind.allele(3, 0),
            Err(EvalError::LocusOutOfRange {
                locus: 3,
                num_loci: 3
            })
        );
    }

    #[test]
    fn test_allele_copy_out_of_range() {
        let ind = test_individual();
        assert_eq!(ind.allele(0, 2), Err(EvalError::CopyOutOfRange { copy: 2 }));
    }

    #[test]
    fn test_info_read_write() {
        let mut ind = test_individual();
        assert_eq!(
            ind.info("fitness"),
            Err(EvalError::MissingInfoField("fitness".to_string()))
        );
        ind.set_info("fitness", 0.5);
        assert_eq!(ind.info("fitness").unwrap(), 0.5);
        ind.set_info("fitness", 0.9);
        assert_eq!(ind.info("fitness").unwrap(), 0.9);
    }

    #[test]
    fn test_with_info_builder() {
        let ind = test_individual().with_info("age", 3.0).with_affected(true);
        assert_eq!(ind.info("age").unwrap(), 3.0);
        assert!(ind.is_affected());
    }

    #[test]
    fn test_visibility_toggle() {
        let mut ind = test_individual();
        ind.set_visible(false);
        assert!(!ind.visible());
        ind.set_visible(true);
        assert!(ind.visible());
    }

    #[test]
    fn test_clone_is_independent() {
        let ind1 = test_individual();
        let mut ind2 = ind1.clone();
        ind2.set_info("fitness", 0.1);
        ind2.set_visible(false);
        assert!(ind1.info("fitness").is_err());
        assert!(ind1.visible());
    }
}
