//! VSP identities and ordered VSP selections.

use crate::population::Population;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a (virtual) subpopulation: a subpopulation index and an
/// optional virtual-subpopulation index.
///
/// An id without a subpopulation index is invalid and is rejected by every
/// operation that would dereference it. An id with a subpopulation index but
/// no virtual index designates the whole subpopulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VspId {
    sub_pop: Option<usize>,
    virtual_sub_pop: Option<usize>,
}

impl VspId {
    /// Identity of virtual subpopulation `virtual_sub_pop` within
    /// subpopulation `sub_pop`.
    pub fn new(sub_pop: usize, virtual_sub_pop: usize) -> Self {
        Self {
            sub_pop: Some(sub_pop),
            virtual_sub_pop: Some(virtual_sub_pop),
        }
    }

    /// Identity of a whole (non-virtual) subpopulation.
    pub fn from_sub_pop(sub_pop: usize) -> Self {
        Self {
            sub_pop: Some(sub_pop),
            virtual_sub_pop: None,
        }
    }

    /// An id with both indices unset.
    pub fn unset() -> Self {
        Self {
            sub_pop: None,
            virtual_sub_pop: None,
        }
    }

    pub fn sub_pop(&self) -> Option<usize> {
        self.sub_pop
    }

    pub fn virtual_sub_pop(&self) -> Option<usize> {
        self.virtual_sub_pop
    }

    /// An id is valid iff its subpopulation index is set.
    pub fn valid(&self) -> bool {
        self.sub_pop.is_some()
    }

    /// Whether the id designates a virtual subpopulation rather than a whole
    /// subpopulation.
    pub fn is_virtual(&self) -> bool {
        self.virtual_sub_pop.is_some()
    }
}

impl From<usize> for VspId {
    fn from(sub_pop: usize) -> Self {
        Self::from_sub_pop(sub_pop)
    }
}

impl From<(usize, usize)> for VspId {
    fn from((sub_pop, virtual_sub_pop): (usize, usize)) -> Self {
        Self::new(sub_pop, virtual_sub_pop)
    }
}

impl fmt::Display for VspId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.sub_pop, self.virtual_sub_pop) {
            (Some(sp), Some(v)) => write!(f, "({sp}, {v})"),
            (Some(sp), None) => write!(f, "{sp}"),
            _ => write!(f, "(unset)"),
        }
    }
}

/// An ordered selection of (virtual) subpopulations.
///
/// Drivers build a `VspList` to designate the scope of an operation. The
/// distinguished "all available" mode stores nothing and expands lazily, at
/// use time, into one whole-subpopulation id per actual subpopulation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VspList {
    entries: Vec<VspId>,
    all_avail: bool,
}

impl VspList {
    /// An explicit, possibly empty, list of targets.
    pub fn new(entries: Vec<VspId>) -> Self {
        Self {
            entries,
            all_avail: false,
        }
    }

    /// The "all available subpopulations" selection.
    pub fn all() -> Self {
        Self {
            entries: Vec::new(),
            all_avail: true,
        }
    }

    /// Whether this selection expands against the population at use time.
    pub fn is_all_avail(&self) -> bool {
        self.all_avail
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, vsp: VspId) {
        self.entries.push(vsp);
    }

    pub fn get(&self, index: usize) -> Option<VspId> {
        self.entries.get(index).copied()
    }

    pub fn contains(&self, vsp: &VspId) -> bool {
        self.entries.contains(vsp)
    }

    /// Whether any entry targets the given subpopulation.
    pub fn overlap(&self, sub_pop: usize) -> bool {
        self.entries.iter().any(|v| v.sub_pop() == Some(sub_pop))
    }

    pub fn iter(&self) -> impl Iterator<Item = &VspId> {
        self.entries.iter()
    }

    /// Resolve the selection against a population.
    ///
    /// In "all available" mode this yields one whole-subpopulation id per
    /// actual subpopulation; otherwise the stored entries are returned
    /// unchanged.
    pub fn expand(&self, pop: &Population) -> Vec<VspId> {
        if self.all_avail {
            (0..pop.num_sub_pops()).map(VspId::from_sub_pop).collect()
        } else {
            self.entries.clone()
        }
    }
}

impl From<Vec<VspId>> for VspList {
    fn from(entries: Vec<VspId>) -> Self {
        Self::new(entries)
    }
}

impl FromIterator<VspId> for VspList {
    fn from_iter<I: IntoIterator<Item = VspId>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Sex;
    use crate::population::Individual;

    fn test_population(sizes: &[usize]) -> Population {
        let sub_pops = sizes
            .iter()
            .enumerate()
            .map(|(sp, &n)| {
                (0..n)
                    .map(|i| Individual::new(format!("{sp}-{i}"), Sex::Male, vec![0], vec![0]))
                    .collect()
            })
            .collect();
        Population::new("pop", sub_pops)
    }

    #[test]
    fn test_vsp_id_virtual() {
        let id = VspId::new(1, 2);
        assert!(id.valid());
        assert!(id.is_virtual());
        assert_eq!(id.sub_pop(), Some(1));
        assert_eq!(id.virtual_sub_pop(), Some(2));
    }

    #[test]
    fn test_vsp_id_whole_sub_pop() {
        let id = VspId::from_sub_pop(3);
        assert!(id.valid());
        assert!(!id.is_virtual());
        assert_eq!(id.virtual_sub_pop(), None);
    }

    #[test]
    fn test_vsp_id_unset_is_invalid() {
        let id = VspId::unset();
        assert!(!id.valid());
        assert!(!id.is_virtual());
    }

    #[test]
    fn test_vsp_id_equality() {
        assert_eq!(VspId::new(0, 1), VspId::from((0, 1)));
        assert_ne!(VspId::new(0, 1), VspId::new(0, 2));
        assert_ne!(VspId::new(0, 1), VspId::from_sub_pop(0));
    }

    #[test]
    fn test_vsp_id_display() {
        assert_eq!(VspId::new(0, 1).to_string(), "(0, 1)");
        assert_eq!(VspId::from_sub_pop(2).to_string(), "2");
        assert_eq!(VspId::unset().to_string(), "(unset)");
    }

    #[test]
    fn test_list_push_and_lookup() {
        let mut list = VspList::default();
        list.push(VspId::new(0, 1));
        list.push(VspId::from_sub_pop(1));
        assert_eq!(list.len(), 2);
        assert!(list.contains(&VspId::new(0, 1)));
        assert!(!list.contains(&VspId::new(0, 2)));
        assert!(list.overlap(1));
        assert!(!list.overlap(2));
        assert_eq!(list.get(1), Some(VspId::from_sub_pop(1)));
    }

    #[test]
    fn test_expand_explicit_list_unchanged() {
        let list = VspList::new(vec![VspId::new(1, 0)]);
        let pop = test_population(&[2, 2, 2]);
        assert_eq!(list.expand(&pop), vec![VspId::new(1, 0)]);
    }

    #[test]
    fn test_expand_all_avail() {
        let list = VspList::all();
        assert!(list.is_all_avail());
        assert!(list.is_empty());
        let pop = test_population(&[2, 3]);
        assert_eq!(
            list.expand(&pop),
            vec![VspId::from_sub_pop(0), VspId::from_sub_pop(1)]
        );
    }

    #[test]
    fn test_list_serde_roundtrip() {
        let list = VspList::new(vec![VspId::new(0, 1), VspId::from_sub_pop(2)]);
        let json = serde_json::to_string(&list).unwrap();
        let back: VspList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }
}
