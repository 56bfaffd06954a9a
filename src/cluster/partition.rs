//! Partition of graph nodes into labelled groups

use crate::graph::GraphStore;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered sequence of node-label groups; empty groups are never stored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Partition {
    groups: Vec<Vec<String>>,
}

impl Partition {
    /// Build from groups, dropping any that are empty
    pub fn new<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        Self {
            groups: groups.into_iter().filter(|g| !g.is_empty()).collect(),
        }
    }

    /// One group per node, in the graph's node order
    pub fn singletons(graph: &GraphStore) -> Self {
        Self::new(graph.labels().map(|label| vec![label.to_string()]))
    }

    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<Vec<String>> {
        self.groups
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vec<String>> + '_ {
        self.groups.iter()
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of members over all groups
    pub fn member_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// True when no label appears twice
    pub fn is_disjoint(&self) -> bool {
        let mut seen = HashSet::new();
        self.groups.iter().flatten().all(|label| seen.insert(label))
    }

    /// Keep each label only in the first group that lists it
    pub fn into_disjoint(self) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        Self::new(self.groups.into_iter().map(|group| {
            group
                .into_iter()
                .filter(|label| seen.insert(label.clone()))
                .collect()
        }))
    }

    /// Stable sort by non-increasing group size
    pub fn sort_by_size_desc(&mut self) {
        self.groups.sort_by(|a, b| b.len().cmp(&a.len()));
    }

    /// Order-insensitive form: members sorted within groups, groups sorted
    pub fn canonical(&self) -> Vec<Vec<String>> {
        let mut groups: Vec<Vec<String>> = self
            .groups
            .iter()
            .map(|g| {
                let mut g = g.clone();
                g.sort_unstable();
                g
            })
            .collect();
        groups.sort_unstable();
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|g| g.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_empty_groups_dropped() {
        let partition = Partition::new(groups(&[&["A"], &[], &["B", "C"]]));
        assert_eq!(partition.len(), 2);
        assert_eq!(partition.member_count(), 3);
    }

    #[test]
    fn test_into_disjoint_keeps_first_claim() {
        let partition = Partition::new(groups(&[&["A", "B"], &["B"], &["B", "C"]]));
        assert!(!partition.is_disjoint());
        let fixed = partition.into_disjoint();
        assert!(fixed.is_disjoint());
        assert_eq!(fixed.groups(), groups(&[&["A", "B"], &["C"]]).as_slice());
    }

    #[test]
    fn test_sort_by_size_is_stable() {
        let mut partition = Partition::new(groups(&[&["A"], &["B", "C"], &["D"], &["E", "F"]]));
        partition.sort_by_size_desc();
        assert_eq!(
            partition.groups(),
            groups(&[&["B", "C"], &["E", "F"], &["A"], &["D"]]).as_slice()
        );
    }

    #[test]
    fn test_canonical_ignores_order() {
        let a = Partition::new(groups(&[&["B", "A"], &["C"]]));
        let b = Partition::new(groups(&[&["C"], &["A", "B"]]));
        assert_eq!(a.canonical(), b.canonical());
    }

    #[test]
    fn test_serializes_as_nested_lists() {
        let partition = Partition::new(groups(&[&["A", "B"], &["C"]]));
        let json = serde_json::to_string(&partition).unwrap();
        assert_eq!(json, r#"[["A","B"],["C"]]"#);
    }
}
