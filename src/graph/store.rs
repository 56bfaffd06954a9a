//! Canonical undirected, unweighted, simple graph with string node labels

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// Node-labelled simple undirected graph shared by every strategy
///
/// Construction goes through [`GraphBuilder`](crate::graph::GraphBuilder) or
/// [`GraphStore::from_edges`]; once built the store is read-only. Node
/// iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    graph: UnGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl GraphStore {
    /// Empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from label pairs; duplicates collapse and self-loops are dropped
    pub fn from_edges<S: AsRef<str>>(edges: &[(S, S)]) -> Self {
        let mut store = Self::new();
        for (a, b) in edges {
            let (a, b) = (a.as_ref(), b.as_ref());
            if a == b {
                continue;
            }
            store.insert_edge(a, b);
        }
        store
    }

    pub(crate) fn insert_node(&mut self, label: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(label) {
            return idx;
        }
        let idx = self.graph.add_node(label.to_string());
        self.index.insert(label.to_string(), idx);
        idx
    }

    /// Add an edge between two distinct labels; returns false for self-loops and duplicates
    pub(crate) fn insert_edge(&mut self, a: &str, b: &str) -> bool {
        if a == b {
            return false;
        }
        let ia = self.insert_node(a);
        let ib = self.insert_node(b);
        if self.graph.find_edge(ia, ib).is_some() {
            return false;
        }
        self.graph.add_edge(ia, ib, ());
        true
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Node labels in insertion order
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_indices().map(move |idx| self.graph[idx].as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Each undirected edge once, as a pair of labels
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.graph.edge_references().map(move |edge| {
            (
                self.graph[edge.source()].as_str(),
                self.graph[edge.target()].as_str(),
            )
        })
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        match (self.node_index(a), self.node_index(b)) {
            (Some(ia), Some(ib)) => self.graph.find_edge(ia, ib).is_some(),
            _ => false,
        }
    }

    /// Neighbours of a node; empty if the label is unknown
    pub fn neighbors(&self, label: &str) -> Vec<&str> {
        match self.node_index(label) {
            Some(idx) => self
                .graph
                .neighbors(idx)
                .map(|n| self.graph[n].as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn degree(&self, label: &str) -> usize {
        self.node_index(label)
            .map(|idx| self.graph.neighbors(idx).count())
            .unwrap_or(0)
    }

    /// Underlying petgraph structure
    pub fn as_petgraph(&self) -> &UnGraph<String, ()> {
        &self.graph
    }

    pub(crate) fn node_index(&self, label: &str) -> Option<NodeIndex> {
        self.index.get(label).copied()
    }

    /// Subgraph induced by `keep`, preserving the relative node order
    pub(crate) fn induced_subgraph(&self, keep: &HashSet<NodeIndex>) -> GraphStore {
        let graph = self.graph.filter_map(
            |idx, label| keep.contains(&idx).then(|| label.clone()),
            |_, _| Some(()),
        );
        Self::from_petgraph(graph)
    }

    pub(crate) fn from_petgraph(graph: UnGraph<String, ()>) -> GraphStore {
        let index = graph
            .node_indices()
            .map(|idx| (graph[idx].clone(), idx))
            .collect();
        GraphStore { graph, index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges_collapses_duplicates() {
        let graph = GraphStore::from_edges(&[("A", "B"), ("B", "A"), ("A", "B"), ("B", "C")]);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.has_edge("A", "B"));
        assert!(graph.has_edge("C", "B"));
        assert!(!graph.has_edge("A", "C"));
        assert!(!graph.has_edge("A", "Z"));
        assert_eq!(graph.degree("Z"), 0);
        assert!(graph.neighbors("Z").is_empty());
    }

    #[test]
    fn test_from_edges_drops_self_loops() {
        let graph = GraphStore::from_edges(&[("A", "A"), ("A", "B")]);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.degree("A"), 1);
    }

    #[test]
    fn test_labels_follow_insertion_order() {
        let graph = GraphStore::from_edges(&[("z", "a"), ("m", "z")]);
        let labels: Vec<&str> = graph.labels().collect();
        assert_eq!(labels, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_induced_subgraph_keeps_internal_edges() {
        let graph = GraphStore::from_edges(&[("A", "B"), ("B", "C"), ("C", "D")]);
        let keep: HashSet<NodeIndex> = ["A", "B", "C"]
            .iter()
            .filter_map(|l| graph.node_index(l))
            .collect();
        let sub = graph.induced_subgraph(&keep);
        assert_eq!(sub.node_count(), 3);
        assert_eq!(sub.edge_count(), 2);
        assert!(!sub.contains("D"));
        assert_eq!(sub.neighbors("C"), vec!["B"]);
    }
}
