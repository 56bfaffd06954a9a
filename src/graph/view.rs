//! Index-labelled views of a [`GraphStore`] for the numeric routines

use crate::cluster::Partition;
use crate::error::{Error, Result};
use crate::graph::{CompressedGraph, CsrMatrix, GraphStore};
use std::collections::HashMap;

/// Order in which node labels receive their dense indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOrder {
    /// The store's node iteration order
    Insertion,
    /// Lexicographic order of the labels
    Lexicographic,
}

/// Bijection between node labels and `0..n`, plus the adjacency built on it
#[derive(Debug, Clone)]
pub struct IndexedView {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
    edges: Vec<(usize, usize)>,
    adjacency: CompressedGraph,
}

/// Index a graph in its node iteration order
pub fn to_indexed(graph: &GraphStore) -> Result<IndexedView> {
    IndexedView::new(graph, NodeOrder::Insertion)
}

/// Index a graph in lexicographic label order
pub fn to_indexed_sorted(graph: &GraphStore) -> Result<IndexedView> {
    IndexedView::new(graph, NodeOrder::Lexicographic)
}

impl IndexedView {
    /// Build a view; fails with [`Error::EmptyGraph`] on a graph without nodes
    pub fn new(graph: &GraphStore, order: NodeOrder) -> Result<Self> {
        if graph.is_empty() {
            return Err(Error::EmptyGraph);
        }

        let mut labels: Vec<String> = graph.labels().map(str::to_string).collect();
        if order == NodeOrder::Lexicographic {
            labels.sort_unstable();
        }

        let positions: HashMap<String, usize> = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();

        let edges: Vec<(usize, usize)> = graph
            .edges()
            .map(|(a, b)| {
                let (ia, ib) = (positions[a], positions[b]);
                (ia.min(ib), ia.max(ib))
            })
            .collect();

        let adjacency = CompressedGraph::from_edges(labels.len(), &edges);

        Ok(Self {
            labels,
            positions,
            edges,
            adjacency,
        })
    }

    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Undirected edges as `(low, high)` index pairs
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.adjacency.neighbors(index)
    }

    pub fn adjacency(&self) -> &CompressedGraph {
        &self.adjacency
    }

    /// Inverse lookup: index to label
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Labels indexed by position
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// Binary adjacency matrix in compressed sparse row form
    pub fn adjacency_matrix(&self) -> CsrMatrix {
        CsrMatrix::from_adjacency(&self.adjacency)
    }

    /// Translate index groups back to labels, skipping unknown indices
    pub fn groups_to_partition<I>(&self, groups: I) -> Partition
    where
        I: IntoIterator<Item = Vec<usize>>,
    {
        Partition::new(groups.into_iter().map(|group| {
            group
                .into_iter()
                .filter_map(|idx| self.label(idx).map(str::to_string))
                .collect()
        }))
    }

    /// Translate a membership vector (`membership[i]` = community of node i)
    ///
    /// Groups appear in the order their first member appears in the view.
    pub fn membership_to_partition(&self, membership: &[usize]) -> Partition {
        let mut slot: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for (node, &community) in membership.iter().enumerate() {
            let next = groups.len();
            let at = *slot.entry(community).or_insert(next);
            if at == groups.len() {
                groups.push(Vec::new());
            }
            groups[at].push(node);
        }
        self.groups_to_partition(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn path() -> GraphStore {
        GraphStore::from_edges(&[("C", "B"), ("B", "A"), ("A", "D")])
    }

    #[test]
    fn test_insertion_order_indices() {
        let view = to_indexed(&path()).unwrap();
        assert_eq!(view.labels(), &["C", "B", "A", "D"]);
        assert_eq!(view.index_of("A"), Some(2));
        assert_eq!(view.label(3), Some("D"));
        assert_eq!(view.label(4), None);
    }

    #[test]
    fn test_sorted_order_indices() {
        let view = to_indexed_sorted(&path()).unwrap();
        assert_eq!(view.labels(), &["A", "B", "C", "D"]);
        assert_eq!(view.edges().len(), 3);
        assert!(view.adjacency().has_edge(0, 3));
        assert_eq!(view.neighbors(1), &[0, 2]);
    }

    #[test]
    fn test_round_trip_reproduces_labels() {
        let graph = path();
        let view = to_indexed(&graph).unwrap();
        let back: HashSet<&str> = (0..view.node_count())
            .filter_map(|i| view.label(i))
            .collect();
        let original: HashSet<&str> = graph.labels().collect();
        assert_eq!(back, original);
    }

    #[test]
    fn test_empty_graph_is_rejected() {
        assert!(matches!(
            to_indexed(&GraphStore::new()),
            Err(Error::EmptyGraph)
        ));
    }

    #[test]
    fn test_membership_to_partition() {
        let view = to_indexed_sorted(&path()).unwrap();
        let partition = view.membership_to_partition(&[7, 7, 3, 7]);
        assert_eq!(
            partition.groups(),
            &[
                vec!["A".to_string(), "B".to_string(), "D".to_string()],
                vec!["C".to_string()]
            ]
        );
    }

    #[test]
    fn test_groups_skip_unknown_indices() {
        let view = to_indexed_sorted(&path()).unwrap();
        let partition = view.groups_to_partition(vec![vec![0, 9], vec![42]]);
        assert_eq!(partition.groups(), &[vec!["A".to_string()]]);
    }
}
