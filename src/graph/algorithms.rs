//! Connectivity algorithms on the label graph

use crate::graph::GraphStore;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Union-Find data structure for connected component analysis
#[derive(Debug, Clone)]
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of node i)
    parent: Vec<usize>,

    /// Size of each set (for union by size)
    size: Vec<usize>,
}

impl DisjointSets {
    /// Create a new DisjointSets data structure
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            size: vec![1; size],
        }
    }

    /// Find the root of the set containing x with path compression
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Union the sets containing x and y; returns false if already joined
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return false;
        }

        // Attach smaller tree under root of larger tree
        if self.size[root_x] >= self.size[root_y] {
            self.parent[root_y] = root_x;
            self.size[root_x] += self.size[root_y];
        } else {
            self.parent[root_x] = root_y;
            self.size[root_y] += self.size[root_x];
        }
        true
    }

    /// Get the size of the set containing x
    pub fn set_size(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.size[root]
    }

    /// Group `0..n` by set, ordered by each set's smallest member
    pub fn groups(&mut self) -> Vec<Vec<usize>> {
        let mut slot: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for node in 0..self.parent.len() {
            let root = self.find(node);
            let at = *slot.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[at].push(node);
        }
        groups
    }
}

/// Connected components, each listed in node order, ordered by first member
pub fn connected_components(graph: &GraphStore) -> Vec<Vec<NodeIndex>> {
    let inner = graph.as_petgraph();
    let mut sets = DisjointSets::new(inner.node_count());
    for edge in inner.edge_references() {
        sets.union(edge.source().index(), edge.target().index());
    }
    sets.groups()
        .into_iter()
        .map(|group| group.into_iter().map(NodeIndex::new).collect())
        .collect()
}

/// True for graphs with exactly one component
pub fn is_connected(graph: &GraphStore) -> bool {
    connected_components(graph).len() == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    #[test]
    fn test_disjoint_sets() {
        let mut sets = DisjointSets::new(5);
        assert!(sets.union(0, 1));
        assert!(sets.union(3, 4));
        assert!(!sets.union(1, 0));
        assert_eq!(sets.set_size(1), 2);
        assert_eq!(sets.groups(), vec![vec![0, 1], vec![2], vec![3, 4]]);
    }

    #[test]
    fn test_components_in_discovery_order() {
        let mut builder = GraphBuilder::new();
        builder
            .add_edge("A", "B")
            .add_edge("C", "D")
            .add_edge("D", "E")
            .add_node("F");
        let (graph, _) = builder.build();
        let sizes: Vec<usize> = connected_components(&graph).iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 3, 1]);
        assert!(!is_connected(&graph));
    }

    #[test]
    fn test_empty_graph_has_no_components() {
        let graph = GraphStore::new();
        assert!(connected_components(&graph).is_empty());
        assert!(!is_connected(&graph));
    }
}
