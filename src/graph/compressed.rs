//! Compressed adjacency for index-labelled graphs

/// Compressed sparse row adjacency of an undirected graph
///
/// Every undirected edge is stored in both directions so that
/// `neighbors(i)` is complete for every node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressedGraph {
    /// Number of nodes in the graph
    pub node_count: usize,

    /// Offset array: index where each node's neighbours begin
    /// offsets[i] to offsets[i+1] defines the range for node i
    pub offsets: Vec<usize>,

    /// Concatenated, sorted neighbour lists
    pub targets: Vec<usize>,
}

impl CompressedGraph {
    /// Build from undirected index pairs; every index must be below `node_count`
    pub fn from_edges(node_count: usize, edges: &[(usize, usize)]) -> Self {
        let mut degrees = vec![0usize; node_count];
        for &(a, b) in edges {
            degrees[a] += 1;
            degrees[b] += 1;
        }

        let mut offsets = Vec::with_capacity(node_count + 1);
        offsets.push(0);
        let mut offset = 0;
        for &degree in &degrees {
            offset += degree;
            offsets.push(offset);
        }

        let mut targets = vec![0usize; offset];
        let mut cursor = offsets[..node_count].to_vec();
        for &(a, b) in edges {
            targets[cursor[a]] = b;
            cursor[a] += 1;
            targets[cursor[b]] = a;
            cursor[b] += 1;
        }

        let mut graph = Self {
            node_count,
            offsets,
            targets,
        };
        graph.sort_adjacency_lists();
        graph
    }

    /// Neighbours of a node
    pub fn neighbors(&self, node: usize) -> &[usize] {
        let start = self.offsets[node];
        let end = self.offsets[node + 1];
        &self.targets[start..end]
    }

    /// Sort all adjacency lists (enables binary search in `has_edge`)
    fn sort_adjacency_lists(&mut self) {
        for node in 0..self.node_count {
            let start = self.offsets[node];
            let end = self.offsets[node + 1];
            if start < end {
                self.targets[start..end].sort_unstable();
            }
        }
    }

    /// Check if there's an edge between src and dst
    pub fn has_edge(&self, src: usize, dst: usize) -> bool {
        self.neighbors(src).binary_search(&dst).is_ok()
    }

    pub fn degree(&self, node: usize) -> usize {
        self.offsets[node + 1] - self.offsets[node]
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.targets.len() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges_stores_both_directions() {
        let graph = CompressedGraph::from_edges(4, &[(0, 2), (1, 2), (2, 3)]);
        assert_eq!(graph.neighbors(2), &[0, 1, 3]);
        assert_eq!(graph.neighbors(0), &[2]);
        assert_eq!(graph.degree(2), 3);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.has_edge(3, 2));
        assert!(!graph.has_edge(0, 1));
    }

    #[test]
    fn test_isolated_nodes_have_no_neighbors() {
        let graph = CompressedGraph::from_edges(3, &[]);
        assert!(graph.neighbors(1).is_empty());
        assert_eq!(graph.offsets, vec![0, 0, 0, 0]);
    }
}
