//! Graph construction module

use crate::graph::GraphStore;
use std::collections::HashMap;

/// Builder for incrementally constructing a [`GraphStore`] from raw input
///
/// Accepts anything a parser produces: repeated edges, self-loops, edges given
/// in both directions. `build` collapses these into a simple graph.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    /// Mapping from string IDs to node indices
    id_to_index: HashMap<String, usize>,

    /// Node string IDs in first-seen order
    node_ids: Vec<String>,

    /// Nodes added explicitly, kept even when isolated
    declared: Vec<bool>,

    /// Raw edge list, possibly with self-loops and repeats
    edges: Vec<(usize, usize)>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new graph builder with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id_to_index: HashMap::with_capacity(capacity),
            node_ids: Vec::with_capacity(capacity),
            declared: Vec::with_capacity(capacity),
            edges: Vec::new(),
        }
    }

    /// Get or create a node index for the given string ID
    fn get_or_create_node(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }

        let idx = self.node_ids.len();
        self.id_to_index.insert(id.to_string(), idx);
        self.node_ids.push(id.to_string());
        self.declared.push(false);

        idx
    }

    /// Declare a node that survives `build` even without incident edges
    pub fn add_node(&mut self, id: &str) -> &mut Self {
        let idx = self.get_or_create_node(id);
        self.declared[idx] = true;
        self
    }

    /// Record an edge; endpoints are created on first sight
    pub fn add_edge(&mut self, src_id: &str, dst_id: &str) -> &mut Self {
        let src_idx = self.get_or_create_node(src_id);
        let dst_idx = self.get_or_create_node(dst_id);
        self.edges.push((src_idx, dst_idx));
        self
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    /// Number of raw edges recorded, self-loops and repeats included
    pub fn raw_edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Build the simple graph and report how many self-loops were stripped
    ///
    /// A node that only ever appeared as the endpoint of a self-loop, and was
    /// never declared with [`add_node`](Self::add_node), disappears with its loop.
    pub fn build(self) -> (GraphStore, usize) {
        let mut keep = self.declared.clone();
        let mut self_loops = 0;
        for &(src, dst) in &self.edges {
            if src == dst {
                self_loops += 1;
            } else {
                keep[src] = true;
                keep[dst] = true;
            }
        }

        let mut store = GraphStore::new();
        for (idx, id) in self.node_ids.iter().enumerate() {
            if keep[idx] {
                store.insert_node(id);
            }
        }
        for &(src, dst) in &self.edges {
            if src != dst {
                store.insert_edge(&self.node_ids[src], &self.node_ids[dst]);
            }
        }

        (store, self_loops)
    }
}
