//! Weighted graph used by Leiden
//!
//! Aggregation turns each community into one node; internal edge weight
//! becomes a self-loop so that modularity is preserved across levels.

use crate::graph::IndexedView;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone)]
pub(crate) struct WeightedGraph {
    pub n: usize,
    /// Adjacency without self-loops: node -> [(neighbor, weight)]
    pub adj: Vec<Vec<(usize, f64)>>,
    /// Self-loop weight of each node
    pub self_loops: Vec<f64>,
    /// Weighted degree; a self-loop counts twice
    pub degrees: Vec<f64>,
    /// Total edge weight m (each edge once, self-loops included)
    pub total_weight: f64,
}

impl WeightedGraph {
    /// Unit-weight graph from an indexed view
    pub fn from_view(view: &IndexedView) -> Self {
        let edges: BTreeMap<(usize, usize), f64> =
            view.edges().iter().map(|&(a, b)| ((a, b), 1.0)).collect();
        Self::from_parts(view.node_count(), edges, vec![0.0; view.node_count()])
    }

    fn from_parts(n: usize, edges: BTreeMap<(usize, usize), f64>, self_loops: Vec<f64>) -> Self {
        let mut adj = vec![Vec::new(); n];
        let mut degrees = vec![0.0; n];
        let mut total_weight = 0.0;

        for (&(i, j), &w) in &edges {
            adj[i].push((j, w));
            adj[j].push((i, w));
            degrees[i] += w;
            degrees[j] += w;
            total_weight += w;
        }
        for (i, &sl) in self_loops.iter().enumerate() {
            degrees[i] += 2.0 * sl;
            total_weight += sl;
        }

        Self {
            n,
            adj,
            self_loops,
            degrees,
            total_weight,
        }
    }

    /// Collapse each community (labels `0..communities`) into a single node
    pub fn aggregate(&self, membership: &[usize], communities: usize) -> WeightedGraph {
        let mut edges: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        let mut self_loops = vec![0.0; communities];

        for (i, &sl) in self.self_loops.iter().enumerate() {
            self_loops[membership[i]] += sl;
        }
        for i in 0..self.n {
            for &(j, w) in &self.adj[i] {
                if i >= j {
                    continue;
                }
                let (ci, cj) = (membership[i], membership[j]);
                if ci == cj {
                    self_loops[ci] += w;
                } else {
                    *edges.entry((ci.min(cj), ci.max(cj))).or_insert(0.0) += w;
                }
            }
        }

        Self::from_parts(communities, edges, self_loops)
    }

    /// Newman modularity of a membership vector at the given resolution
    pub fn modularity(&self, membership: &[usize], resolution: f64) -> f64 {
        let m = self.total_weight;
        if m == 0.0 {
            return 0.0;
        }

        let mut internal: HashMap<usize, f64> = HashMap::new();
        let mut totals: HashMap<usize, f64> = HashMap::new();
        for i in 0..self.n {
            let c = membership[i];
            *totals.entry(c).or_insert(0.0) += self.degrees[i];
            *internal.entry(c).or_insert(0.0) += self.self_loops[i];
            for &(j, w) in &self.adj[i] {
                if i < j && membership[j] == c {
                    *internal.entry(c).or_insert(0.0) += w;
                }
            }
        }

        totals
            .iter()
            .map(|(c, &tot)| {
                let inside = internal.get(c).copied().unwrap_or(0.0);
                inside / m - resolution * (tot / (2.0 * m)).powi(2)
            })
            .sum()
    }

    /// Best community for `node` once it has been taken out of its own
    ///
    /// `totals` must already exclude the node's degree. Staying put wins ties.
    pub fn best_community(
        &self,
        node: usize,
        membership: &[usize],
        totals: &[f64],
        resolution: f64,
    ) -> usize {
        let current = membership[node];
        let ki = self.degrees[node];
        let two_m = 2.0 * self.total_weight;

        let mut links: BTreeMap<usize, f64> = BTreeMap::new();
        links.insert(current, 0.0);
        for &(neighbor, w) in &self.adj[node] {
            *links.entry(membership[neighbor]).or_insert(0.0) += w;
        }

        let gain = |community: usize, weight: f64| weight - resolution * totals[community] * ki / two_m;

        let mut best = current;
        let mut best_gain = gain(current, links[&current]);
        for (&community, &weight) in &links {
            let g = gain(community, weight);
            if g > best_gain + 1e-12 {
                best = community;
                best_gain = g;
            }
        }
        best
    }
}

/// Renumber arbitrary labels to `0..k` in first-seen order; returns k
pub(crate) fn renumber(labels: &mut [usize]) -> usize {
    let mut map: HashMap<usize, usize> = HashMap::new();
    for label in labels.iter_mut() {
        let next = map.len();
        *label = *map.entry(*label).or_insert(next);
    }
    map.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{to_indexed, GraphStore};

    fn two_triangles() -> GraphStore {
        GraphStore::from_edges(&[
            ("a0", "a1"),
            ("a1", "a2"),
            ("a0", "a2"),
            ("b0", "b1"),
            ("b1", "b2"),
            ("b0", "b2"),
            ("a2", "b0"),
        ])
    }

    #[test]
    fn test_modularity_of_two_triangles() {
        let view = to_indexed(&two_triangles()).unwrap();
        let graph = WeightedGraph::from_view(&view);
        let split = [0, 0, 0, 1, 1, 1];
        let q = graph.modularity(&split, 1.0);
        // 2 * (3/7 - (7/14)^2)
        assert!((q - 0.357142857).abs() < 1e-6);
        assert!(graph.modularity(&[0; 6], 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_aggregation_preserves_modularity() {
        let view = to_indexed(&two_triangles()).unwrap();
        let graph = WeightedGraph::from_view(&view);
        let split = [0, 0, 0, 1, 1, 1];
        let coarse = graph.aggregate(&split, 2);
        assert_eq!(coarse.n, 2);
        assert_eq!(coarse.self_loops, vec![3.0, 3.0]);
        assert!((coarse.total_weight - graph.total_weight).abs() < 1e-12);
        let q_fine = graph.modularity(&split, 1.0);
        let q_coarse = coarse.modularity(&[0, 1], 1.0);
        assert!((q_fine - q_coarse).abs() < 1e-12);
    }

    #[test]
    fn test_renumber_first_seen() {
        let mut labels = vec![7, 3, 7, 9];
        assert_eq!(renumber(&mut labels), 3);
        assert_eq!(labels, vec![0, 1, 0, 2]);
    }
}
