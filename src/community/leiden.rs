//! Leiden algorithm for community detection.
//!
//! Improves on Louvain by guaranteeing that every community is internally
//! connected (Traag, Waltman & van Eck 2019).
//!
//! Each level runs three phases:
//!
//! 1. **Fast local moving**: a queue of nodes; a node that changes community
//!    re-enqueues its neighbours.
//! 2. **Refinement**: every community is split into its connected pieces.
//! 3. **Aggregation**: the refined pieces become nodes, initially placed in the
//!    community their members belonged to.

use super::weighted::{renumber, WeightedGraph};
use crate::error::RoutineError;
use crate::graph::IndexedView;
use std::collections::VecDeque;

/// Membership vector (`result[i]` = community of node `i`)
pub fn leiden(
    view: &IndexedView,
    resolution: f64,
    max_levels: usize,
) -> Result<Vec<usize>, RoutineError> {
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(RoutineError::InvalidInput(format!(
            "resolution must be positive, got {}",
            resolution
        )));
    }

    let n = view.node_count();
    let mut graph = WeightedGraph::from_view(view);
    if graph.total_weight == 0.0 {
        return Ok((0..n).collect());
    }

    // original node -> aggregated node
    let mut membership: Vec<usize> = (0..n).collect();
    // aggregated node -> community
    let mut partition: Vec<usize> = (0..n).collect();

    for level in 0..max_levels {
        fast_local_moving(&graph, &mut partition, resolution);
        let communities = renumber(&mut partition);

        let mut refined = refine(&graph, &partition);
        let pieces = renumber(&mut refined);
        log::debug!(
            "Leiden level {}: {} nodes, {} communities, {} refined pieces (Q = {:.4})",
            level,
            graph.n,
            communities,
            pieces,
            graph.modularity(&partition, resolution)
        );

        if pieces == graph.n {
            break;
        }

        let mut initial = vec![0; pieces];
        for node in 0..graph.n {
            initial[refined[node]] = partition[node];
        }
        for m in membership.iter_mut() {
            *m = refined[*m];
        }
        graph = graph.aggregate(&refined, pieces);
        partition = initial;
    }

    let mut result: Vec<usize> = membership.iter().map(|&node| partition[node]).collect();
    renumber(&mut result);
    Ok(result)
}

/// Queue-driven local moving; returns whether any node moved
fn fast_local_moving(graph: &WeightedGraph, partition: &mut [usize], resolution: f64) -> bool {
    let mut totals = vec![0.0; graph.n];
    for (node, &c) in partition.iter().enumerate() {
        totals[c] += graph.degrees[node];
    }

    let mut queue: VecDeque<usize> = (0..graph.n).collect();
    let mut in_queue = vec![true; graph.n];
    let mut moved = false;

    while let Some(node) = queue.pop_front() {
        in_queue[node] = false;
        let current = partition[node];

        totals[current] -= graph.degrees[node];
        let best = graph.best_community(node, partition, &totals, resolution);
        totals[best] += graph.degrees[node];

        if best != current {
            partition[node] = best;
            moved = true;
            for &(neighbor, _) in &graph.adj[node] {
                if !in_queue[neighbor] && partition[neighbor] != best {
                    queue.push_back(neighbor);
                    in_queue[neighbor] = true;
                }
            }
        }
    }

    moved
}

/// Split every community into its connected pieces; labels are arbitrary
fn refine(graph: &WeightedGraph, partition: &[usize]) -> Vec<usize> {
    let mut refined = vec![usize::MAX; graph.n];
    let mut next = 0;
    let mut queue: VecDeque<usize> = VecDeque::new();

    for start in 0..graph.n {
        if refined[start] != usize::MAX {
            continue;
        }
        refined[start] = next;
        queue.push_back(start);
        while let Some(node) = queue.pop_front() {
            for &(neighbor, _) in &graph.adj[node] {
                if refined[neighbor] == usize::MAX && partition[neighbor] == partition[start] {
                    refined[neighbor] = next;
                    queue.push_back(neighbor);
                }
            }
        }
        next += 1;
    }

    refined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{to_indexed, GraphStore};

    fn detect(graph: &GraphStore) -> Vec<usize> {
        let view = to_indexed(graph).unwrap();
        leiden(&view, 1.0, 32).unwrap()
    }

    #[test]
    fn test_leiden_triangle() {
        let communities = detect(&GraphStore::from_edges(&[("0", "1"), ("1", "2"), ("0", "2")]));
        assert_eq!(communities, vec![0, 0, 0]);
    }

    #[test]
    fn test_leiden_two_cliques() {
        let graph = GraphStore::from_edges(&[
            ("a0", "a1"),
            ("a1", "a2"),
            ("a0", "a2"),
            ("b0", "b1"),
            ("b1", "b2"),
            ("b0", "b2"),
            ("a2", "b0"),
        ]);
        let communities = detect(&graph);

        assert_eq!(communities[0], communities[1]);
        assert_eq!(communities[1], communities[2]);
        assert_eq!(communities[3], communities[4]);
        assert_eq!(communities[4], communities[5]);
        assert_ne!(communities[0], communities[3]);
    }

    #[test]
    fn test_refine_splits_disconnected_community() {
        // A--B--C  D--E, all claimed by one community
        let graph = GraphStore::from_edges(&[("A", "B"), ("B", "C"), ("D", "E")]);
        let view = to_indexed(&graph).unwrap();
        let weighted = WeightedGraph::from_view(&view);
        let refined = refine(&weighted, &[0, 0, 0, 0, 0]);
        assert_eq!(refined[0], refined[1]);
        assert_eq!(refined[1], refined[2]);
        assert_eq!(refined[3], refined[4]);
        assert_ne!(refined[0], refined[3]);
    }

    #[test]
    fn test_communities_are_connected() {
        let graph = GraphStore::from_edges(&[
            ("A", "B"),
            ("B", "C"),
            ("C", "A"),
            ("C", "D"),
            ("D", "E"),
            ("E", "F"),
            ("F", "D"),
            ("F", "G"),
            ("G", "H"),
            ("H", "I"),
            ("I", "G"),
        ]);
        let view = to_indexed(&graph).unwrap();
        let communities = leiden(&view, 1.0, 32).unwrap();
        let weighted = WeightedGraph::from_view(&view);
        let mut pieces = refine(&weighted, &communities);
        let mut labels = communities.clone();
        assert_eq!(renumber(&mut pieces), renumber(&mut labels));
    }
}
