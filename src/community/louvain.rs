//! Louvain community detection via aprender
//!
//! The view's edge list is handed to `aprender::graph::Graph` unchanged and
//! its default Louvain run is translated back to view indices.

use crate::error::RoutineError;
use crate::graph::IndexedView;
use aprender::graph::Graph as AprenderGraph;

/// Undirected aprender graph over the view's indices
///
/// aprender sizes the graph from the largest edge endpoint, so trailing
/// isolated nodes are absent from it.
pub(crate) fn to_aprender(view: &IndexedView) -> AprenderGraph {
    AprenderGraph::from_edges(view.edges(), false)
}

/// Node groups found by aprender's Louvain, covering every node of `view`
pub fn louvain(view: &IndexedView) -> Result<Vec<Vec<usize>>, RoutineError> {
    let n = view.node_count();
    if view.edge_count() == 0 {
        return Ok((0..n).map(|i| vec![i]).collect());
    }

    let graph = to_aprender(view);
    let communities = graph.louvain();
    log::debug!(
        "aprender Louvain: {} communities over {} of {} nodes (Q = {:.4})",
        communities.len(),
        graph.num_nodes(),
        n,
        graph.modularity(&communities)
    );

    let mut seen = vec![false; n];
    let mut groups: Vec<Vec<usize>> = Vec::with_capacity(communities.len());
    for community in communities {
        for &node in &community {
            match seen.get_mut(node) {
                Some(flag) if !*flag => *flag = true,
                Some(_) => {
                    return Err(RoutineError::NotAPartition(format!(
                        "node {} returned in two communities",
                        node
                    )))
                }
                None => {
                    return Err(RoutineError::InvalidInput(format!(
                        "community member {} outside a graph of {} nodes",
                        node, n
                    )))
                }
            }
        }
        if !community.is_empty() {
            groups.push(community);
        }
    }

    // Isolated nodes past the last edge endpoint
    groups.extend((0..n).filter(|&i| !seen[i]).map(|i| vec![i]));
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{to_indexed, GraphBuilder, GraphStore};

    fn detect(graph: &GraphStore) -> Vec<Vec<usize>> {
        let view = to_indexed(graph).unwrap();
        let mut groups = louvain(&view).unwrap();
        for group in groups.iter_mut() {
            group.sort_unstable();
        }
        groups.sort();
        groups
    }

    #[test]
    fn test_louvain_triangle() {
        let groups = detect(&GraphStore::from_edges(&[("0", "1"), ("1", "2"), ("0", "2")]));
        assert_eq!(groups, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_louvain_two_cliques() {
        let graph = GraphStore::from_edges(&[
            ("a0", "a1"),
            ("a1", "a2"),
            ("a0", "a2"),
            ("b0", "b1"),
            ("b1", "b2"),
            ("b0", "b2"),
            ("a2", "b0"),
        ]);
        assert_eq!(detect(&graph), vec![vec![0, 1, 2], vec![3, 4, 5]]);
    }

    #[test]
    fn test_louvain_path_covers_all_nodes() {
        let groups = detect(&GraphStore::from_edges(&[("A", "B"), ("B", "C"), ("C", "D")]));
        let mut members: Vec<usize> = groups.into_iter().flatten().collect();
        members.sort_unstable();
        assert_eq!(members, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_trailing_isolated_node_becomes_singleton() {
        let mut builder = GraphBuilder::new();
        builder.add_edge("A", "B").add_edge("B", "C").add_node("Z");
        let (graph, _) = builder.build();
        let groups = detect(&graph);
        assert!(groups.contains(&vec![3]));
        assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), 4);
    }

    #[test]
    fn test_aprender_graph_matches_view() {
        let view = to_indexed(&GraphStore::from_edges(&[("A", "B"), ("B", "C")])).unwrap();
        let graph = to_aprender(&view);
        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.num_edges(), 2);
    }
}
