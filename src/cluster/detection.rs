//! Connected-component clusters and per-cluster structure

use crate::cluster::Partition;
use crate::error::RoutineError;
use crate::graph::algorithms::connected_components;
use crate::graph::GraphStore;
use std::collections::HashSet;

/// One group per connected component, largest first
///
/// Works on any graph, connected or not. Fails only if the components do not
/// account for every node exactly once.
pub fn connected_components_partition(graph: &GraphStore) -> Result<Partition, RoutineError> {
    log::info!("Finding connected components");

    let inner = graph.as_petgraph();
    let components = connected_components(graph);
    let mut partition = Partition::new(
        components
            .into_iter()
            .map(|component| component.into_iter().map(|idx| inner[idx].clone()).collect()),
    );

    if partition.member_count() != graph.node_count() || !partition.is_disjoint() {
        return Err(RoutineError::NotAPartition(format!(
            "components cover {} of {} nodes",
            partition.member_count(),
            graph.node_count()
        )));
    }

    partition.sort_by_size_desc();
    log::info!("Found {} connected components", partition.len());
    Ok(partition)
}

/// Density: actual edges / potential edges among `members`
///
/// Unknown labels are ignored; a single node has density 1 by convention.
pub fn cluster_density(graph: &GraphStore, members: &[String]) -> f64 {
    let member_set: HashSet<&str> = members
        .iter()
        .map(String::as_str)
        .filter(|label| graph.contains(label))
        .collect();
    let n = member_set.len();
    if n <= 1 {
        return 1.0;
    }

    let actual_edges: usize = member_set
        .iter()
        .map(|&label| {
            graph
                .neighbors(label)
                .into_iter()
                .filter(|neighbor| member_set.contains(neighbor))
                .count()
        })
        .sum::<usize>()
        / 2;

    let potential_edges = n * (n - 1) / 2;
    actual_edges as f64 / potential_edges as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphBuilder;

    #[test]
    fn test_components_largest_first() {
        let mut builder = GraphBuilder::new();
        builder
            .add_edge("X", "Y")
            .add_edge("A", "B")
            .add_edge("B", "C")
            .add_node("Z");
        let (graph, _) = builder.build();

        let partition = connected_components_partition(&graph).unwrap();
        assert_eq!(partition.len(), 3);
        assert_eq!(partition.groups()[0].len(), 3);
        assert_eq!(partition.groups()[1], vec!["X".to_string(), "Y".to_string()]);
        assert_eq!(partition.groups()[2], vec!["Z".to_string()]);
    }

    #[test]
    fn test_cluster_density() {
        let graph = GraphStore::from_edges(&[("A", "B"), ("B", "C"), ("A", "C"), ("C", "D")]);
        let triangle: Vec<String> = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        assert!((cluster_density(&graph, &triangle) - 1.0).abs() < 1e-12);

        let path: Vec<String> = ["A", "C", "D", "Q"].iter().map(|s| s.to_string()).collect();
        assert!((cluster_density(&graph, &path) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(cluster_density(&graph, &["A".to_string()]), 1.0);
    }
}
