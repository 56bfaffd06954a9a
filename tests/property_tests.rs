//! Property-based tests for ppi-cluster
//!
//! Verifies loader, view and partition invariants hold for arbitrary networks

use ppi_cluster::cluster::{evaluate_clusters, run_louvain, run_mcl};
use ppi_cluster::data::load_graph;
use ppi_cluster::error::Error;
use ppi_cluster::graph::algorithms::is_connected;
use ppi_cluster::graph::{to_indexed, GraphStore};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::io::Write;

/// Edge lists over a small alphabet of protein labels
fn prop_label_edges(max_nodes: u8, max_edges: usize) -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((0..max_nodes, 0..max_nodes), 1..max_edges).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(a, b)| (format!("P{}", a), format!("P{}", b)))
            .collect()
    })
}

fn prop_graph(max_nodes: u8, max_edges: usize) -> impl Strategy<Value = GraphStore> {
    prop_label_edges(max_nodes, max_edges).prop_map(|edges| GraphStore::from_edges(&edges))
}

// Property: a loaded graph is simple and connected, or the load reports an empty graph
proptest! {
    #[test]
    fn prop_loaded_graph_is_simple_and_connected(edges in prop_label_edges(20, 40)) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for (a, b) in &edges {
            writeln!(file, "{}\t{}", a, b).unwrap();
        }
        file.flush().unwrap();

        let only_loops = edges.iter().all(|(a, b)| a == b);
        match load_graph(file.path()) {
            Ok(graph) => {
                prop_assert!(!only_loops);
                prop_assert!(graph.node_count() > 0);
                prop_assert!(is_connected(&graph));
                prop_assert!(graph.edges().all(|(a, b)| a != b));
            }
            Err(Error::EmptyGraph) => prop_assert!(only_loops),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}

// Property: the indexed view is a bijection onto the graph's labels
proptest! {
    #[test]
    fn prop_indexed_view_round_trips_labels(graph in prop_graph(30, 60)) {
        prop_assume!(!graph.is_empty());
        let view = to_indexed(&graph).unwrap();
        prop_assert_eq!(view.node_count(), graph.node_count());
        prop_assert_eq!(view.edge_count(), graph.edge_count());

        let expected: BTreeSet<&str> = graph.labels().collect();
        let actual: BTreeSet<&str> = view.labels().iter().map(String::as_str).collect();
        prop_assert_eq!(actual, expected);

        for i in 0..view.node_count() {
            let label = view.label(i).unwrap();
            prop_assert_eq!(view.index_of(label), Some(i));
        }
    }
}

// Property: MCL output is disjoint, within the node set and ordered by size
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn prop_mcl_groups_are_disjoint(graph in prop_graph(16, 30)) {
        let partition = run_mcl(&graph);
        prop_assert!(partition.is_disjoint());
        prop_assert!(partition.member_count() <= graph.node_count());
        prop_assert!(partition.iter().all(|group| !group.is_empty()));
        prop_assert!(partition.iter().flatten().all(|label| graph.contains(label)));

        let sizes: Vec<usize> = partition.iter().map(Vec::len).collect();
        prop_assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
    }
}

// Property: Louvain covers every node once and its stats agree with the partition
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn prop_louvain_is_a_partition(graph in prop_graph(20, 40)) {
        let partition = run_louvain(&graph).unwrap();
        prop_assert!(partition.is_disjoint());
        prop_assert_eq!(partition.member_count(), graph.node_count());

        let stats = evaluate_clusters(&graph, &partition);
        prop_assert_eq!(stats.num_clusters, partition.len());
        prop_assert!(stats.modularity.is_finite());
        prop_assert!(stats.modularity <= 1.0);
        prop_assert!(stats.min_cluster_size <= stats.max_cluster_size);
    }
}
