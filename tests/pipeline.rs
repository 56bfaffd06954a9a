//! End-to-end scenarios: load, cluster, evaluate

use ppi_cluster::cluster::{evaluate_clusters, Algorithm, MclExecutor, MclOutcome, Partition};
use ppi_cluster::community::{MatrixInput, MclResult, MclRoutine};
use ppi_cluster::config::MclConfig;
use ppi_cluster::data::load_graph;
use ppi_cluster::error::{Error, RoutineError};
use ppi_cluster::events::{MclStage, PipelineEvent, RecordingSink};
use ppi_cluster::graph::{GraphBuilder, GraphStore};
use std::collections::BTreeSet;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn available(algorithm: Algorithm) -> bool {
    !algorithm.is_optional() || cfg!(feature = "extended-algorithms")
}

struct AlwaysFails;

impl MclRoutine for AlwaysFails {
    fn run(&self, _: MatrixInput<'_>, _: f64, _: u32) -> Result<MclResult, RoutineError> {
        Err(RoutineError::InvalidInput("unsupported matrix".to_string()))
    }
}

#[test]
fn test_path_graph_is_partitioned_completely() {
    let file = write_temp("# interactions\nA\tB\nB,C\nC D\n");
    let graph = load_graph(file.path()).unwrap();
    assert_eq!(graph.node_count(), 4);

    for algorithm in [Algorithm::Louvain, Algorithm::Leiden] {
        if !available(algorithm) {
            continue;
        }
        let partition = algorithm.run(&graph).unwrap();
        let members: Vec<&String> = partition.iter().flatten().collect();
        let unique: BTreeSet<&String> = members.iter().copied().collect();
        assert_eq!(members.len(), 4, "{}", algorithm);
        assert_eq!(unique.len(), 4, "{}", algorithm);

        let stats = evaluate_clusters(&graph, &partition);
        assert!(stats.modularity.is_finite());
        assert_eq!(stats.num_clusters, partition.len());
    }
}

#[test]
fn test_two_isolated_nodes_become_singletons() {
    let mut builder = GraphBuilder::new();
    builder.add_node("A").add_node("B");
    let (graph, _) = builder.build();

    let expected = vec![vec!["A".to_string()], vec!["B".to_string()]];
    for algorithm in Algorithm::ALL {
        let partition = algorithm.run(&graph).unwrap();
        assert_eq!(partition.canonical(), expected, "{}", algorithm);
    }
}

#[test]
fn test_large_graph_never_attempts_dense_mcl() {
    let labels: Vec<String> = (0..3000).map(|i| format!("P{:04}", i)).collect();
    let edges: Vec<(&str, &str)> = labels
        .windows(2)
        .map(|w| (w[0].as_str(), w[1].as_str()))
        .collect();
    let graph = GraphStore::from_edges(&edges);
    assert_eq!(graph.node_count(), 3000);

    let sink = RecordingSink::new();
    let report = MclExecutor::new(&MclConfig::default())
        .with_sink(&sink)
        .with_routine(AlwaysFails)
        .run_detailed(&graph);

    assert_eq!(
        sink.attempted_stages(),
        vec![MclStage::Sparse, MclStage::Reformatted]
    );
    assert!(sink.events().iter().any(|e| matches!(
        e,
        PipelineEvent::MclAttemptSkipped {
            stage: MclStage::Dense,
            ..
        }
    )));
    assert_eq!(report.outcome, MclOutcome::ConnectedComponents);
    assert_eq!(report.partition.len(), 1);
    assert_eq!(report.partition.member_count(), 3000);
}

#[test]
fn test_evaluating_empty_partition() {
    let graph = GraphStore::from_edges(&[("A", "B")]);
    let stats = evaluate_clusters(&graph, &Partition::default());
    assert_eq!(stats.num_clusters, 0);
    assert_eq!(stats.avg_cluster_size, 0.0);
    assert_eq!(stats.max_cluster_size, 0);
    assert_eq!(stats.min_cluster_size, 0);
    assert_eq!(stats.modularity, 0.0);
}

#[test]
fn test_loader_errors() {
    assert!(matches!(
        load_graph("/no/such/network.tsv"),
        Err(Error::NotFound { .. })
    ));

    let loops = write_temp("A A\n% only loops\nB B\n");
    assert!(matches!(load_graph(loops.path()), Err(Error::EmptyGraph)));

    let mtx_loops =
        write_temp("%%MatrixMarket matrix coordinate pattern symmetric\n2 2 2\n1 1\n2 2\n");
    assert!(matches!(load_graph(mtx_loops.path()), Err(Error::EmptyGraph)));

    let broken = write_temp("%%MatrixMarket matrix coordinate real general\n3 3 2\n1 2 1.0\n");
    assert!(matches!(load_graph(broken.path()), Err(Error::Format { .. })));
}

#[test]
fn test_declared_matrix_size_is_not_allocated() {
    let sparse = write_temp(
        "%%MatrixMarket matrix coordinate pattern general\n100000000000 100000000000 1\n1 2\n",
    );
    let graph = load_graph(sparse.path()).unwrap();
    assert_eq!(graph.node_count(), 2);

    let dense = write_temp("%%MatrixMarket matrix array real general\n100000000000 100000000000\n1\n");
    assert!(matches!(load_graph(dense.path()), Err(Error::Format { .. })));
}

#[test]
fn test_disconnected_input_keeps_largest_component() {
    let file = write_temp("A B\nB C\nC A\nX Y\n");
    let graph = load_graph(file.path()).unwrap();
    assert_eq!(graph.node_count(), 3);
    assert!(!graph.contains("X"));

    for algorithm in Algorithm::ALL.into_iter().filter(|a| available(*a)) {
        let partition = algorithm.run(&graph).unwrap();
        assert_eq!(partition.member_count(), 3, "{}", algorithm);
    }
}

#[test]
fn test_matrix_market_network_runs_mcl() {
    let file = write_temp(
        "%%MatrixMarket matrix coordinate pattern symmetric\n\
         % two triangles joined by a bridge\n\
         6 6 7\n2 1\n3 1\n3 2\n4 3\n5 4\n6 4\n6 5\n",
    );
    let graph = load_graph(file.path()).unwrap();
    assert_eq!(graph.node_count(), 6);
    assert_eq!(graph.edge_count(), 7);

    let partition = Algorithm::Mcl.run(&graph).unwrap();
    assert!(partition.is_disjoint());
    assert!(partition.member_count() <= 6);
    let stats = evaluate_clusters(&graph, &partition);
    assert!(stats.modularity.is_finite());
}
