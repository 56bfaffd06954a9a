//! Cluster statistics and modularity

use crate::cluster::Partition;
use crate::error::RoutineError;
use crate::community::louvain::to_aprender;
use crate::events::{EventSink, LogSink, PipelineEvent};
use crate::graph::{to_indexed, GraphStore};
use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Size distribution and quality of a partition
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationStats {
    pub num_clusters: usize,
    pub avg_cluster_size: f64,
    pub max_cluster_size: usize,
    pub min_cluster_size: usize,
    /// 0.0 whenever modularity cannot be computed
    pub modularity: f64,
}

/// Evaluate a partition, logging when modularity is unavailable
pub fn evaluate_clusters(graph: &GraphStore, partition: &Partition) -> EvaluationStats {
    evaluate_clusters_with(graph, partition, &LogSink)
}

/// Evaluate a partition; never fails
///
/// An empty partition yields all-zero stats. Sizes only consider non-empty
/// groups. A modularity failure is reported to `sink` and scored 0.0.
pub fn evaluate_clusters_with(
    graph: &GraphStore,
    partition: &Partition,
    sink: &dyn EventSink,
) -> EvaluationStats {
    let sizes: Vec<usize> = partition
        .iter()
        .map(Vec::len)
        .filter(|&size| size > 0)
        .collect();
    if sizes.is_empty() {
        return EvaluationStats::default();
    }

    let (min_cluster_size, max_cluster_size) = match sizes.iter().copied().minmax() {
        MinMaxResult::NoElements => (0, 0),
        MinMaxResult::OneElement(size) => (size, size),
        MinMaxResult::MinMax(min, max) => (min, max),
    };
    let avg_cluster_size = sizes.iter().map(|&size| size as f64).mean();

    let modularity = match modularity(graph, partition) {
        Ok(q) => q,
        Err(e) => {
            sink.record(PipelineEvent::ModularityUnavailable {
                reason: e.to_string(),
            });
            0.0
        }
    };

    EvaluationStats {
        num_clusters: sizes.len(),
        avg_cluster_size,
        max_cluster_size,
        min_cluster_size,
        modularity,
    }
}

/// Newman modularity of a partition of every node of `graph`, via aprender
///
/// Fails unless the groups cover every node exactly once, or when the graph
/// has no edges.
pub fn modularity(graph: &GraphStore, partition: &Partition) -> Result<f64, RoutineError> {
    if graph.edge_count() == 0 {
        return Err(RoutineError::InvalidInput(
            "modularity is undefined for a graph without edges".to_string(),
        ));
    }

    let view = to_indexed(graph).map_err(|e| RoutineError::InvalidInput(e.to_string()))?;
    let library = to_aprender(&view);

    let mut assigned = vec![false; view.node_count()];
    let mut communities: Vec<Vec<usize>> = Vec::with_capacity(partition.len());
    for group in partition.iter() {
        let mut community = Vec::with_capacity(group.len());
        for label in group {
            let index = view.index_of(label).ok_or_else(|| {
                RoutineError::NotAPartition(format!("'{}' is not a node of the graph", label))
            })?;
            if std::mem::replace(&mut assigned[index], true) {
                return Err(RoutineError::NotAPartition(format!(
                    "'{}' appears in more than one group",
                    label
                )));
            }
            // Isolated nodes past the last edge endpoint are unknown to aprender
            if index < library.num_nodes() {
                community.push(index);
            }
        }
        communities.push(community);
    }

    let unassigned = assigned.iter().filter(|&&a| !a).count();
    if unassigned > 0 {
        return Err(RoutineError::NotAPartition(format!(
            "{} of {} nodes are not assigned to a group",
            unassigned,
            view.node_count()
        )));
    }

    let q = library.modularity(&communities);
    if !q.is_finite() {
        return Err(RoutineError::NonFinite("modularity"));
    }
    Ok(q)
}
