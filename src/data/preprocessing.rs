//! Normalization of freshly parsed graphs

use crate::error::{Error, Result};
use crate::events::{EventSink, PipelineEvent};
use crate::graph::algorithms::connected_components;
use crate::graph::{GraphBuilder, GraphStore};
use petgraph::graph::NodeIndex;
use std::collections::HashSet;

/// Turn raw parser output into a connected, non-empty simple graph
///
/// Self-loops are stripped, a disconnected graph is replaced by its largest
/// component, and an empty result fails with [`Error::EmptyGraph`].
pub fn normalize(builder: GraphBuilder, sink: &dyn EventSink) -> Result<GraphStore> {
    let (graph, self_loops) = builder.build();
    if self_loops > 0 {
        sink.record(PipelineEvent::SelfLoopsRemoved { count: self_loops });
    }

    let graph = largest_component(graph, sink);
    if graph.is_empty() {
        return Err(Error::EmptyGraph);
    }

    Ok(graph)
}

/// Induced subgraph of the largest connected component
///
/// When several components share the maximum size the first one discovered
/// (in node order) wins. Connected and empty graphs are returned unchanged.
pub fn largest_component(graph: GraphStore, sink: &dyn EventSink) -> GraphStore {
    let components = connected_components(&graph);
    if components.len() <= 1 {
        return graph;
    }

    let mut largest = &components[0];
    for component in &components[1..] {
        if component.len() > largest.len() {
            largest = component;
        }
    }

    sink.record(PipelineEvent::ComponentExtracted {
        components: components.len(),
        kept_nodes: largest.len(),
        dropped_nodes: graph.node_count() - largest.len(),
    });

    let keep: HashSet<NodeIndex> = largest.iter().copied().collect();
    graph.induced_subgraph(&keep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;
    use crate::graph::algorithms::is_connected;

    #[test]
    fn test_keeps_largest_component() {
        let sink = RecordingSink::new();
        let mut builder = GraphBuilder::new();
        builder
            .add_edge("A", "B")
            .add_edge("C", "D")
            .add_edge("D", "E")
            .add_edge("E", "E");
        let graph = normalize(builder, &sink).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert!(is_connected(&graph));
        assert!(!graph.contains("A"));
        assert_eq!(
            sink.events(),
            vec![
                PipelineEvent::SelfLoopsRemoved { count: 1 },
                PipelineEvent::ComponentExtracted {
                    components: 2,
                    kept_nodes: 3,
                    dropped_nodes: 2
                },
            ]
        );
    }

    #[test]
    fn test_ties_keep_first_component() {
        let sink = RecordingSink::new();
        let mut builder = GraphBuilder::new();
        builder.add_edge("A", "B").add_edge("C", "D");
        let graph = normalize(builder, &sink).unwrap();
        assert!(graph.contains("A"));
        assert!(graph.contains("B"));
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_self_loops_only_is_empty() {
        let sink = RecordingSink::new();
        let mut builder = GraphBuilder::new();
        builder.add_edge("A", "A").add_edge("B", "B");
        assert!(matches!(normalize(builder, &sink), Err(Error::EmptyGraph)));
    }

    #[test]
    fn test_connected_graph_unchanged() {
        let sink = RecordingSink::new();
        let graph = GraphStore::from_edges(&[("A", "B"), ("B", "C")]);
        let same = largest_component(graph, &sink);
        assert_eq!(same.node_count(), 3);
        assert!(sink.events().is_empty());
    }
}
