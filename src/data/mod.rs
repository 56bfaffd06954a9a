//! Graph loading from edge-list and matrix-market files

pub mod edge_list;
pub mod matrix_market;
pub mod preprocessing;

use crate::error::{Error, ParseError, Result};
use crate::events::{EventSink, LogSink};
use crate::graph::GraphStore;
use std::path::Path;

/// Input formats recognised by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    MatrixMarket,
    EdgeList,
}

/// Pick the format from the first line of the file
pub fn detect_format(content: &str) -> InputFormat {
    match content.lines().next() {
        Some(first) if first.trim_start().starts_with(matrix_market::HEADER) => {
            InputFormat::MatrixMarket
        }
        _ => InputFormat::EdgeList,
    }
}

/// Load a graph, logging warnings through the `log` facade
pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<GraphStore> {
    load_graph_with(path, &LogSink)
}

/// Load a graph and normalize it to a connected simple graph
///
/// Fails with [`Error::NotFound`] if `path` is not a file, [`Error::Format`]
/// if the content cannot be parsed, and [`Error::EmptyGraph`] if nothing is
/// left after self-loop removal and component extraction.
pub fn load_graph_with<P: AsRef<Path>>(path: P, sink: &dyn EventSink) -> Result<GraphStore> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }

    log::info!("Reading graph file: {}", path.display());

    let format_error = |source: ParseError| Error::Format {
        path: path.to_path_buf(),
        source,
    };

    let content = std::fs::read_to_string(path).map_err(|e| format_error(ParseError::Io(e)))?;

    let format = detect_format(&content);
    let builder = match format {
        InputFormat::MatrixMarket => matrix_market::parse(&content).map_err(format_error)?,
        InputFormat::EdgeList => edge_list::parse(&content, sink),
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    log::info!(
        "Successfully loaded {:?} graph: {} ({} nodes, {} raw edges)",
        format,
        name,
        builder.node_count(),
        builder.raw_edge_count()
    );

    let graph = preprocessing::normalize(builder, sink)?;

    log::info!(
        "Prepared graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    Ok(graph)
}
