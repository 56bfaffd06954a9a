//! Delimited edge-list parsing

use crate::events::{EventSink, PipelineEvent};
use crate::graph::GraphBuilder;

/// Lines starting with one of these are comments
const COMMENT_MARKERS: [char; 2] = ['%', '#'];

/// Parse one edge per line; tokens are split on whitespace, commas and tabs
///
/// Blank lines and comments are skipped silently. Lines with fewer than two
/// tokens are skipped and reported to `sink`; tokens past the second are ignored.
pub fn parse(content: &str, sink: &dyn EventSink) -> GraphBuilder {
    let mut builder = GraphBuilder::new();

    for (line_num, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKERS) {
            continue;
        }

        let mut parts = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty());

        match (parts.next(), parts.next()) {
            (Some(src), Some(dst)) => {
                builder.add_edge(src, dst);
            }
            _ => sink.record(PipelineEvent::MalformedLine {
                line: line_num + 1,
                content: line.to_string(),
            }),
        }
    }

    builder
}
