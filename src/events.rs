//! Structured diagnostics for the loading and clustering pipeline
//!
//! Every warning and every MCL fallback decision is reported as a
//! [`PipelineEvent`] to an [`EventSink`]. The default [`LogSink`] forwards to
//! the `log` facade; [`RecordingSink`] keeps the events so callers can inspect
//! the path that was taken.

use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Representation handed to the Markov clustering routine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MclStage {
    /// Compressed sparse rows, used directly
    Sparse,
    /// Dense matrix, only for small graphs
    Dense,
    /// Sparse rows rebuilt through a coordinate list
    Reformatted,
}

impl fmt::Display for MclStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MclStage::Sparse => write!(f, "sparse"),
            MclStage::Dense => write!(f, "dense"),
            MclStage::Reformatted => write!(f, "coo->csr"),
        }
    }
}

/// Degradation level reached after the numeric attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FallbackLevel {
    ConnectedComponents,
    Singletons,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PipelineEvent {
    /// An edge-list line with fewer than two tokens was skipped
    MalformedLine { line: usize, content: String },

    SelfLoopsRemoved { count: usize },

    /// The input was disconnected and only its largest component was kept
    ComponentExtracted {
        components: usize,
        kept_nodes: usize,
        dropped_nodes: usize,
    },

    /// The adjacency matrix failed shape validation
    MclMatrixRejected { reason: String },

    MclAttemptStarted { stage: MclStage },
    MclAttemptSkipped { stage: MclStage, reason: String },
    MclAttemptFailed { stage: MclStage, reason: String },
    MclAttemptSucceeded { stage: MclStage, clusters: usize },

    /// The routine reported a cluster member outside the node range
    MclInvalidIndex { index: usize },

    MclFallback { level: FallbackLevel, reason: String },

    /// Modularity could not be computed and was reported as 0.0
    ModularityUnavailable { reason: String },
}

/// Receiver of pipeline diagnostics
pub trait EventSink {
    fn record(&self, event: PipelineEvent);
}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::MalformedLine { line, content } => {
                log::warn!("Line {} has fewer than two node parts: '{}'", line, content);
            }
            PipelineEvent::SelfLoopsRemoved { count } => {
                log::debug!("Removed {} self-loops", count);
            }
            PipelineEvent::ComponentExtracted {
                components,
                kept_nodes,
                dropped_nodes,
            } => {
                log::info!(
                    "Graph has {} components; keeping largest ({} nodes, {} dropped)",
                    components,
                    kept_nodes,
                    dropped_nodes
                );
            }
            PipelineEvent::MclMatrixRejected { reason } => {
                log::warn!("Adjacency matrix rejected: {}", reason);
            }
            PipelineEvent::MclAttemptStarted { stage } => {
                log::info!("Attempting {} MCL", stage);
            }
            PipelineEvent::MclAttemptSkipped { stage, reason } => {
                log::info!("Skipping {} MCL: {}", stage, reason);
            }
            PipelineEvent::MclAttemptFailed { stage, reason } => {
                log::warn!("{} MCL failed: {}", stage, reason);
            }
            PipelineEvent::MclAttemptSucceeded { stage, clusters } => {
                log::info!("{} MCL produced {} raw clusters", stage, clusters);
            }
            PipelineEvent::MclInvalidIndex { index } => {
                log::warn!("MCL returned invalid node index {}; skipping", index);
            }
            PipelineEvent::MclFallback { level, reason } => {
                log::warn!("Falling back to {:?}: {}", level, reason);
            }
            PipelineEvent::ModularityUnavailable { reason } => {
                log::warn!("Modularity unavailable, reporting 0.0: {}", reason);
            }
        }
    }
}

/// Keeps every event in memory, in arrival order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stages the MCL executor actually handed to the numeric routine
    pub fn attempted_stages(&self) -> Vec<MclStage> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PipelineEvent::MclAttemptStarted { stage } => Some(stage),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: PipelineEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}
