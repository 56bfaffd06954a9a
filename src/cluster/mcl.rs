//! Markov clustering with a layered fallback chain
//!
//! The executor never fails. It hands a symmetric, binary, loop-free
//! adjacency matrix to an [`MclRoutine`] in up to three representations, in
//! order:
//!
//! 1. compressed sparse rows as built;
//! 2. a dense matrix, only while the graph has at most
//!    [`MclConfig::dense_node_limit`] nodes;
//! 3. sparse rows rebuilt through a coordinate list.
//!
//! The first success wins. When every attempt fails, or the matrix is
//! rejected before any attempt, the graph is split into its connected
//! components; should even that fail, every node becomes its own group.
//! Each decision is reported to the executor's [`EventSink`].

use crate::cluster::detection::connected_components_partition;
use crate::cluster::Partition;
use crate::community::{guarded, MarkovClustering, MatrixInput, MclResult, MclRoutine};
use crate::config::{Config, MclConfig};
use crate::error::RoutineError;
use crate::events::{EventSink, FallbackLevel, LogSink, MclStage, PipelineEvent};
use crate::graph::{to_indexed_sorted, CsrMatrix, GraphStore, IndexedView};
use serde::Serialize;

/// How the executor arrived at its partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MclOutcome {
    /// Fewer than two nodes or no edges; one group per node
    Trivial,
    /// The numeric routine succeeded on this representation
    Numeric(MclStage),
    ConnectedComponents,
    Singletons,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MclReport {
    pub partition: Partition,
    pub outcome: MclOutcome,
}

/// Connected-components fallback; replaceable for testing
pub type ComponentFallback = fn(&GraphStore) -> Result<Partition, RoutineError>;

/// One level of the numeric fallback chain
struct Attempt {
    stage: MclStage,
    /// `Err(reason)` skips the attempt without calling the routine
    gate: fn(&MclConfig, &CsrMatrix) -> Result<(), String>,
    execute: fn(&dyn MclRoutine, &CsrMatrix, &MclConfig) -> Result<MclResult, RoutineError>,
}

const ATTEMPTS: [Attempt; 3] = [
    Attempt {
        stage: MclStage::Sparse,
        gate: always,
        execute: run_sparse,
    },
    Attempt {
        stage: MclStage::Dense,
        gate: within_dense_limit,
        execute: run_dense,
    },
    Attempt {
        stage: MclStage::Reformatted,
        gate: always,
        execute: run_reformatted,
    },
];

fn always(_: &MclConfig, _: &CsrMatrix) -> Result<(), String> {
    Ok(())
}

fn within_dense_limit(config: &MclConfig, matrix: &CsrMatrix) -> Result<(), String> {
    let n = matrix.shape().0;
    if n <= config.dense_node_limit {
        Ok(())
    } else {
        Err(format!(
            "{} nodes exceeds the dense limit of {}",
            n, config.dense_node_limit
        ))
    }
}

fn run_sparse(
    routine: &dyn MclRoutine,
    matrix: &CsrMatrix,
    config: &MclConfig,
) -> Result<MclResult, RoutineError> {
    routine.run(MatrixInput::Sparse(matrix), config.inflation, config.expansion)
}

fn run_dense(
    routine: &dyn MclRoutine,
    matrix: &CsrMatrix,
    config: &MclConfig,
) -> Result<MclResult, RoutineError> {
    let dense = matrix.to_dense();
    routine.run(MatrixInput::Dense(&dense), config.inflation, config.expansion)
}

fn run_reformatted(
    routine: &dyn MclRoutine,
    matrix: &CsrMatrix,
    config: &MclConfig,
) -> Result<MclResult, RoutineError> {
    let rebuilt = matrix.to_coo().to_csr();
    routine.run(MatrixInput::Sparse(&rebuilt), config.inflation, config.expansion)
}

/// Square `n x n` with at least one non-zero and a consistent layout
fn validate_shape(matrix: &CsrMatrix, n: usize) -> Result<(), RoutineError> {
    if matrix.shape() != (n, n) {
        return Err(RoutineError::InvalidInput(format!(
            "adjacency matrix is {:?}, expected ({}, {})",
            matrix.shape(),
            n,
            n
        )));
    }
    matrix.check_structure()?;
    if matrix.nnz() == 0 {
        return Err(RoutineError::InvalidInput(
            "adjacency matrix has no non-zero entries".to_string(),
        ));
    }
    Ok(())
}

pub struct MclExecutor<'a> {
    config: MclConfig,
    routine: Box<dyn MclRoutine + 'a>,
    sink: &'a dyn EventSink,
    components: ComponentFallback,
}

impl<'a> MclExecutor<'a> {
    /// Executor using the in-process routine and logging its decisions
    pub fn new(config: &MclConfig) -> Self {
        Self {
            config: config.clone(),
            routine: Box::new(MarkovClustering::from_config(config)),
            sink: &LogSink,
            components: connected_components_partition,
        }
    }

    pub fn with_routine<R: MclRoutine + 'a>(mut self, routine: R) -> Self {
        self.routine = Box::new(routine);
        self
    }

    pub fn with_sink(mut self, sink: &'a dyn EventSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_component_fallback(mut self, components: ComponentFallback) -> Self {
        self.components = components;
        self
    }

    pub fn run(&self, graph: &GraphStore) -> Partition {
        self.run_detailed(graph).partition
    }

    /// Partition plus the level of the chain that produced it
    pub fn run_detailed(&self, graph: &GraphStore) -> MclReport {
        if graph.node_count() < 2 || graph.edge_count() == 0 {
            return MclReport {
                partition: Partition::singletons(graph),
                outcome: MclOutcome::Trivial,
            };
        }

        let view = match to_indexed_sorted(graph) {
            Ok(view) => view,
            Err(e) => return self.fallback(graph, e.to_string()),
        };

        let mut matrix = view.adjacency_matrix();
        matrix.eliminate_zeros();
        matrix.sort_indices();

        let prepared = validate_shape(&matrix, view.node_count())
            .and_then(|_| matrix.symmetrized_binary());
        let symmetric = match prepared {
            Ok(symmetric) => symmetric,
            Err(e) => {
                let reason = e.to_string();
                self.sink.record(PipelineEvent::MclMatrixRejected {
                    reason: reason.clone(),
                });
                return self.fallback(graph, reason);
            }
        };

        log::info!(
            "Running MCL on {} nodes ({} non-zeros), inflation {}, expansion {}",
            view.node_count(),
            symmetric.nnz(),
            self.config.inflation,
            self.config.expansion
        );

        let mut last_failure = String::new();
        for attempt in &ATTEMPTS {
            if let Err(reason) = (attempt.gate)(&self.config, &symmetric) {
                self.sink.record(PipelineEvent::MclAttemptSkipped {
                    stage: attempt.stage,
                    reason,
                });
                continue;
            }

            self.sink
                .record(PipelineEvent::MclAttemptStarted { stage: attempt.stage });
            let routine = self.routine.as_ref();
            match guarded(|| (attempt.execute)(routine, &symmetric, &self.config)) {
                Ok(result) => {
                    let clusters = result.clusters();
                    self.sink.record(PipelineEvent::MclAttemptSucceeded {
                        stage: attempt.stage,
                        clusters: clusters.len(),
                    });
                    return MclReport {
                        partition: self.translate(&view, clusters),
                        outcome: MclOutcome::Numeric(attempt.stage),
                    };
                }
                Err(e) => {
                    last_failure = format!("{} attempt failed: {}", attempt.stage, e);
                    self.sink.record(PipelineEvent::MclAttemptFailed {
                        stage: attempt.stage,
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.fallback(graph, format!("all MCL attempts failed; last: {}", last_failure))
    }

    /// Index clusters to disjoint label groups, largest first
    fn translate(&self, view: &IndexedView, clusters: Vec<Vec<usize>>) -> Partition {
        let groups = clusters.into_iter().map(|cluster| {
            cluster
                .into_iter()
                .filter_map(|index| match view.label(index) {
                    Some(label) => Some(label.to_string()),
                    None => {
                        self.sink.record(PipelineEvent::MclInvalidIndex { index });
                        None
                    }
                })
                .collect()
        });

        let mut partition = Partition::new(groups).into_disjoint();
        partition.sort_by_size_desc();
        partition
    }

    fn fallback(&self, graph: &GraphStore, reason: String) -> MclReport {
        self.sink.record(PipelineEvent::MclFallback {
            level: FallbackLevel::ConnectedComponents,
            reason,
        });

        match guarded(|| (self.components)(graph)) {
            Ok(partition) => MclReport {
                partition,
                outcome: MclOutcome::ConnectedComponents,
            },
            Err(e) => {
                self.sink.record(PipelineEvent::MclFallback {
                    level: FallbackLevel::Singletons,
                    reason: e.to_string(),
                });
                MclReport {
                    partition: Partition::singletons(graph),
                    outcome: MclOutcome::Singletons,
                }
            }
        }
    }
}

/// MCL with the default configuration
pub fn run_mcl(graph: &GraphStore) -> Partition {
    run_mcl_with(graph, &Config::default())
}

pub fn run_mcl_with(graph: &GraphStore, config: &Config) -> Partition {
    let partition = MclExecutor::new(&config.mcl).run(graph);
    log::info!("MCL found {} clusters", partition.len());
    partition
}
