//! Clustering strategies and partition evaluation
//!
//! Every strategy maps a [`GraphStore`] to a [`Partition`] under the same
//! edge-case policy: a graph without nodes gives an empty partition and a
//! graph without edges gives one singleton group per node, without invoking
//! any routine. Otherwise the graph is indexed, handed to its routine and the
//! result translated back to labels. Routine failures surface as
//! [`Error::Clustering`], except for MCL which degrades instead (see
//! [`mcl`]).

pub mod detection;
pub mod mcl;
pub mod metrics;
pub mod partition;

pub use detection::{cluster_density, connected_components_partition};
pub use mcl::{run_mcl, run_mcl_with, MclExecutor, MclOutcome, MclReport};
pub use metrics::{evaluate_clusters, evaluate_clusters_with, modularity, EvaluationStats};
pub use partition::Partition;

use crate::community::{capability, girvan_newman, guarded, louvain};
use crate::config::Config;
use crate::error::{Error, Result, RoutineError, UnknownAlgorithm};
use crate::graph::{to_indexed, GraphStore, IndexedView};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The available clustering strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Louvain,
    Mcl,
    GirvanNewman,
    Walktrap,
    FastGreedy,
    Leiden,
}

impl Algorithm {
    pub const ALL: [Algorithm; 6] = [
        Algorithm::Louvain,
        Algorithm::Mcl,
        Algorithm::GirvanNewman,
        Algorithm::Walktrap,
        Algorithm::FastGreedy,
        Algorithm::Leiden,
    ];

    /// Command-line name
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Louvain => "louvain",
            Algorithm::Mcl => "mcl",
            Algorithm::GirvanNewman => "girvan-newman",
            Algorithm::Walktrap => "walktrap",
            Algorithm::FastGreedy => "fast-greedy",
            Algorithm::Leiden => "leiden",
        }
    }

    /// True for strategies that need the `extended-algorithms` backend
    pub fn is_optional(self) -> bool {
        matches!(
            self,
            Algorithm::Walktrap | Algorithm::FastGreedy | Algorithm::Leiden
        )
    }

    /// Run with the default configuration
    pub fn run(self, graph: &GraphStore) -> Result<Partition> {
        self.run_with(graph, &Config::default())
    }

    pub fn run_with(self, graph: &GraphStore, config: &Config) -> Result<Partition> {
        match self {
            Algorithm::Louvain => run_louvain(graph),
            Algorithm::Mcl => Ok(run_mcl_with(graph, config)),
            Algorithm::GirvanNewman => run_girvan_newman(graph),
            Algorithm::Walktrap => run_walktrap_with(graph, config),
            Algorithm::FastGreedy => run_fast_greedy(graph),
            Algorithm::Leiden => run_leiden_with(graph, config),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Algorithm::ALL
            .iter()
            .copied()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

/// Shared edge-case policy around a strategy's routine
fn run_strategy<F>(graph: &GraphStore, algorithm: Algorithm, routine: F) -> Result<Partition>
where
    F: FnOnce(&IndexedView) -> Result<Partition>,
{
    if graph.is_empty() {
        return Ok(Partition::default());
    }
    if graph.edge_count() == 0 {
        log::info!(
            "Graph has no edges; {} returns {} singleton groups",
            algorithm,
            graph.node_count()
        );
        return Ok(Partition::singletons(graph));
    }

    log::info!(
        "Running {} on {} nodes and {} edges",
        algorithm,
        graph.node_count(),
        graph.edge_count()
    );
    let view = to_indexed(graph)?;
    let partition = routine(&view)?;
    ensure_partition(&view, &partition)
        .map_err(|source| Error::Clustering { algorithm, source })?;

    log::info!("{} found {} clusters", algorithm, partition.len());
    Ok(partition)
}

/// Routine output must place every node in exactly one group
fn ensure_partition(
    view: &IndexedView,
    partition: &Partition,
) -> std::result::Result<(), RoutineError> {
    if partition.member_count() != view.node_count() || !partition.is_disjoint() {
        return Err(RoutineError::NotAPartition(format!(
            "{} memberships for {} nodes",
            partition.member_count(),
            view.node_count()
        )));
    }
    Ok(())
}

/// Run a routine under the panic guard, wrapping its failure
fn invoke<T, F>(algorithm: Algorithm, routine: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, RoutineError>,
{
    guarded(routine).map_err(|source| Error::Clustering { algorithm, source })
}

/// Translate a membership vector, checking it covers the view
fn from_membership(
    view: &IndexedView,
    membership: &[usize],
) -> std::result::Result<Partition, RoutineError> {
    if membership.len() != view.node_count() {
        return Err(RoutineError::NotAPartition(format!(
            "membership has {} entries for {} nodes",
            membership.len(),
            view.node_count()
        )));
    }
    Ok(view.membership_to_partition(membership))
}

/// aprender's Louvain with its default settings
pub fn run_louvain(graph: &GraphStore) -> Result<Partition> {
    let algorithm = Algorithm::Louvain;
    run_strategy(graph, algorithm, |view| {
        invoke(algorithm, || {
            louvain::louvain(view).map(|groups| view.groups_to_partition(groups))
        })
    })
}

/// Components after the first edge-betweenness split
pub fn run_girvan_newman(graph: &GraphStore) -> Result<Partition> {
    let algorithm = Algorithm::GirvanNewman;
    run_strategy(graph, algorithm, |view| {
        invoke(algorithm, || {
            girvan_newman::first_split(view).map(|groups| view.groups_to_partition(groups))
        })
    })
}

pub fn run_walktrap(graph: &GraphStore) -> Result<Partition> {
    run_walktrap_with(graph, &Config::default())
}

pub fn run_walktrap_with(graph: &GraphStore, config: &Config) -> Result<Partition> {
    let algorithm = Algorithm::Walktrap;
    run_strategy(graph, algorithm, |view| {
        let backend = capability::require(algorithm)?;
        invoke(algorithm, || {
            (backend.walktrap)(view, config.walktrap_steps)
                .map(|groups| view.groups_to_partition(groups))
        })
    })
}

pub fn run_fast_greedy(graph: &GraphStore) -> Result<Partition> {
    let algorithm = Algorithm::FastGreedy;
    run_strategy(graph, algorithm, |view| {
        let backend = capability::require(algorithm)?;
        invoke(algorithm, || {
            (backend.fast_greedy)(view).map(|groups| view.groups_to_partition(groups))
        })
    })
}

pub fn run_leiden(graph: &GraphStore) -> Result<Partition> {
    run_leiden_with(graph, &Config::default())
}

pub fn run_leiden_with(graph: &GraphStore, config: &Config) -> Result<Partition> {
    let algorithm = Algorithm::Leiden;
    run_strategy(graph, algorithm, |view| {
        let backend = capability::require(algorithm)?;
        invoke(algorithm, || {
            let membership = (backend.leiden)(view, config.resolution, config.max_levels)?;
            from_membership(view, &membership)
        })
    })
}
