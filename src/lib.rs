//! Core library functions for clustering protein-protein interaction networks
//!
//! Load a network with [`load_graph`], partition it with one of the `run_*`
//! strategies (or [`Algorithm::run`]) and score the result with
//! [`evaluate_clusters`].

pub mod cluster;
pub mod community;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod graph;
pub mod storage;

pub use cluster::{
    evaluate_clusters, run_fast_greedy, run_girvan_newman, run_leiden, run_louvain, run_mcl,
    run_walktrap, Algorithm, EvaluationStats, MclExecutor, Partition,
};
pub use config::{Config, MclConfig};
pub use data::{load_graph, load_graph_with};
pub use error::{Error, Result};
pub use events::{EventSink, LogSink, PipelineEvent, RecordingSink};
pub use graph::GraphStore;
