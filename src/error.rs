//! Error types for loading, clustering and evaluation

use std::path::PathBuf;
use thiserror::Error;

use crate::cluster::Algorithm;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to callers, each naming the stage that failed
#[derive(Debug, Error)]
pub enum Error {
    /// The input path does not resolve to a file
    #[error("no file found at {}", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but its content could not be parsed
    #[error("graph loading failed for {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Nothing is left after self-loop removal and component extraction
    #[error("graph is empty after preprocessing")]
    EmptyGraph,

    /// An optional algorithm was requested but is not compiled in
    #[error("{algorithm} requires {dependency}, which is not available in this build")]
    DependencyMissing {
        algorithm: Algorithm,
        dependency: &'static str,
    },

    /// The numeric routine behind a strategy failed
    #[error("{algorithm} clustering failed: {source}")]
    Clustering {
        algorithm: Algorithm,
        #[source]
        source: RoutineError,
    },
}

/// An algorithm name that matches no strategy
#[derive(Debug, Error)]
#[error("unknown algorithm '{0}' (expected louvain, mcl, girvan-newman, walktrap, fast-greedy or leiden)")]
pub struct UnknownAlgorithm(pub String);

/// Failures while parsing an input file
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid matrix-market header: {0}")]
    Header(String),

    #[error("unsupported matrix-market field type '{0}'")]
    UnsupportedField(String),

    #[error("line {line}: {message}")]
    Line { line: usize, message: String },

    #[error("matrix-market entry ({row}, {col}) outside a {rows}x{cols} matrix")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("expected {expected} matrix-market entries, found {found}")]
    EntryCount { expected: usize, found: usize },
}

/// Failures of a numeric community-detection routine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("non-finite value encountered in {0}")]
    NonFinite(&'static str),

    #[error("communities do not partition the graph: {0}")]
    NotAPartition(String),

    #[error("routine panicked: {0}")]
    Panicked(String),
}
