//! Numeric community-detection routines
//!
//! Every routine works on an [`IndexedView`](crate::graph::IndexedView) and
//! returns node indices; translating back to labels and applying the shared
//! edge-case policy is done by [`crate::cluster`].

pub mod capability;
pub mod girvan_newman;
pub mod louvain;
pub mod markov;

#[cfg(feature = "extended-algorithms")]
mod agglomerative;
#[cfg(feature = "extended-algorithms")]
pub mod fast_greedy;
#[cfg(feature = "extended-algorithms")]
pub mod leiden;
#[cfg(feature = "extended-algorithms")]
pub mod walktrap;
#[cfg(feature = "extended-algorithms")]
mod weighted;

pub use markov::{MarkovClustering, MatrixInput, MclResult, MclRoutine};

use crate::error::RoutineError;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Run a routine, turning a panic inside it into [`RoutineError::Panicked`]
pub(crate) fn guarded<T, F>(routine: F) -> Result<T, RoutineError>
where
    F: FnOnce() -> Result<T, RoutineError>,
{
    catch_unwind(AssertUnwindSafe(routine)).unwrap_or_else(|payload| {
        Err(RoutineError::Panicked(panic_message(payload.as_ref())))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
