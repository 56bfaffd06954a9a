//! Availability of the optional community-detection routines
//!
//! Walktrap, Fast Greedy and Leiden are compiled only with the
//! `extended-algorithms` feature. Whether they are present is resolved once,
//! on first use, and a missing backend is reported per call.

use crate::cluster::Algorithm;
use crate::error::{Error, Result, RoutineError};
use crate::graph::IndexedView;
use std::sync::OnceLock;

/// Name of the cargo feature providing [`ExtendedBackend`]
pub const EXTENDED_FEATURE: &str = "extended-algorithms";

/// Entry points of the optional routines
#[derive(Clone, Copy)]
pub struct ExtendedBackend {
    /// `(view, steps)` to node groups
    pub walktrap: fn(&IndexedView, usize) -> std::result::Result<Vec<Vec<usize>>, RoutineError>,
    pub fast_greedy: fn(&IndexedView) -> std::result::Result<Vec<Vec<usize>>, RoutineError>,
    /// `(view, resolution, max_levels)` to a membership vector
    pub leiden: fn(&IndexedView, f64, usize) -> std::result::Result<Vec<usize>, RoutineError>,
}

pub enum Capability {
    Available(ExtendedBackend),
    Unavailable,
}

static EXTENDED: OnceLock<Capability> = OnceLock::new();

#[cfg(feature = "extended-algorithms")]
fn detect() -> Capability {
    Capability::Available(ExtendedBackend {
        walktrap: super::walktrap::walktrap,
        fast_greedy: super::fast_greedy::fast_greedy,
        leiden: super::leiden::leiden,
    })
}

#[cfg(not(feature = "extended-algorithms"))]
fn detect() -> Capability {
    Capability::Unavailable
}

/// The optional routines, resolved on first call
pub fn extended() -> &'static Capability {
    EXTENDED.get_or_init(|| {
        let capability = detect();
        if let Capability::Unavailable = capability {
            log::debug!("Built without {}", EXTENDED_FEATURE);
        }
        capability
    })
}

/// The backend for `algorithm`, or [`Error::DependencyMissing`]
pub fn require(algorithm: Algorithm) -> Result<&'static ExtendedBackend> {
    backend_for(extended(), algorithm)
}

fn backend_for(capability: &Capability, algorithm: Algorithm) -> Result<&ExtendedBackend> {
    match capability {
        Capability::Available(backend) => Ok(backend),
        Capability::Unavailable => Err(Error::DependencyMissing {
            algorithm,
            dependency: EXTENDED_FEATURE,
        }),
    }
}
