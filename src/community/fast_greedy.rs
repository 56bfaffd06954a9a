//! Greedy modularity agglomeration (Clauset, Newman & Moore 2004).
//!
//! Starting from singletons, repeatedly merge the adjacent pair with the
//! largest modularity change `ΔQ = 2(e_ij - a_i a_j)` until no adjacent pair
//! is left, then cut the dendrogram at its modularity peak. Equal gains are
//! resolved towards the lowest community ids, so the result is reproducible.

use super::agglomerative::{Agglomeration, Candidate};
use crate::error::RoutineError;
use crate::graph::IndexedView;
use std::collections::BinaryHeap;

/// Groups of node indices, ordered by smallest member
pub fn fast_greedy(view: &IndexedView) -> Result<Vec<Vec<usize>>, RoutineError> {
    let mut agg = Agglomeration::new(view);

    let mut heap: BinaryHeap<Candidate> = view
        .edges()
        .iter()
        .map(|&(a, b)| Candidate::new(agg.modularity_gain(a, b), a, b))
        .collect();

    while let Some(candidate) = heap.pop() {
        let (a, b) = (candidate.a, candidate.b);
        if !agg.is_alive(a) || !agg.is_alive(b) {
            continue;
        }
        if !candidate.key.is_finite() {
            return Err(RoutineError::NonFinite("modularity gain"));
        }

        let merged = agg.merge(a, b);
        for neighbor in agg.neighbors(merged) {
            heap.push(Candidate::new(
                agg.modularity_gain(merged, neighbor),
                merged,
                neighbor,
            ));
        }
    }

    Ok(agg.into_groups())
}
