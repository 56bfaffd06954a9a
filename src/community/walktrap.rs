//! Walktrap community detection (Pons & Latapy 2005).
//!
//! Nodes that short random walks tend to reach with the same probabilities
//! belong together. Every node gets a unit self-loop, so its walk degree is
//! `deg + 1`. A community `C` is summarised by the distribution
//! `P^t_C = mean(P^t_i for i in C)`, scaled by `D^{-1/2}`; adjacent
//! communities are merged in order of the smallest increase
//!
//! ```text
//! Δσ(C1, C2) = (1/n) · |C1||C2| / (|C1| + |C2|) · ‖P^t_C1 - P^t_C2‖²
//! ```
//!
//! The resulting dendrogram is cut where modularity peaks.

use super::agglomerative::{Agglomeration, Candidate};
use crate::error::RoutineError;
use crate::graph::IndexedView;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

/// Sparse probability vector, sorted by node index
type Distribution = Vec<(usize, f64)>;

/// Groups of node indices, ordered by smallest member
pub fn walktrap(view: &IndexedView, steps: usize) -> Result<Vec<Vec<usize>>, RoutineError> {
    if steps == 0 {
        return Err(RoutineError::InvalidInput(
            "walk length must be at least one step".to_string(),
        ));
    }

    let n = view.node_count();
    let walk_degrees: Vec<f64> = (0..n).map(|i| view.neighbors(i).len() as f64 + 1.0).collect();

    let mut distributions: Vec<Distribution> = (0..n)
        .map(|start| walk(view, &walk_degrees, start, steps))
        .collect();
    if !distributions.iter().flatten().all(|(_, p)| p.is_finite()) {
        return Err(RoutineError::NonFinite("walk distribution"));
    }
    let mut agg = Agglomeration::new(view);

    let delta_sigma = |agg: &Agglomeration, distributions: &[Distribution], a: usize, b: usize| {
        let (sa, sb) = (agg.size(a) as f64, agg.size(b) as f64);
        sa * sb / (sa + sb) * squared_distance(&distributions[a], &distributions[b]) / n as f64
    };

    let mut heap: BinaryHeap<Candidate> = view
        .edges()
        .iter()
        .map(|&(a, b)| Candidate::new(-delta_sigma(&agg, &distributions, a, b), a, b))
        .collect();

    while let Some(candidate) = heap.pop() {
        let (a, b) = (candidate.a, candidate.b);
        if !agg.is_alive(a) || !agg.is_alive(b) {
            continue;
        }

        let (sa, sb) = (agg.size(a) as f64, agg.size(b) as f64);
        let combined = weighted_mean(&distributions[a], sa, &distributions[b], sb);
        distributions[a] = Vec::new();
        distributions[b] = Vec::new();

        let merged = agg.merge(a, b);
        distributions.push(combined);

        for neighbor in agg.neighbors(merged) {
            let key = -delta_sigma(&agg, &distributions, merged, neighbor);
            heap.push(Candidate::new(key, merged, neighbor));
        }
    }

    Ok(agg.into_groups())
}

/// Row `start` of `P^t`, divided entry-wise by `sqrt(walk degree)`
fn walk(view: &IndexedView, walk_degrees: &[f64], start: usize, steps: usize) -> Distribution {
    let mut current: BTreeMap<usize, f64> = BTreeMap::new();
    current.insert(start, 1.0);

    for _ in 0..steps {
        let mut next: BTreeMap<usize, f64> = BTreeMap::new();
        for (&node, &p) in &current {
            let share = p / walk_degrees[node];
            *next.entry(node).or_insert(0.0) += share;
            for &neighbor in view.neighbors(node) {
                *next.entry(neighbor).or_insert(0.0) += share;
            }
        }
        current = next;
    }

    current
        .into_iter()
        .map(|(node, p)| (node, p / walk_degrees[node].sqrt()))
        .collect()
}

fn squared_distance(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut total = 0.0;
    loop {
        let diff = match (a.get(i), b.get(j)) {
            (Some(&(ka, va)), Some(&(kb, vb))) => match ka.cmp(&kb) {
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                    va - vb
                }
                Ordering::Less => {
                    i += 1;
                    va
                }
                Ordering::Greater => {
                    j += 1;
                    vb
                }
            },
            (Some(&(_, va)), None) => {
                i += 1;
                va
            }
            (None, Some(&(_, vb))) => {
                j += 1;
                vb
            }
            (None, None) => break,
        };
        total += diff * diff;
    }
    total
}

/// `(wa·a + wb·b) / (wa + wb)` over the union of both supports
fn weighted_mean(a: &[(usize, f64)], wa: f64, b: &[(usize, f64)], wb: f64) -> Distribution {
    let total = wa + wb;
    let mut sum: BTreeMap<usize, f64> = BTreeMap::new();
    for &(k, v) in a {
        *sum.entry(k).or_insert(0.0) += wa * v;
    }
    for &(k, v) in b {
        *sum.entry(k).or_insert(0.0) += wb * v;
    }
    sum.into_iter().map(|(k, v)| (k, v / total)).collect()
}
