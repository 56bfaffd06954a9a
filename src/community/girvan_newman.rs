//! First level of the Girvan-Newman divisive hierarchy
//!
//! Edges with the highest betweenness are removed one at a time until the
//! number of connected components grows; the components at that moment are
//! the result. Betweenness is recomputed after every removal (Brandes, with
//! one BFS per source spread over the rayon pool).

use crate::error::RoutineError;
use crate::graph::IndexedView;
use rayon::prelude::*;
use std::collections::VecDeque;

/// Working copy of the graph with removable edges
struct EdgeGraph {
    /// node -> [(neighbor, edge id)]
    adj: Vec<Vec<(usize, usize)>>,
    endpoints: Vec<(usize, usize)>,
    removed: Vec<bool>,
}

impl EdgeGraph {
    fn new(view: &IndexedView) -> Self {
        let mut adj = vec![Vec::new(); view.node_count()];
        for (id, &(a, b)) in view.edges().iter().enumerate() {
            adj[a].push((b, id));
            adj[b].push((a, id));
        }
        Self {
            adj,
            endpoints: view.edges().to_vec(),
            removed: vec![false; view.edge_count()],
        }
    }

    fn remaining(&self) -> usize {
        self.removed.iter().filter(|r| !**r).count()
    }

    fn reachable(&self, from: usize, to: usize) -> bool {
        let mut seen = vec![false; self.adj.len()];
        let mut queue = VecDeque::from([from]);
        seen[from] = true;
        while let Some(v) = queue.pop_front() {
            if v == to {
                return true;
            }
            for &(w, id) in &self.adj[v] {
                if !self.removed[id] && !seen[w] {
                    seen[w] = true;
                    queue.push_back(w);
                }
            }
        }
        false
    }

    /// Components over live edges, each sorted, ordered by smallest member
    fn components(&self) -> Vec<Vec<usize>> {
        let mut label = vec![usize::MAX; self.adj.len()];
        let mut groups = Vec::new();
        for start in 0..self.adj.len() {
            if label[start] != usize::MAX {
                continue;
            }
            let mut group = vec![start];
            label[start] = groups.len();
            let mut queue = VecDeque::from([start]);
            while let Some(v) = queue.pop_front() {
                for &(w, id) in &self.adj[v] {
                    if !self.removed[id] && label[w] == usize::MAX {
                        label[w] = groups.len();
                        group.push(w);
                        queue.push_back(w);
                    }
                }
            }
            group.sort_unstable();
            groups.push(group);
        }
        groups
    }

    /// Brandes edge betweenness over the live edges
    fn edge_betweenness(&self) -> Vec<f64> {
        let n = self.adj.len();
        let edge_total = self.endpoints.len();

        (0..n)
            .into_par_iter()
            .fold(
                || vec![0.0; edge_total],
                |mut scores, source| {
                    self.accumulate(source, &mut scores);
                    scores
                },
            )
            .reduce(
                || vec![0.0; edge_total],
                |mut a, b| {
                    for (x, y) in a.iter_mut().zip(b) {
                        *x += y;
                    }
                    a
                },
            )
    }

    /// Add the dependencies of shortest paths starting at `source`
    fn accumulate(&self, source: usize, scores: &mut [f64]) {
        let n = self.adj.len();
        let mut stack = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
        let mut paths = vec![0.0; n];
        let mut distance: Vec<Option<usize>> = vec![None; n];
        paths[source] = 1.0;
        distance[source] = Some(0);

        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let dv = distance[v].unwrap_or(0);
            for &(w, id) in &self.adj[v] {
                if self.removed[id] {
                    continue;
                }
                if distance[w].is_none() {
                    distance[w] = Some(dv + 1);
                    queue.push_back(w);
                }
                if distance[w] == Some(dv + 1) {
                    paths[w] += paths[v];
                    predecessors[w].push((v, id));
                }
            }
        }

        let mut dependency = vec![0.0; n];
        while let Some(w) = stack.pop() {
            for &(v, id) in &predecessors[w] {
                let contribution = paths[v] / paths[w] * (1.0 + dependency[w]);
                scores[id] += contribution;
                dependency[v] += contribution;
            }
        }
    }
}

/// Components after the first betweenness split, ordered by smallest member
///
/// A graph without edges comes back as a single group.
pub fn first_split(view: &IndexedView) -> Result<Vec<Vec<usize>>, RoutineError> {
    let mut graph = EdgeGraph::new(view);
    if view.edge_count() == 0 {
        return Ok(vec![(0..view.node_count()).collect()]);
    }

    while graph.remaining() > 0 {
        let scores = graph.edge_betweenness();

        let mut best: Option<(usize, f64)> = None;
        for (id, &score) in scores.iter().enumerate() {
            if graph.removed[id] {
                continue;
            }
            if !score.is_finite() {
                return Err(RoutineError::NonFinite("edge betweenness"));
            }
            match best {
                Some((_, top)) if score <= top + 1e-9 => {}
                _ => best = Some((id, score)),
            }
        }

        let Some((id, score)) = best else { break };
        let (a, b) = graph.endpoints[id];
        graph.removed[id] = true;
        log::debug!("Removed edge ({}, {}) with betweenness {:.3}", a, b, score);

        if !graph.reachable(a, b) {
            return Ok(graph.components());
        }
    }

    Ok(graph.components())
}
