//! Bookkeeping shared by the bottom-up merging routines
//!
//! Merged communities always get a fresh id, so a queued candidate pair stays
//! valid for as long as both of its ids are alive. Every merge is logged with
//! the modularity it produces; the dendrogram is then cut where modularity
//! peaks.

use crate::graph::algorithms::DisjointSets;
use crate::graph::IndexedView;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Queued merge; the heap pops the highest key, lowest pair on ties
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    pub key: f64,
    pub a: usize,
    pub b: usize,
}

impl Candidate {
    pub fn new(key: f64, a: usize, b: usize) -> Self {
        Self {
            key,
            a: a.min(b),
            b: a.max(b),
        }
    }
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .total_cmp(&other.key)
            .then_with(|| (other.a, other.b).cmp(&(self.a, self.b)))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub(crate) struct Agglomeration {
    node_count: usize,
    /// Edge weight to every adjacent live community
    links: Vec<BTreeMap<usize, f64>>,
    /// Degree sum per community
    totals: Vec<f64>,
    sizes: Vec<usize>,
    /// An original node inside each community
    representatives: Vec<usize>,
    alive: Vec<bool>,
    two_m: f64,
    modularity: f64,
    merges: Vec<(usize, usize)>,
    history: Vec<f64>,
}

impl Agglomeration {
    /// Singleton communities over the view's nodes
    pub fn new(view: &IndexedView) -> Self {
        let n = view.node_count();
        let mut links = vec![BTreeMap::new(); n];
        for &(a, b) in view.edges() {
            links[a].insert(b, 1.0);
            links[b].insert(a, 1.0);
        }
        let totals: Vec<f64> = (0..n).map(|i| view.neighbors(i).len() as f64).collect();
        let two_m = 2.0 * view.edge_count() as f64;
        let modularity = if two_m > 0.0 {
            -totals.iter().map(|t| (t / two_m).powi(2)).sum::<f64>()
        } else {
            0.0
        };

        Self {
            node_count: n,
            links,
            totals,
            sizes: vec![1; n],
            representatives: (0..n).collect(),
            alive: vec![true; n],
            two_m,
            modularity,
            merges: Vec::new(),
            history: vec![modularity],
        }
    }

    pub fn is_alive(&self, community: usize) -> bool {
        self.alive.get(community).copied().unwrap_or(false)
    }

    pub fn size(&self, community: usize) -> usize {
        self.sizes[community]
    }

    pub fn neighbors(&self, community: usize) -> Vec<usize> {
        self.links[community].keys().copied().collect()
    }

    /// Change in modularity if `a` and `b` were merged
    pub fn modularity_gain(&self, a: usize, b: usize) -> f64 {
        if self.two_m == 0.0 {
            return 0.0;
        }
        let between = self.links[a].get(&b).copied().unwrap_or(0.0);
        2.0 * between / self.two_m - 2.0 * self.totals[a] * self.totals[b] / self.two_m.powi(2)
    }

    /// Merge two live communities; returns the id of the new one
    pub fn merge(&mut self, a: usize, b: usize) -> usize {
        let merged = self.links.len();
        self.modularity += self.modularity_gain(a, b);

        let mut links = std::mem::take(&mut self.links[a]);
        for (k, w) in std::mem::take(&mut self.links[b]) {
            *links.entry(k).or_insert(0.0) += w;
        }
        links.remove(&a);
        links.remove(&b);
        for (&k, &w) in &links {
            let neighbor = &mut self.links[k];
            neighbor.remove(&a);
            neighbor.remove(&b);
            neighbor.insert(merged, w);
        }

        self.links.push(links);
        self.totals.push(self.totals[a] + self.totals[b]);
        self.sizes.push(self.sizes[a] + self.sizes[b]);
        self.representatives.push(self.representatives[a]);
        self.alive.push(true);
        self.alive[a] = false;
        self.alive[b] = false;

        self.merges
            .push((self.representatives[a], self.representatives[b]));
        self.history.push(self.modularity);
        merged
    }

    /// Number of merges at the first modularity peak
    pub fn best_cut(&self) -> usize {
        let mut best = 0;
        for (step, &q) in self.history.iter().enumerate() {
            if q > self.history[best] + 1e-12 {
                best = step;
            }
        }
        best
    }

    /// Node groups after replaying the merges up to the modularity peak
    pub fn into_groups(self) -> Vec<Vec<usize>> {
        let cut = self.best_cut();
        log::debug!(
            "Dendrogram of {} merges cut after {} (Q = {:.4})",
            self.merges.len(),
            cut,
            self.history[cut]
        );
        let mut sets = DisjointSets::new(self.node_count);
        for &(a, b) in &self.merges[..cut] {
            sets.union(a, b);
        }
        sets.groups()
    }
}
