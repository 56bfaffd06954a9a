//! Markov clustering (van Dongen 2000).
//!
//! Alternates expansion (matrix power) and inflation (entry-wise power with
//! column renormalisation) on a column-stochastic matrix until it stops
//! changing. Nodes with a positive diagonal entry in the limit are
//! attractors; each attractor's row lists the members of one cluster.
//!
//! The routine accepts either a sparse or a dense matrix, so callers can retry
//! with a different representation when one of them is rejected.

use crate::config::MclConfig;
use crate::error::RoutineError;
use crate::graph::{CooMatrix, CsrMatrix};
use ndarray::{Array2, Axis, Zip};
use std::collections::BTreeSet;

/// Absolute tolerance of the convergence check
const ABSOLUTE_TOLERANCE: f64 = 1e-8;

/// Matrix handed to an [`MclRoutine`]
#[derive(Debug, Clone, Copy)]
pub enum MatrixInput<'a> {
    Sparse(&'a CsrMatrix),
    Dense(&'a Array2<f64>),
}

impl MatrixInput<'_> {
    pub fn shape(&self) -> (usize, usize) {
        match self {
            MatrixInput::Sparse(m) => m.shape(),
            MatrixInput::Dense(m) => m.dim(),
        }
    }
}

/// Converged matrix of a Markov clustering run
#[derive(Debug, Clone)]
pub struct MclResult {
    matrix: CsrMatrix,
}

impl MclResult {
    pub fn new(matrix: CsrMatrix) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &CsrMatrix {
        &self.matrix
    }

    /// Attractor rows as sorted index lists; identical rows are merged
    ///
    /// Clusters are returned in lexicographic order and may overlap when a
    /// node is pulled towards more than one attractor.
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        let clusters: BTreeSet<Vec<usize>> = self
            .matrix
            .diagonal()
            .iter()
            .enumerate()
            .filter(|(_, &value)| value > 0.0)
            .map(|(attractor, _)| {
                let (cols, values) = self.matrix.row(attractor);
                let mut members: Vec<usize> = cols
                    .iter()
                    .zip(values)
                    .filter(|(_, &v)| v != 0.0)
                    .map(|(&c, _)| c)
                    .collect();
                members.sort_unstable();
                members.dedup();
                members
            })
            .collect();
        clusters.into_iter().collect()
    }
}

/// A Markov clustering implementation
pub trait MclRoutine {
    fn run(
        &self,
        input: MatrixInput<'_>,
        inflation: f64,
        expansion: u32,
    ) -> Result<MclResult, RoutineError>;
}

/// In-process Markov clustering on [`CsrMatrix`] or `ndarray` input
#[derive(Debug, Clone)]
pub struct MarkovClustering {
    max_iterations: usize,
    pruning_threshold: f64,
    tolerance: f64,
    loop_value: f64,
}

impl Default for MarkovClustering {
    fn default() -> Self {
        Self::from_config(&MclConfig::default())
    }
}

impl MarkovClustering {
    pub fn from_config(config: &MclConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
            pruning_threshold: config.pruning_threshold,
            tolerance: config.tolerance,
            loop_value: config.loop_value,
        }
    }

    fn check_parameters(&self, inflation: f64, expansion: u32) -> Result<(), RoutineError> {
        if !inflation.is_finite() || inflation <= 0.0 {
            return Err(RoutineError::InvalidInput(format!(
                "inflation must be positive, got {}",
                inflation
            )));
        }
        if expansion == 0 {
            return Err(RoutineError::InvalidInput(
                "expansion must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn run_sparse(
        &self,
        input: &CsrMatrix,
        inflation: f64,
        expansion: u32,
    ) -> Result<CsrMatrix, RoutineError> {
        input.check_structure()?;
        if !input.data().iter().all(|v| v.is_finite()) {
            return Err(RoutineError::NonFinite("input matrix"));
        }

        let n = input.shape().0;
        let mut matrix = input.clone();
        matrix.clear_diagonal();
        let mut loops = CooMatrix::new(n, n);
        for i in 0..n {
            loops.push(i, i, self.loop_value);
        }
        matrix = matrix.add(&loops.to_csr())?;
        matrix.eliminate_zeros();
        normalize_sparse(&mut matrix);

        for iteration in 0..self.max_iterations {
            let last = matrix.clone();

            let mut expanded = matrix.clone();
            for _ in 1..expansion {
                expanded = expanded.matmul(&matrix)?;
            }
            matrix = expanded;

            for value in matrix.data_mut() {
                *value = value.powf(inflation);
            }
            normalize_sparse(&mut matrix);
            if !matrix.data().iter().all(|v| v.is_finite()) {
                return Err(RoutineError::NonFinite("sparse iteration"));
            }

            self.prune_sparse(&mut matrix);

            if sparse_close(&matrix, &last, self.tolerance) {
                log::debug!("Sparse MCL converged after {} iterations", iteration + 1);
                break;
            }
        }

        Ok(matrix)
    }

    /// Drop entries below the threshold, keeping each column's maximum
    fn prune_sparse(&self, matrix: &mut CsrMatrix) {
        let (rows, cols) = matrix.shape();
        let mut column_max: Vec<Option<(usize, f64)>> = vec![None; cols];
        for i in 0..rows {
            let (indices, values) = matrix.row(i);
            for (&c, &v) in indices.iter().zip(values) {
                match column_max[c] {
                    Some((_, best)) if v <= best => {}
                    _ => column_max[c] = Some((i, v)),
                }
            }
        }

        let indptr = matrix.indptr().to_vec();
        let indices = matrix.indices().to_vec();
        let threshold = self.pruning_threshold;
        let data = matrix.data_mut();
        for i in 0..rows {
            for k in indptr[i]..indptr[i + 1] {
                let keep = column_max[indices[k]].map_or(false, |(row, _)| row == i);
                if data[k] < threshold && !keep {
                    data[k] = 0.0;
                }
            }
        }
        matrix.eliminate_zeros();
    }

    fn run_dense(
        &self,
        input: &Array2<f64>,
        inflation: f64,
        expansion: u32,
    ) -> Result<Array2<f64>, RoutineError> {
        if !input.iter().all(|v| v.is_finite()) {
            return Err(RoutineError::NonFinite("input matrix"));
        }

        let mut matrix = input.clone();
        matrix.diag_mut().fill(self.loop_value);
        normalize_dense(&mut matrix);

        for iteration in 0..self.max_iterations {
            let last = matrix.clone();

            let mut expanded = matrix.clone();
            for _ in 1..expansion {
                expanded = expanded.dot(&matrix);
            }
            matrix = expanded;

            matrix.mapv_inplace(|v| v.powf(inflation));
            normalize_dense(&mut matrix);
            if !matrix.iter().all(|v| v.is_finite()) {
                return Err(RoutineError::NonFinite("dense iteration"));
            }

            self.prune_dense(&mut matrix);

            let converged = Zip::from(&matrix).and(&last).all(|&a, &b| {
                (a - b).abs() <= ABSOLUTE_TOLERANCE + self.tolerance * b.abs()
            });
            if converged {
                log::debug!("Dense MCL converged after {} iterations", iteration + 1);
                break;
            }
        }

        Ok(matrix)
    }

    fn prune_dense(&self, matrix: &mut Array2<f64>) {
        for mut column in matrix.axis_iter_mut(Axis(1)) {
            let mut best: Option<(usize, f64)> = None;
            for (i, &v) in column.iter().enumerate() {
                match best {
                    Some((_, top)) if v <= top => {}
                    _ => best = Some((i, v)),
                }
            }
            for (i, v) in column.iter_mut().enumerate() {
                let keep = best.map_or(false, |(row, _)| row == i);
                if *v < self.pruning_threshold && !keep {
                    *v = 0.0;
                }
            }
        }
    }
}

impl MclRoutine for MarkovClustering {
    fn run(
        &self,
        input: MatrixInput<'_>,
        inflation: f64,
        expansion: u32,
    ) -> Result<MclResult, RoutineError> {
        self.check_parameters(inflation, expansion)?;
        let (rows, cols) = input.shape();
        if rows != cols {
            return Err(RoutineError::InvalidInput(format!(
                "matrix must be square, got {}x{}",
                rows, cols
            )));
        }

        let matrix = match input {
            MatrixInput::Sparse(m) => self.run_sparse(m, inflation, expansion)?,
            MatrixInput::Dense(m) => CsrMatrix::from_dense(&self.run_dense(m, inflation, expansion)?),
        };
        Ok(MclResult::new(matrix))
    }
}

/// Scale every column to sum to one; empty columns are left alone
fn normalize_sparse(matrix: &mut CsrMatrix) {
    let sums = matrix.column_sums();
    let indices = matrix.indices().to_vec();
    for (value, c) in matrix.data_mut().iter_mut().zip(indices) {
        if sums[c] != 0.0 {
            *value /= sums[c];
        }
    }
}

fn normalize_dense(matrix: &mut Array2<f64>) {
    for mut column in matrix.axis_iter_mut(Axis(1)) {
        let sum = column.sum();
        if sum != 0.0 {
            column.mapv_inplace(|v| v / sum);
        }
    }
}

/// Element-wise closeness of two matrices with sorted row indices
fn sparse_close(a: &CsrMatrix, b: &CsrMatrix, rtol: f64) -> bool {
    if a.shape() != b.shape() {
        return false;
    }
    let close = |x: f64, y: f64| (x - y).abs() <= ABSOLUTE_TOLERANCE + rtol * y.abs();

    (0..a.shape().0).all(|i| {
        let (ac, av) = a.row(i);
        let (bc, bv) = b.row(i);
        let (mut p, mut q) = (0, 0);
        while p < ac.len() || q < bc.len() {
            let ok = match (ac.get(p), bc.get(q)) {
                (Some(&ca), Some(&cb)) if ca == cb => {
                    p += 1;
                    q += 1;
                    close(av[p - 1], bv[q - 1])
                }
                (Some(&ca), Some(&cb)) if ca < cb => {
                    p += 1;
                    close(av[p - 1], 0.0)
                }
                (Some(_), None) => {
                    p += 1;
                    close(av[p - 1], 0.0)
                }
                _ => {
                    q += 1;
                    close(0.0, bv[q - 1])
                }
            };
            if !ok {
                return false;
            }
        }
        true
    })
}
