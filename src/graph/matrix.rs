//! Sparse and dense adjacency matrices
//!
//! Layout conventions follow the usual compressed-sparse-row scheme:
//! row `i` owns `indices[indptr[i]..indptr[i + 1]]` and the matching `data`.

use crate::error::RoutineError;
use crate::graph::CompressedGraph;
use ndarray::Array2;

/// Compressed sparse row matrix of `f64`
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    rows: usize,
    cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

/// Coordinate-list matrix; duplicates are summed on conversion
#[derive(Debug, Clone, PartialEq)]
pub struct CooMatrix {
    rows: usize,
    cols: usize,
    row: Vec<usize>,
    col: Vec<usize>,
    data: Vec<f64>,
}

impl CsrMatrix {
    /// All-zero matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            indptr: vec![0; rows + 1],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Assemble from raw arrays, checking the structure
    pub fn from_parts(
        rows: usize,
        cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
    ) -> Result<Self, RoutineError> {
        let matrix = Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        };
        matrix.check_structure()?;
        Ok(matrix)
    }

    /// Binary adjacency matrix of an index-labelled graph
    pub fn from_adjacency(graph: &CompressedGraph) -> Self {
        Self {
            rows: graph.node_count,
            cols: graph.node_count,
            indptr: graph.offsets.clone(),
            indices: graph.targets.clone(),
            data: vec![1.0; graph.targets.len()],
        }
    }

    /// Every non-zero of a dense matrix, in row-major order
    pub fn from_dense(dense: &Array2<f64>) -> Self {
        let (rows, cols) = dense.dim();
        let mut indptr = Vec::with_capacity(rows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for row in dense.rows() {
            for (j, &value) in row.iter().enumerate() {
                if value != 0.0 {
                    indices.push(j);
                    data.push(value);
                }
            }
            indptr.push(indices.len());
        }
        Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of stored entries, explicit zeros included
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Column indices and values of one row
    pub fn row(&self, i: usize) -> (&[usize], &[f64]) {
        let range = self.indptr[i]..self.indptr[i + 1];
        (&self.indices[range.clone()], &self.data[range])
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        let (cols, values) = self.row(i);
        cols.iter()
            .zip(values)
            .filter(|(&c, _)| c == j)
            .map(|(_, &v)| v)
            .sum()
    }

    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.rows.min(self.cols)).map(|i| self.get(i, i)).collect()
    }

    /// Verify the compressed layout is internally consistent
    pub fn check_structure(&self) -> Result<(), RoutineError> {
        if self.indptr.len() != self.rows + 1 {
            return Err(RoutineError::InvalidInput(format!(
                "indptr has length {} for {} rows",
                self.indptr.len(),
                self.rows
            )));
        }
        if self.indptr[0] != 0 || self.indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(RoutineError::InvalidInput(
                "indptr is not monotonically increasing from zero".to_string(),
            ));
        }
        let nnz = self.indptr[self.rows];
        if nnz != self.indices.len() || nnz != self.data.len() {
            return Err(RoutineError::InvalidInput(format!(
                "indptr declares {} entries, found {} indices and {} values",
                nnz,
                self.indices.len(),
                self.data.len()
            )));
        }
        if let Some(&bad) = self.indices.iter().find(|&&c| c >= self.cols) {
            return Err(RoutineError::InvalidInput(format!(
                "column index {} out of range for {} columns",
                bad, self.cols
            )));
        }
        Ok(())
    }

    /// Drop stored entries equal to zero
    pub fn eliminate_zeros(&mut self) {
        let mut indptr = Vec::with_capacity(self.rows + 1);
        let mut indices = Vec::with_capacity(self.indices.len());
        let mut data = Vec::with_capacity(self.data.len());
        indptr.push(0);
        for i in 0..self.rows {
            let (cols, values) = self.row(i);
            for (&c, &v) in cols.iter().zip(values) {
                if v != 0.0 {
                    indices.push(c);
                    data.push(v);
                }
            }
            indptr.push(indices.len());
        }
        self.indptr = indptr;
        self.indices = indices;
        self.data = data;
    }

    /// Sort column indices within each row
    pub fn sort_indices(&mut self) {
        for i in 0..self.rows {
            let range = self.indptr[i]..self.indptr[i + 1];
            let mut entries: Vec<(usize, f64)> = self.indices[range.clone()]
                .iter()
                .copied()
                .zip(self.data[range.clone()].iter().copied())
                .collect();
            entries.sort_by_key(|&(c, _)| c);
            for (offset, (c, v)) in entries.into_iter().enumerate() {
                self.indices[range.start + offset] = c;
                self.data[range.start + offset] = v;
            }
        }
    }

    pub fn has_sorted_indices(&self) -> bool {
        (0..self.rows).all(|i| self.row(i).0.windows(2).all(|w| w[0] < w[1]))
    }

    pub fn transpose(&self) -> CsrMatrix {
        let mut coo = CooMatrix::new(self.cols, self.rows);
        for i in 0..self.rows {
            let (cols, values) = self.row(i);
            for (&c, &v) in cols.iter().zip(values) {
                coo.push(c, i, v);
            }
        }
        coo.to_csr()
    }

    /// Element-wise sum of two matrices of equal shape
    pub fn add(&self, other: &CsrMatrix) -> Result<CsrMatrix, RoutineError> {
        if self.shape() != other.shape() {
            return Err(RoutineError::InvalidInput(format!(
                "cannot add {:?} and {:?} matrices",
                self.shape(),
                other.shape()
            )));
        }
        let mut coo = self.to_coo();
        for i in 0..other.rows {
            let (cols, values) = other.row(i);
            for (&c, &v) in cols.iter().zip(values) {
                coo.push(i, c, v);
            }
        }
        Ok(coo.to_csr())
    }

    /// Set every stored diagonal entry to zero (structure is kept)
    pub fn clear_diagonal(&mut self) {
        for i in 0..self.rows {
            for k in self.indptr[i]..self.indptr[i + 1] {
                if self.indices[k] == i {
                    self.data[k] = 0.0;
                }
            }
        }
    }

    /// `A + Aᵀ`, positive entries clamped to 1, diagonal zeroed, zeros dropped
    pub fn symmetrized_binary(&self) -> Result<CsrMatrix, RoutineError> {
        let mut sym = self.add(&self.transpose())?;
        for value in sym.data.iter_mut() {
            if *value > 0.0 {
                *value = 1.0;
            }
        }
        sym.clear_diagonal();
        sym.eliminate_zeros();
        Ok(sym)
    }

    pub fn is_symmetric(&self) -> bool {
        self.rows == self.cols && self.transpose() == self.sorted()
    }

    fn sorted(&self) -> CsrMatrix {
        let mut copy = self.clone();
        copy.sort_indices();
        copy
    }

    pub fn to_coo(&self) -> CooMatrix {
        let mut coo = CooMatrix::new(self.rows, self.cols);
        for i in 0..self.rows {
            let (cols, values) = self.row(i);
            for (&c, &v) in cols.iter().zip(values) {
                coo.push(i, c, v);
            }
        }
        coo
    }

    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.rows, self.cols));
        for i in 0..self.rows {
            let (cols, values) = self.row(i);
            for (&c, &v) in cols.iter().zip(values) {
                dense[[i, c]] += v;
            }
        }
        dense
    }

    /// Sparse product `self · other`, rows with sorted indices
    pub fn matmul(&self, other: &CsrMatrix) -> Result<CsrMatrix, RoutineError> {
        if self.cols != other.rows {
            return Err(RoutineError::InvalidInput(format!(
                "cannot multiply {:?} by {:?}",
                self.shape(),
                other.shape()
            )));
        }

        let mut indptr = Vec::with_capacity(self.rows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        let mut accumulator = vec![0.0; other.cols];
        let mut touched = vec![false; other.cols];
        let mut row_cols: Vec<usize> = Vec::new();
        indptr.push(0);

        for i in 0..self.rows {
            let (cols, values) = self.row(i);
            for (&k, &a) in cols.iter().zip(values) {
                let (other_cols, other_values) = other.row(k);
                for (&j, &b) in other_cols.iter().zip(other_values) {
                    if !touched[j] {
                        touched[j] = true;
                        row_cols.push(j);
                    }
                    accumulator[j] += a * b;
                }
            }
            row_cols.sort_unstable();
            for &j in &row_cols {
                if accumulator[j] != 0.0 {
                    indices.push(j);
                    data.push(accumulator[j]);
                }
                accumulator[j] = 0.0;
                touched[j] = false;
            }
            row_cols.clear();
            indptr.push(indices.len());
        }

        Ok(CsrMatrix {
            rows: self.rows,
            cols: other.cols,
            indptr,
            indices,
            data,
        })
    }

    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.cols];
        for (&c, &v) in self.indices.iter().zip(&self.data) {
            sums[c] += v;
        }
        sums
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

impl CooMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            row: Vec::new(),
            col: Vec::new(),
            data: Vec::new(),
        }
    }

    pub fn push(&mut self, row: usize, col: usize, value: f64) {
        self.row.push(row);
        self.col.push(col);
        self.data.push(value);
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Convert to compressed rows, summing duplicate coordinates
    pub fn to_csr(&self) -> CsrMatrix {
        let mut order: Vec<usize> = (0..self.data.len()).collect();
        order.sort_by_key(|&k| (self.row[k], self.col[k]));

        let mut indptr = vec![0usize; self.rows + 1];
        let mut indices: Vec<usize> = Vec::with_capacity(order.len());
        let mut data: Vec<f64> = Vec::with_capacity(order.len());
        let mut last: Option<(usize, usize)> = None;

        for k in order {
            let key = (self.row[k], self.col[k]);
            if last == Some(key) {
                if let Some(value) = data.last_mut() {
                    *value += self.data[k];
                }
                continue;
            }
            last = Some(key);
            indptr[key.0 + 1] += 1;
            indices.push(key.1);
            data.push(self.data[k]);
        }

        for i in 0..self.rows {
            indptr[i + 1] += indptr[i];
        }

        CsrMatrix {
            rows: self.rows,
            cols: self.cols,
            indptr,
            indices,
            data,
        }
    }
}
