//! Compressed Sparse Row storage.

use crate::error::{BenchError, Result};
use crate::matrix::dense::DenseMatrix;

/// An n×n sparse matrix in CSR form.
///
/// - `row_ptr` has `n + 1` entries, starts at 0 and never decreases
/// - `col_idx[row_ptr[i]..row_ptr[i + 1]]` are row `i`'s columns, strictly ascending
/// - `vals` runs parallel to `col_idx`
#[derive(Debug, Clone, PartialEq)]
pub struct SparseCsr {
    n: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    vals: Vec<f64>,
}

impl SparseCsr {
    /// Assemble from raw parts, checking every CSR invariant.
    pub fn from_parts(
        n: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        vals: Vec<f64>,
    ) -> Result<Self> {
        let csr = Self {
            n,
            row_ptr,
            col_idx,
            vals,
        };
        csr.validate()?;
        Ok(csr)
    }

    /// n×n matrix with no stored entries.
    pub fn empty(n: usize) -> Self {
        Self {
            n,
            row_ptr: vec![0; n + 1],
            col_idx: Vec::new(),
            vals: Vec::new(),
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn nnz(&self) -> usize {
        self.col_idx.len()
    }

    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    pub fn vals(&self) -> &[f64] {
        &self.vals
    }

    /// Column indices and values stored for row `i`.
    pub fn row(&self, i: usize) -> (&[usize], &[f64]) {
        let span = self.row_ptr[i]..self.row_ptr[i + 1];
        (&self.col_idx[span.clone()], &self.vals[span])
    }

    pub fn validate(&self) -> Result<()> {
        if self.row_ptr.len() != self.n + 1 {
            return Err(BenchError::MalformedSparse(format!(
                "row_ptr has {} entries, expected {}",
                self.row_ptr.len(),
                self.n + 1
            )));
        }
        if self.row_ptr[0] != 0 {
            return Err(BenchError::MalformedSparse(format!(
                "row_ptr[0] = {}, expected 0",
                self.row_ptr[0]
            )));
        }
        if self.col_idx.len() != self.vals.len() {
            return Err(BenchError::MalformedSparse(format!(
                "{} column indices but {} values",
                self.col_idx.len(),
                self.vals.len()
            )));
        }
        if self.row_ptr[self.n] != self.col_idx.len() {
            return Err(BenchError::MalformedSparse(format!(
                "row_ptr[n] = {}, but {} entries are stored",
                self.row_ptr[self.n],
                self.col_idx.len()
            )));
        }
        for i in 0..self.n {
            let (start, end) = (self.row_ptr[i], self.row_ptr[i + 1]);
            if start > end {
                return Err(BenchError::MalformedSparse(format!(
                    "row_ptr decreases at row {i}"
                )));
            }
            let cols = &self.col_idx[start..end];
            if let Some(&c) = cols.iter().find(|&&c| c >= self.n) {
                return Err(BenchError::MalformedSparse(format!(
                    "row {i}: column {c} out of range for n = {}",
                    self.n
                )));
            }
            if cols.windows(2).any(|w| w[0] >= w[1]) {
                return Err(BenchError::MalformedSparse(format!(
                    "row {i}: columns not strictly ascending"
                )));
            }
        }
        Ok(())
    }

    /// Expand into a dense matrix.
    pub fn to_dense(&self) -> DenseMatrix {
        let n = self.n;
        let mut out = DenseMatrix::zeros(n);
        let data = out.as_mut_slice();
        for i in 0..n {
            let (cols, vals) = self.row(i);
            for (&j, &v) in cols.iter().zip(vals) {
                data[i * n + j] = v;
            }
        }
        out
    }
}
