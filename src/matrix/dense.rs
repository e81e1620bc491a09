//! Square dense matrix with row-major storage.

use crate::error::{BenchError, Result};

/// An n×n matrix of `f64`, stored row-major in one contiguous buffer.
///
/// Row `i` occupies `data[i * n..(i + 1) * n]`, so the flat slice can be
/// handed straight to the slice-level kernels.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// All-zero n×n matrix.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// Build from nested rows. Every row must have as many entries as there
    /// are rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(BenchError::InvalidDimension {
                    left: n,
                    right: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { n, data })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Largest element-wise relative difference against `other`.
    ///
    /// Each term is `|a - b| / max(|a|, |b|, 1)`, so entries near zero are
    /// compared absolutely. Shapes must match.
    pub fn max_relative_diff(&self, other: &DenseMatrix) -> Result<f64> {
        if self.n != other.n {
            return Err(BenchError::InvalidDimension {
                left: self.n,
                right: other.n,
            });
        }
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| (a - b).abs() / a.abs().max(b.abs()).max(1.0))
            .fold(0.0, f64::max))
    }
}
