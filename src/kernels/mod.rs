//! Kernel selection.
//!
//! Maps the algorithm selector used by the benchmark modes onto the
//! kernels in `matrix`, `blocked` and `threaded`, and generates the inputs
//! each one needs.

use std::fmt;
use std::str::FromStr;

use crate::blocked::tiled::blocked;
use crate::error::{BenchError, Result};
use crate::matrix::dense::DenseMatrix;
use crate::matrix::generate::{generate_dense, generate_sparse_csr};
use crate::matrix::naive_ikj::naive;
use crate::matrix::sparse::SparseCsr;
use crate::matrix::spmm::spmm_csr_dense;
use crate::matrix::transposed::transposed;
use crate::threaded::parallel::parallel_mul;

/// Sequential multiplication strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// i-k-j triple loop.
    Basic,
    /// Transpose B, then row·row dot products.
    Transposed,
    /// Cubic tiles of a tunable edge.
    Blocked,
    /// CSR A times dense B.
    Sparse,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Basic,
        Algorithm::Transposed,
        Algorithm::Blocked,
        Algorithm::Sparse,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Basic => "basic",
            Algorithm::Transposed => "transposed",
            Algorithm::Blocked => "blocked",
            Algorithm::Sparse => "sparse",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| {
                BenchError::invalid(
                    "algorithm",
                    format!("unknown `{s}`, expected basic|blocked|transposed|sparse"),
                )
            })
    }
}

/// Kernel-specific tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelParams {
    pub block_size: usize,
    pub density: f64,
}

impl Default for KernelParams {
    fn default() -> Self {
        Self {
            block_size: crate::blocked::DEFAULT_BLOCK_SIZE,
            density: 0.05,
        }
    }
}

/// Inputs for one multiplication.
#[derive(Debug, Clone)]
pub enum Operands {
    Dense { a: DenseMatrix, b: DenseMatrix },
    Sparse { a: SparseCsr, b: DenseMatrix },
}

impl Operands {
    /// Generate the inputs `algorithm` needs for size `n`.
    ///
    /// A is drawn from `seed` and B from `seed + 1` so the two never
    /// coincide. For `Sparse`, A is a CSR matrix at `params.density`.
    pub fn generate(
        algorithm: Algorithm,
        n: usize,
        params: &KernelParams,
        seed: u64,
    ) -> Result<Self> {
        let b_seed = seed.wrapping_add(1);
        Ok(match algorithm {
            Algorithm::Sparse => Operands::Sparse {
                a: generate_sparse_csr(n, params.density, seed)?,
                b: generate_dense(n, b_seed),
            },
            _ => Operands::Dense {
                a: generate_dense(n, seed),
                b: generate_dense(n, b_seed),
            },
        })
    }

    /// Run the sequential kernel for `algorithm`.
    pub fn multiply(&self, algorithm: Algorithm, params: &KernelParams) -> Result<DenseMatrix> {
        match (algorithm, self) {
            (Algorithm::Basic, Operands::Dense { a, b }) => naive(a, b),
            (Algorithm::Transposed, Operands::Dense { a, b }) => transposed(a, b),
            (Algorithm::Blocked, Operands::Dense { a, b }) => blocked(a, b, params.block_size),
            (Algorithm::Sparse, Operands::Sparse { a, b }) => spmm_csr_dense(a, b),
            (algorithm, _) => Err(BenchError::invalid(
                "algorithm",
                format!("`{algorithm}` cannot run on these operands"),
            )),
        }
    }

    /// Run the row-parallel kernel with `workers` threads. Dense only.
    pub fn multiply_parallel(&self, workers: usize) -> Result<DenseMatrix> {
        match self {
            Operands::Dense { a, b } => parallel_mul(a, b, workers),
            Operands::Sparse { .. } => Err(BenchError::invalid(
                "algorithm",
                "parallel mode needs dense operands",
            )),
        }
    }

    /// Floating-point operations one product performs.
    pub fn flops(&self) -> f64 {
        match self {
            Operands::Dense { a, .. } => flops(a.n()),
            Operands::Sparse { a, b } => 2.0 * a.nnz() as f64 * b.n() as f64,
        }
    }
}

/// Multiply-add count of one n×n product, times two.
pub fn flops(n: usize) -> f64 {
    2.0 * (n as f64).powi(3)
}
