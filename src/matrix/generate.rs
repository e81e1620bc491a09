//! Seeded matrix generation.
//!
//! Every generator takes its seed explicitly; there is no process-wide RNG.
//! Values come from `StdRng::seed_from_u64(seed)` sampling the `Standard`
//! `f64` distribution, which is uniform on [0, 1). The same `(n, seed)`
//! always produces a bit-identical matrix.

use rand::distributions::Standard;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use crate::error::{BenchError, Result};
use crate::matrix::dense::DenseMatrix;
use crate::matrix::sparse::SparseCsr;

/// Seed used by the benchmark modes unless overridden.
pub const BASE_SEED: u64 = 403086;

/// n×n matrix of uniform [0, 1) values, filled row by row.
pub fn generate_dense(n: usize, seed: u64) -> DenseMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut m = DenseMatrix::zeros(n);
    for x in m.as_mut_slice() {
        *x = rng.sample(Standard);
    }
    m
}

/// Number of nonzeros row `i` receives when `target` entries are spread over
/// `n` rows: `target / n` each, plus one for the first `target % n` rows.
/// Never more than `n`.
pub fn row_quota(n: usize, target: usize, i: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let base = target / n;
    let leftover = target - base * n;
    let k = base + usize::from(i < leftover);
    k.min(n)
}

/// Random n×n CSR matrix holding `floor(n * n * density)` nonzeros.
///
/// For each row, `row_quota` distinct columns are drawn without replacement
/// and sorted ascending, then one uniform [0, 1) value is drawn per column.
pub fn generate_sparse_csr(n: usize, density: f64, seed: u64) -> Result<SparseCsr> {
    if !(density > 0.0 && density <= 1.0) {
        return Err(BenchError::invalid(
            "density",
            format!("{density} is outside (0, 1]"),
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let target = ((n * n) as f64 * density) as usize;

    let mut row_ptr = Vec::with_capacity(n + 1);
    let mut col_idx = Vec::with_capacity(target);
    let mut vals = Vec::with_capacity(target);
    row_ptr.push(0);

    for i in 0..n {
        let k = row_quota(n, target, i);
        let mut cols = index::sample(&mut rng, n, k).into_vec();
        cols.sort_unstable();
        for j in cols {
            col_idx.push(j);
            vals.push(rng.sample(Standard));
        }
        row_ptr.push(col_idx.len());
    }

    SparseCsr::from_parts(n, row_ptr, col_idx, vals)
}
