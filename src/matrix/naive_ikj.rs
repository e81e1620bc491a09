use crate::error::{BenchError, Result};
use crate::matrix::dense::DenseMatrix;

/// Cache-friendly matrix multiplication using i-k-j loop order.
///
/// Compared with the textbook i-j-k order, the innermost loop walks a row
/// of B and a row of C with stride 1, so both stay in cache lines that are
/// already loaded.
///
/// This is the reference kernel every other strategy is checked against,
/// and the per-chunk kernel of the parallel path.
///
/// # Arguments
///
/// * `a` - Matrix A (m × k), row-major
/// * `b` - Matrix B (k × n), row-major
/// * `c` - Matrix C (m × n), row-major, accumulated into (C += A * B)
/// * `m` - Rows of A and C
/// * `n` - Columns of B and C
/// * `k` - Columns of A, rows of B
///
/// # Panics
///
/// Panics if the slice sizes don't match m, n, k.
pub fn matmul_naive_ikj(a: &[f64], b: &[f64], c: &mut [f64], m: usize, n: usize, k: usize) {
    assert_eq!(a.len(), m * k, "A: expected {}x{}={} elements", m, k, m * k);
    assert_eq!(b.len(), k * n, "B: expected {}x{}={} elements", k, n, k * n);
    assert_eq!(c.len(), m * n, "C: expected {}x{}={} elements", m, n, m * n);

    for i in 0..m {
        let a_row = &a[i * k..(i + 1) * k];
        let c_row = &mut c[i * n..(i + 1) * n];
        for (p, &aip) in a_row.iter().enumerate() {
            let b_row = &b[p * n..(p + 1) * n];
            for (cij, &bpj) in c_row.iter_mut().zip(b_row) {
                *cij += aip * bpj;
            }
        }
    }
}

/// C = A * B with the i-k-j kernel, into a fresh matrix.
pub fn naive(a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
    let n = check_square_pair(a, b)?;
    let mut c = DenseMatrix::zeros(n);
    matmul_naive_ikj(a.as_slice(), b.as_slice(), c.as_mut_slice(), n, n, n);
    Ok(c)
}

/// Both operands must share one dimension.
pub(crate) fn check_square_pair(a: &DenseMatrix, b: &DenseMatrix) -> Result<usize> {
    if a.n() != b.n() {
        return Err(BenchError::InvalidDimension {
            left: a.n(),
            right: b.n(),
        });
    }
    Ok(a.n())
}
