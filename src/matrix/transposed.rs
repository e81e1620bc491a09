use crate::error::Result;
use crate::matrix::dense::DenseMatrix;
use crate::matrix::naive_ikj::check_square_pair;
use crate::matrix::transpose::transpose;

/// Dot-product multiplication against a pre-transposed B.
///
/// `bt` holds B^T, so column j of B is the contiguous row j of `bt`. Each
/// output element is then a dot product of two sequential rows, and C is
/// written (not accumulated into) exactly once per element.
///
/// # Arguments
///
/// * `a` - Matrix A (m × k), row-major
/// * `bt` - Transposed matrix B^T (n × k), row-major
/// * `c` - Matrix C (m × n), row-major, overwritten
///
/// # Panics
///
/// Panics if the slice sizes don't match m, n, k.
pub fn matmul_transposed_dot(a: &[f64], bt: &[f64], c: &mut [f64], m: usize, n: usize, k: usize) {
    assert_eq!(a.len(), m * k, "A: expected {}x{}={} elements", m, k, m * k);
    assert_eq!(bt.len(), n * k, "B^T: expected {}x{}={} elements", n, k, n * k);
    assert_eq!(c.len(), m * n, "C: expected {}x{}={} elements", m, n, m * n);

    for i in 0..m {
        let a_row = &a[i * k..(i + 1) * k];
        for j in 0..n {
            let bt_row = &bt[j * k..(j + 1) * k];
            let mut s = 0.0;
            for (&x, &y) in a_row.iter().zip(bt_row) {
                s += x * y;
            }
            c[i * n + j] = s;
        }
    }
}

/// C = A * B by transposing B once, then taking row·row dot products.
///
/// Costs an extra n×n buffer and one transpose pass.
pub fn transposed(a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
    let n = check_square_pair(a, b)?;
    let mut bt = vec![0.0; n * n];
    transpose(b.as_slice(), &mut bt, n, n);

    let mut c = DenseMatrix::zeros(n);
    matmul_transposed_dot(a.as_slice(), &bt, c.as_mut_slice(), n, n, n);
    Ok(c)
}
