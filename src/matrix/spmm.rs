use crate::error::{BenchError, Result};
use crate::matrix::dense::DenseMatrix;
use crate::matrix::sparse::SparseCsr;

/// C = A_sparse * B_dense, with A in CSR form and C dense.
///
/// Row i of C is the sum of `val * B[col]` over the stored entries of row i
/// of A, so the work is `nnz(A) * n` multiply-adds rather than n^3. Rows of A
/// with no entries leave their row of C at zero.
pub fn spmm_csr_dense(a: &SparseCsr, b: &DenseMatrix) -> Result<DenseMatrix> {
    if a.n() != b.n() {
        return Err(BenchError::InvalidDimension {
            left: a.n(),
            right: b.n(),
        });
    }

    let n = b.n();
    let bs = b.as_slice();
    let mut c = DenseMatrix::zeros(n);
    let cs = c.as_mut_slice();

    for i in 0..a.n() {
        let (cols, vals) = a.row(i);
        let c_row = &mut cs[i * n..(i + 1) * n];
        for (&p, &aip) in cols.iter().zip(vals) {
            let b_row = &bs[p * n..(p + 1) * n];
            for (cij, &bpj) in c_row.iter_mut().zip(b_row) {
                *cij += aip * bpj;
            }
        }
    }
    Ok(c)
}
