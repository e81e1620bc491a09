//! Cubic-tile blocked GEMM.

use crate::error::{BenchError, Result};
use crate::matrix::dense::DenseMatrix;
use crate::matrix::naive_ikj::check_square_pair;

/// Default tile edge.
pub const DEFAULT_BLOCK_SIZE: usize = 64;

/// Cache-blocked matrix multiplication over `bs`-wide cubic tiles.
///
/// The i, k and j ranges are each cut into tiles of edge `bs`; every tile
/// triple runs the i-k-j update restricted to its bounds. Tiles at the
/// right and bottom edges are clamped when `n` is not a multiple of `bs`,
/// so any `bs >= 1` is valid, including `bs > n`.
///
/// Results match the i-k-j kernel up to floating-point summation order.
///
/// # Arguments
///
/// * `a`, `b` - Square n×n inputs, row-major
/// * `c` - n×n output, row-major, accumulated into (C += A * B)
/// * `bs` - Tile edge length
///
/// # Panics
///
/// Panics if `bs == 0` or the slice sizes don't match `n`.
pub fn matmul_blocked_tiled(a: &[f64], b: &[f64], c: &mut [f64], n: usize, bs: usize) {
    assert!(bs > 0, "block size must be positive");
    assert_eq!(a.len(), n * n, "A: expected {}x{}={} elements", n, n, n * n);
    assert_eq!(b.len(), n * n, "B: expected {}x{}={} elements", n, n, n * n);
    assert_eq!(c.len(), n * n, "C: expected {}x{}={} elements", n, n, n * n);

    for ii in (0..n).step_by(bs) {
        let i_max = (ii + bs).min(n);
        for kk in (0..n).step_by(bs) {
            let k_max = (kk + bs).min(n);
            for jj in (0..n).step_by(bs) {
                let j_max = (jj + bs).min(n);

                for i in ii..i_max {
                    let c_tile = &mut c[i * n + jj..i * n + j_max];
                    for p in kk..k_max {
                        let aip = a[i * n + p];
                        let b_tile = &b[p * n + jj..p * n + j_max];
                        for (cij, &bpj) in c_tile.iter_mut().zip(b_tile) {
                            *cij += aip * bpj;
                        }
                    }
                }
            }
        }
    }
}

/// C = A * B through `bs`-wide tiles, into a fresh matrix.
///
/// Fails with `InvalidParameter` when `bs == 0`.
pub fn blocked(a: &DenseMatrix, b: &DenseMatrix, bs: usize) -> Result<DenseMatrix> {
    if bs == 0 {
        return Err(BenchError::invalid("block_size", "must be at least 1"));
    }
    let n = check_square_pair(a, b)?;
    let mut c = DenseMatrix::zeros(n);
    matmul_blocked_tiled(a.as_slice(), b.as_slice(), c.as_mut_slice(), n, bs);
    Ok(c)
}
