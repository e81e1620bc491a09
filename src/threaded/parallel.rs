//! Row-parallel dense multiplication.

use std::thread;

use log::{trace, warn};

use crate::error::{BenchError, Result};
use crate::matrix::dense::DenseMatrix;
use crate::matrix::naive_ikj::{check_square_pair, matmul_naive_ikj};
use crate::threaded::partition::{RowChunk, partition_rows, split_rows_mut};

/// C = A * B with `workers` threads.
///
/// A's rows are split by `partition_rows`; each worker runs the i-k-j
/// kernel on its rows of A against all of B and writes straight into its
/// own disjoint row range of C, so no locking or merge copy is needed.
/// All workers are joined before returning. If any of them panics the
/// whole multiplication fails with `WorkerFailure` for the first failing
/// chunk; nothing partial is returned.
///
/// Workers with an empty chunk (when `workers > n`) return immediately.
pub fn parallel_mul(a: &DenseMatrix, b: &DenseMatrix, workers: usize) -> Result<DenseMatrix> {
    parallel_mul_with(a, b, workers, |_, a_rows, b_all, out, n| {
        compute_chunk(a_rows, b_all, out, n)
    })
}

/// Fan `kernel` out over the row chunks of A and collect C.
fn parallel_mul_with<F>(
    a: &DenseMatrix,
    b: &DenseMatrix,
    workers: usize,
    kernel: F,
) -> Result<DenseMatrix>
where
    F: Fn(&RowChunk, &[f64], &[f64], &mut [f64], usize) + Sync,
{
    let n = check_square_pair(a, b)?;
    let chunks = partition_rows(n, workers)?;
    let mut c = DenseMatrix::zeros(n);

    let (a_all, b_all) = (a.as_slice(), b.as_slice());
    let outputs = split_rows_mut(c.as_mut_slice(), n, &chunks);
    let kernel = &kernel;

    let failed = thread::scope(|s| {
        let handles: Vec<_> = chunks
            .iter()
            .zip(outputs)
            .map(|(chunk, out)| {
                let a_rows = &a_all[chunk.rows.start * n..chunk.rows.end * n];
                let handle = s.spawn(move || kernel(chunk, a_rows, b_all, out, n));
                (chunk, handle)
            })
            .collect();

        // Join everything before reporting so no panicked worker is left
        // for the scope to re-raise.
        let mut failed: Option<&RowChunk> = None;
        for (chunk, handle) in handles {
            if handle.join().is_err() && failed.is_none() {
                failed = Some(chunk);
            }
        }
        failed.cloned()
    });

    if let Some(chunk) = failed {
        warn!(
            "worker {} panicked on rows {}..{}",
            chunk.worker, chunk.rows.start, chunk.rows.end
        );
        return Err(BenchError::WorkerFailure {
            worker: chunk.worker,
            start: chunk.rows.start,
            end: chunk.rows.end,
        });
    }
    Ok(c)
}

/// One worker's share: `a_rows` is m×n, `out` is the matching m×n block of C.
fn compute_chunk(a_rows: &[f64], b: &[f64], out: &mut [f64], n: usize) {
    if out.is_empty() {
        return;
    }
    let m = out.len() / n;
    trace!("worker computing {} rows", m);
    matmul_naive_ikj(a_rows, b, out, m, n, n);
}
