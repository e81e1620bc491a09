//! Row partitioning for the parallel kernel.

use std::ops::Range;

use crate::error::{BenchError, Result};

/// A contiguous block of output rows owned by one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowChunk {
    pub worker: usize,
    pub rows: Range<usize>,
}

impl RowChunk {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Split `n` rows across `workers` workers.
///
/// The first `workers - 1` chunks get `n / workers` rows each and the last
/// chunk takes whatever remains. Chunks are returned in row order, never
/// overlap, and together cover `0..n` exactly. When `workers > n` every chunk
/// but the last is empty.
pub fn partition_rows(n: usize, workers: usize) -> Result<Vec<RowChunk>> {
    if workers == 0 {
        return Err(BenchError::invalid("workers", "must be at least 1"));
    }

    let chunk = n / workers;
    Ok((0..workers)
        .map(|t| {
            let start = t * chunk;
            let end = if t == workers - 1 { n } else { start + chunk };
            RowChunk {
                worker: t,
                rows: start..end,
            }
        })
        .collect())
}

/// Cut a row-major buffer with rows of width `n` into one mutable slice per
/// chunk. `chunks` must be in row order and cover the buffer, as produced by
/// `partition_rows`.
pub fn split_rows_mut<'a>(
    mut data: &'a mut [f64],
    n: usize,
    chunks: &[RowChunk],
) -> Vec<&'a mut [f64]> {
    let mut out = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let (head, tail) = std::mem::take(&mut data).split_at_mut(chunk.len() * n);
        out.push(head);
        data = tail;
    }
    out
}
