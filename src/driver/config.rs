//! Run configuration.

use crate::error::{BenchError, Result};
use crate::kernels::{Algorithm, KernelParams};
use crate::matrix::generate::BASE_SEED;

pub const DEFAULT_REPEATS: usize = 3;

/// A sequential benchmark run: one algorithm over a list of sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    pub sizes: Vec<usize>,
    pub repeats: usize,
    pub algorithm: Algorithm,
    pub params: KernelParams,
    pub base_seed: u64,
}

impl BenchConfig {
    pub fn new(sizes: Vec<usize>, algorithm: Algorithm) -> Self {
        Self {
            sizes,
            repeats: DEFAULT_REPEATS,
            algorithm,
            params: KernelParams::default(),
            base_seed: BASE_SEED,
        }
    }

    /// Reject anything that would fail mid-run.
    ///
    /// Block size is only checked for `Blocked` and density only for
    /// `Sparse`, the only kernels that read them.
    pub fn validate(&self) -> Result<()> {
        validate_sizes(&self.sizes)?;
        self.validate_settings()
    }

    /// Everything `validate` checks except the size list.
    pub(crate) fn validate_settings(&self) -> Result<()> {
        validate_repeats(self.repeats)?;
        if self.algorithm == Algorithm::Blocked && self.params.block_size == 0 {
            return Err(BenchError::invalid("block_size", "must be at least 1"));
        }
        if self.algorithm == Algorithm::Sparse {
            let d = self.params.density;
            if !(d > 0.0 && d <= 1.0) {
                return Err(BenchError::invalid(
                    "density",
                    format!("{d} is outside (0, 1]"),
                ));
            }
        }
        Ok(())
    }
}

/// A parallel benchmark run: dense i-k-j split over one or more worker
/// counts.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelConfig {
    pub sizes: Vec<usize>,
    pub repeats: usize,
    pub workers: Vec<usize>,
    pub base_seed: u64,
}

impl ParallelConfig {
    pub fn new(sizes: Vec<usize>, workers: Vec<usize>) -> Self {
        Self {
            sizes,
            repeats: DEFAULT_REPEATS,
            workers,
            base_seed: BASE_SEED,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_sizes(&self.sizes)?;
        validate_repeats(self.repeats)?;
        if self.workers.is_empty() {
            return Err(BenchError::invalid("workers", "no worker counts given"));
        }
        self.workers.iter().try_for_each(|&p| validate_workers(p))
    }

    /// Worker counts ascending and deduplicated, so a requested p=1 always
    /// runs first for each size.
    pub fn worker_schedule(&self) -> Vec<usize> {
        let mut workers = self.workers.clone();
        workers.sort_unstable();
        workers.dedup();
        workers
    }
}

fn validate_sizes(sizes: &[usize]) -> Result<()> {
    if sizes.is_empty() {
        return Err(BenchError::invalid("sizes", "no sizes given"));
    }
    sizes.iter().try_for_each(|&n| validate_size(n))
}

pub(crate) fn validate_size(n: usize) -> Result<()> {
    if n == 0 {
        return Err(BenchError::invalid("sizes", "matrix size must be at least 1"));
    }
    Ok(())
}

pub(crate) fn validate_workers(p: usize) -> Result<()> {
    if p == 0 {
        return Err(BenchError::invalid("workers", "must be at least 1"));
    }
    Ok(())
}

fn validate_repeats(repeats: usize) -> Result<()> {
    if repeats == 0 {
        return Err(BenchError::invalid("repeats", "must be at least 1"));
    }
    Ok(())
}
