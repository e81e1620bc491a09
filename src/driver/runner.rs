//! Repetition protocol and metric aggregation.
//!
//! Per size the driver moves through
//! `Pending → (Generating → Timing)×repeats → Aggregating → Done`.
//! Any error aborts the whole run; nothing is retried.

use std::collections::HashMap;
use std::hint::black_box;
use std::time::Instant;

use log::{debug, info, warn};

use crate::driver::config::{BenchConfig, ParallelConfig, validate_size, validate_workers};
use crate::driver::memory::{MemorySnapshot, heap_peak_mib, reset_heap_peak};
use crate::error::Result;
use crate::kernels::{Algorithm, KernelParams, Operands};
use crate::matrix::dense::DenseMatrix;

/// Where a size is in its benchmark cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Generating,
    Timing,
    Aggregating,
    Done,
}

impl Phase {
    pub fn can_enter(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Pending, Phase::Generating)
                | (Phase::Generating, Phase::Timing)
                | (Phase::Timing, Phase::Generating)
                | (Phase::Timing, Phase::Aggregating)
                | (Phase::Aggregating, Phase::Done)
        )
    }
}

struct PhaseTracker {
    size: usize,
    phase: Phase,
}

impl PhaseTracker {
    fn new(size: usize) -> Self {
        Self {
            size,
            phase: Phase::Pending,
        }
    }

    fn enter(&mut self, next: Phase) {
        debug_assert!(
            self.phase.can_enter(next),
            "illegal transition {:?} -> {:?}",
            self.phase,
            next
        );
        debug!("size {}: {:?} -> {:?}", self.size, self.phase, next);
        self.phase = next;
    }
}

/// One timed repetition.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub label: &'static str,
    pub size: usize,
    pub repeat: usize,
    pub seed: u64,
    pub elapsed_ms: f64,
    pub memory: MemorySnapshot,
    /// Tracked heap peak over this repetition's generation and product, MiB.
    pub heap_peak_mib: f64,
    /// Sum of the product's entries, taken after the clock stopped.
    pub checksum: f64,
}

/// Aggregate of all repetitions of one algorithm at one size.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeReport {
    pub algorithm: Algorithm,
    pub params: KernelParams,
    pub size: usize,
    pub repeats: usize,
    pub avg_time_ms: f64,
    /// Memory after the last repetition.
    pub memory: MemorySnapshot,
    /// Largest resident size seen after any repetition.
    pub peak_rss_mb: f64,
    /// Largest per-repetition heap peak.
    pub heap_peak_mib: f64,
    pub gflops: f64,
    pub samples: Vec<Sample>,
}

/// Time one multiplication. The clock covers only `multiply`; the product
/// is summed afterwards and then dropped.
fn time_multiply<F>(multiply: F) -> Result<(f64, f64)>
where
    F: FnOnce() -> Result<DenseMatrix>,
{
    let start = Instant::now();
    let c = multiply()?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    let c = black_box(c);
    Ok((elapsed_ms, checksum(&c)))
}

pub fn checksum(m: &DenseMatrix) -> f64 {
    m.as_slice().iter().sum()
}

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn repeat_seed(base: u64, repeat: usize) -> u64 {
    base.wrapping_add(repeat as u64)
}

/// Run every size in `config`, stopping at the first failure.
pub fn run_benchmark(config: &BenchConfig) -> Result<Vec<SizeReport>> {
    config.validate()?;
    info!(
        "{} benchmark: sizes {:?}, {} repeats",
        config.algorithm, config.sizes, config.repeats
    );
    config
        .sizes
        .iter()
        .map(|&n| run_size(config, n))
        .collect()
}

/// Generate, multiply and measure `config.repeats` times at size `n`.
///
/// `n` need not appear in `config.sizes`, but it and the rest of the
/// config are checked before anything is generated.
pub fn run_size(config: &BenchConfig, n: usize) -> Result<SizeReport> {
    config.validate_settings()?;
    validate_size(n)?;

    let mut tracker = PhaseTracker::new(n);
    let mut samples = Vec::with_capacity(config.repeats);
    let mut peak_rss_mb: f64 = 0.0;
    let mut heap_peak_max: f64 = 0.0;
    let mut flops = 0.0;

    for repeat in 0..config.repeats {
        tracker.enter(Phase::Generating);
        reset_heap_peak();
        let seed = repeat_seed(config.base_seed, repeat);
        let operands = Operands::generate(config.algorithm, n, &config.params, seed)?;
        flops = operands.flops();

        tracker.enter(Phase::Timing);
        let (elapsed_ms, sum) =
            time_multiply(|| operands.multiply(config.algorithm, &config.params))?;
        drop(operands);

        let memory = MemorySnapshot::read();
        let heap_peak = heap_peak_mib();
        peak_rss_mb = peak_rss_mb.max(memory.rss_mb);
        heap_peak_max = heap_peak_max.max(heap_peak);
        debug!(
            "{} n={} repeat {}: {:.3} ms, rss {:.2} MB, heap peak {:.2} MiB",
            config.algorithm, n, repeat, elapsed_ms, memory.rss_mb, heap_peak
        );
        samples.push(Sample {
            label: config.algorithm.name(),
            size: n,
            repeat,
            seed,
            elapsed_ms,
            memory,
            heap_peak_mib: heap_peak,
            checksum: sum,
        });
    }

    tracker.enter(Phase::Aggregating);
    let times: Vec<f64> = samples.iter().map(|s| s.elapsed_ms).collect();
    let avg_time_ms = mean(&times);
    let gflops = if avg_time_ms > 0.0 {
        flops / (avg_time_ms / 1000.0) / 1e9
    } else {
        0.0
    };
    let report = SizeReport {
        algorithm: config.algorithm,
        params: config.params,
        size: n,
        repeats: config.repeats,
        avg_time_ms,
        memory: samples.last().map(|s| s.memory).unwrap_or_default(),
        peak_rss_mb,
        heap_peak_mib: heap_peak_max,
        gflops,
        samples,
    };
    info!(
        "{:>10} {:>6}×{:<6} {:10.3} ms  {:6.2} GFLOPS  peak rss {:.2} MB",
        report.algorithm.name(),
        n,
        n,
        avg_time_ms,
        gflops,
        peak_rss_mb
    );
    tracker.enter(Phase::Done);
    Ok(report)
}

/// Single-worker average times per size, collected as a run progresses.
#[derive(Debug, Clone, Default)]
pub struct BaselineTable {
    by_size: HashMap<usize, f64>,
}

impl BaselineTable {
    pub fn record(&mut self, size: usize, avg_ms: f64) {
        self.by_size.insert(size, avg_ms);
    }

    pub fn get(&self, size: usize) -> Option<f64> {
        self.by_size.get(&size).copied()
    }

    /// `T(1) / T(p)` for this size.
    ///
    /// Always exactly 1.0 for one worker. Also 1.0 when no single-worker
    /// time has been recorded for the size yet, or when `elapsed_ms` is not
    /// positive.
    pub fn speedup(&self, size: usize, workers: usize, elapsed_ms: f64) -> f64 {
        if workers == 1 {
            return 1.0;
        }
        match self.get(size) {
            Some(t1) if elapsed_ms > 0.0 => t1 / elapsed_ms,
            _ => 1.0,
        }
    }
}

pub fn efficiency(speedup: f64, workers: usize) -> f64 {
    speedup / workers as f64
}

/// One timed repetition of the parallel kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelRecord {
    pub sample: Sample,
    pub workers: usize,
    pub speedup: f64,
    pub efficiency: f64,
}

/// Aggregate of all repetitions at one (size, workers) point.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelReport {
    pub size: usize,
    pub workers: usize,
    pub repeats: usize,
    pub avg_time_ms: f64,
    pub speedup: f64,
    pub efficiency: f64,
    pub memory: MemorySnapshot,
    pub peak_rss_mb: f64,
    /// Largest per-repetition heap peak.
    pub heap_peak_mib: f64,
    pub records: Vec<ParallelRecord>,
}

/// Drives the parallel kernel across sizes and worker counts, keeping the
/// single-worker baseline of each size for speedup accounting.
#[derive(Debug)]
pub struct ParallelRunner {
    config: ParallelConfig,
    baselines: BaselineTable,
}

impl ParallelRunner {
    pub fn new(config: ParallelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            baselines: BaselineTable::default(),
        })
    }

    /// Seed the baseline table, e.g. with single-worker times from an
    /// earlier invocation.
    pub fn with_baselines(mut self, baselines: BaselineTable) -> Self {
        self.baselines = baselines;
        self
    }

    pub fn baselines(&self) -> &BaselineTable {
        &self.baselines
    }

    /// Every size, each with every worker count in ascending order.
    pub fn run(&mut self) -> Result<Vec<ParallelReport>> {
        let sizes = self.config.sizes.clone();
        let schedule = self.config.worker_schedule();
        info!(
            "parallel benchmark: sizes {:?}, workers {:?}, {} repeats",
            sizes, schedule, self.config.repeats
        );

        let mut reports = Vec::with_capacity(sizes.len() * schedule.len());
        for &n in &sizes {
            for &p in &schedule {
                reports.push(self.run_point(n, p)?);
            }
        }
        Ok(reports)
    }

    /// `repeats` timed runs of the parallel kernel at size `n` with `p`
    /// workers. A p=1 run stores its average as this size's baseline.
    pub fn run_point(&mut self, n: usize, p: usize) -> Result<ParallelReport> {
        validate_size(n)?;
        validate_workers(p)?;

        let mut tracker = PhaseTracker::new(n);
        let repeats = self.config.repeats;
        let mut records = Vec::with_capacity(repeats);
        let mut peak_rss_mb: f64 = 0.0;
        let mut heap_peak_max: f64 = 0.0;

        if p > 1 && self.baselines.get(n).is_none() {
            warn!("no single-worker baseline for n={n}; speedup defaults to 1.0");
        }

        let params = KernelParams::default();
        for repeat in 0..repeats {
            tracker.enter(Phase::Generating);
            reset_heap_peak();
            let seed = repeat_seed(self.config.base_seed, repeat);
            let operands = Operands::generate(Algorithm::Basic, n, &params, seed)?;

            tracker.enter(Phase::Timing);
            let (elapsed_ms, sum) = time_multiply(|| operands.multiply_parallel(p))?;
            drop(operands);

            let memory = MemorySnapshot::read();
            let heap_peak = heap_peak_mib();
            peak_rss_mb = peak_rss_mb.max(memory.rss_mb);
            heap_peak_max = heap_peak_max.max(heap_peak);
            let speedup = self.baselines.speedup(n, p, elapsed_ms);
            debug!(
                "parallel n={} p={} repeat {}: {:.3} ms, speedup {:.3}",
                n, p, repeat, elapsed_ms, speedup
            );
            records.push(ParallelRecord {
                sample: Sample {
                    label: "parallel",
                    size: n,
                    repeat,
                    seed,
                    elapsed_ms,
                    memory,
                    heap_peak_mib: heap_peak,
                    checksum: sum,
                },
                workers: p,
                speedup,
                efficiency: efficiency(speedup, p),
            });
        }

        tracker.enter(Phase::Aggregating);
        let times: Vec<f64> = records.iter().map(|r| r.sample.elapsed_ms).collect();
        let avg_time_ms = mean(&times);
        if p == 1 {
            self.baselines.record(n, avg_time_ms);
        }
        let speedup = self.baselines.speedup(n, p, avg_time_ms);
        let report = ParallelReport {
            size: n,
            workers: p,
            repeats,
            avg_time_ms,
            speedup,
            efficiency: efficiency(speedup, p),
            memory: records.last().map(|r| r.sample.memory).unwrap_or_default(),
            peak_rss_mb,
            heap_peak_mib: heap_peak_max,
            records,
        };
        info!(
            "parallel {:>6}×{:<6} p={:<3} {:10.3} ms  speedup {:.3}  efficiency {:.3}",
            n, n, p, avg_time_ms, report.speedup, report.efficiency
        );
        tracker.enter(Phase::Done);
        Ok(report)
    }
}
