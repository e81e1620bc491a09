//! CSV output for the plotting scripts.
//!
//! One row per size (or per size and worker count), plus an optional
//! per-repetition file for parallel runs. Every file starts with `lang`,
//! then `algo` where the mode has one, then `size`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::driver::runner::{ParallelReport, SizeReport};
use crate::error::Result;

pub const LANG: &str = "rust";

pub const BASELINE_HEADER: [&str; 8] = [
    "lang",
    "size",
    "repeats",
    "avg_time_ms",
    "rss_mb",
    "vms_mb",
    "peak_rss_mb",
    "heap_peak_mib",
];

pub const OPT_HEADER: [&str; 11] = [
    "lang",
    "algo",
    "size",
    "repeats",
    "avg_time_ms",
    "rss_mb",
    "vms_mb",
    "peak_rss_mb",
    "heap_peak_mib",
    "block",
    "density",
];

pub const PARALLEL_HEADER: [&str; 10] = [
    "lang",
    "size",
    "threads",
    "repeats",
    "avg_time_ms",
    "speedup",
    "efficiency",
    "rss_mb",
    "peak_rss_mb",
    "heap_peak_mib",
];

pub const PARALLEL_RECORD_HEADER: [&str; 9] = [
    "lang",
    "size",
    "threads",
    "repeat",
    "time_ms",
    "speedup",
    "efficiency",
    "rss_mb",
    "heap_peak_mib",
];

fn write_row<W: Write>(out: &mut W, fields: &[String]) -> Result<()> {
    writeln!(out, "{}", fields.join(","))?;
    Ok(())
}

fn header(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

/// Naive-kernel results, one row per size.
pub fn write_baseline_csv<W: Write>(out: &mut W, reports: &[SizeReport]) -> Result<()> {
    write_row(out, &header(&BASELINE_HEADER))?;
    for r in reports {
        write_row(
            out,
            &[
                LANG.to_string(),
                r.size.to_string(),
                r.repeats.to_string(),
                format!("{:.3}", r.avg_time_ms),
                format!("{:.2}", r.memory.rss_mb),
                format!("{:.2}", r.memory.vms_mb),
                format!("{:.2}", r.peak_rss_mb),
                format!("{:.2}", r.heap_peak_mib),
            ],
        )?;
    }
    Ok(())
}

/// Results for a selectable algorithm, one row per size.
pub fn write_opt_csv<W: Write>(out: &mut W, reports: &[SizeReport]) -> Result<()> {
    write_row(out, &header(&OPT_HEADER))?;
    for r in reports {
        write_row(
            out,
            &[
                LANG.to_string(),
                r.algorithm.name().to_string(),
                r.size.to_string(),
                r.repeats.to_string(),
                format!("{:.3}", r.avg_time_ms),
                format!("{:.2}", r.memory.rss_mb),
                format!("{:.2}", r.memory.vms_mb),
                format!("{:.2}", r.peak_rss_mb),
                format!("{:.2}", r.heap_peak_mib),
                r.params.block_size.to_string(),
                r.params.density.to_string(),
            ],
        )?;
    }
    Ok(())
}

/// Parallel results, one row per (size, worker count).
pub fn write_parallel_csv<W: Write>(out: &mut W, reports: &[ParallelReport]) -> Result<()> {
    write_row(out, &header(&PARALLEL_HEADER))?;
    for r in reports {
        write_row(
            out,
            &[
                LANG.to_string(),
                r.size.to_string(),
                r.workers.to_string(),
                r.repeats.to_string(),
                format!("{:.3}", r.avg_time_ms),
                format!("{:.3}", r.speedup),
                format!("{:.3}", r.efficiency),
                format!("{:.2}", r.memory.rss_mb),
                format!("{:.2}", r.peak_rss_mb),
                format!("{:.2}", r.heap_peak_mib),
            ],
        )?;
    }
    Ok(())
}

/// Parallel results, one row per timed repetition.
pub fn write_parallel_records_csv<W: Write>(
    out: &mut W,
    reports: &[ParallelReport],
) -> Result<()> {
    write_row(out, &header(&PARALLEL_RECORD_HEADER))?;
    for rec in reports.iter().flat_map(|r| &r.records) {
        write_row(
            out,
            &[
                LANG.to_string(),
                rec.sample.size.to_string(),
                rec.workers.to_string(),
                rec.sample.repeat.to_string(),
                format!("{:.3}", rec.sample.elapsed_ms),
                format!("{:.3}", rec.speedup),
                format!("{:.3}", rec.efficiency),
                format!("{:.2}", rec.sample.memory.rss_mb),
                format!("{:.2}", rec.sample.heap_peak_mib),
            ],
        )?;
    }
    Ok(())
}

/// Seconds since the Unix epoch, used to keep result filenames unique.
pub fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn baseline_filename(dir: &Path, ts: u64) -> PathBuf {
    dir.join(format!("results_{LANG}_{ts}.csv"))
}

pub fn opt_filename(dir: &Path, algo: &str, ts: u64) -> PathBuf {
    dir.join(format!("results_{LANG}_opt_{algo}_{ts}.csv"))
}

fn workers_tag(workers: &[usize]) -> String {
    workers
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// Ends in `threads.csv` so it matches `results_*parallel_*threads.csv`.
pub fn parallel_filename(dir: &Path, workers: &[usize], ts: u64) -> PathBuf {
    let tag = workers_tag(workers);
    dir.join(format!("results_{LANG}_parallel_{ts}_{tag}threads.csv"))
}

/// Per-repetition companion of `parallel_filename`. Kept out of the
/// aggregate glob so plotting never mixes the two layouts.
pub fn parallel_records_filename(dir: &Path, workers: &[usize], ts: u64) -> PathBuf {
    let tag = workers_tag(workers);
    dir.join(format!("results_{LANG}_parallel_{ts}_{tag}threads_repeats.csv"))
}
