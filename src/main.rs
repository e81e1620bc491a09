//! Benchmark runner for the matmul strategies.
//!
//! ```text
//! mmbench baseline 64 128 256 -r 5
//! mmbench opt 256 512 --algo blocked --block 32
//! mmbench opt 512 --algo sparse --density 0.01
//! mmbench parallel 256 512 -p 1 2 4 8 --per-repeat
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use mmbench::blocked::DEFAULT_BLOCK_SIZE;
use mmbench::driver::report::{
    baseline_filename, opt_filename, parallel_filename, parallel_records_filename, timestamp,
    write_baseline_csv, write_opt_csv, write_parallel_csv, write_parallel_records_csv,
};
use mmbench::driver::{BenchConfig, ParallelConfig, ParallelRunner, run_benchmark};
use mmbench::{Algorithm, BASE_SEED, KernelParams, TrackingAllocator};

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

#[derive(Parser, Debug)]
#[command(name = "mmbench", version, about = "Matrix multiplication benchmarks")]
struct Cli {
    /// Base seed; repetition r uses seed+r for A and seed+r+1 for B
    #[arg(long, global = true, env = "MMBENCH_SEED", default_value_t = BASE_SEED)]
    seed: u64,

    /// Directory the CSV file is written to
    #[arg(long, global = true, env = "MMBENCH_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Naive i-k-j kernel only
    Baseline {
        /// Square sizes, e.g. 64 128 256
        #[arg(required = true)]
        sizes: Vec<usize>,
        #[arg(short, long, default_value_t = 3)]
        repeats: usize,
    },
    /// One selectable sequential kernel
    Opt {
        #[arg(required = true)]
        sizes: Vec<usize>,
        /// basic | blocked | transposed | sparse
        #[arg(long, default_value = "blocked")]
        algo: Algorithm,
        /// Tile edge for `blocked`
        #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
        block: usize,
        /// Nonzero density for `sparse`, in (0, 1]
        #[arg(long, default_value_t = 0.05)]
        density: f64,
        #[arg(short, long, default_value_t = 3)]
        repeats: usize,
    },
    /// Row-parallel dense kernel over one or more worker counts
    Parallel {
        #[arg(required = true)]
        sizes: Vec<usize>,
        /// Worker counts; include 1 to get speedup against a measured baseline
        #[arg(short = 'p', long = "threads", num_args = 1.., default_value = "1")]
        threads: Vec<usize>,
        #[arg(short, long, default_value_t = 3)]
        repeats: usize,
        /// Also write one row per timed repetition to a `_repeats.csv` file
        #[arg(long)]
        per_repeat: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;
    let ts = timestamp();

    let path = match cli.command {
        Command::Baseline { sizes, repeats } => {
            let config = BenchConfig {
                repeats,
                base_seed: cli.seed,
                ..BenchConfig::new(sizes, Algorithm::Basic)
            };
            let reports = run_benchmark(&config).context("baseline benchmark failed")?;
            let path = baseline_filename(&cli.out_dir, ts);
            save(&path, |out| write_baseline_csv(out, &reports))?;
            path
        }
        Command::Opt {
            sizes,
            algo,
            block,
            density,
            repeats,
        } => {
            let config = BenchConfig {
                repeats,
                params: KernelParams {
                    block_size: block,
                    density,
                },
                base_seed: cli.seed,
                ..BenchConfig::new(sizes, algo)
            };
            let reports = run_benchmark(&config)
                .with_context(|| format!("{algo} benchmark failed"))?;
            let path = opt_filename(&cli.out_dir, algo.name(), ts);
            save(&path, |out| write_opt_csv(out, &reports))?;
            path
        }
        Command::Parallel {
            sizes,
            threads,
            repeats,
            per_repeat,
        } => {
            let config = ParallelConfig {
                repeats,
                base_seed: cli.seed,
                ..ParallelConfig::new(sizes, threads)
            };
            let schedule = config.worker_schedule();
            let mut runner = ParallelRunner::new(config)?;
            let reports = runner.run().context("parallel benchmark failed")?;
            if per_repeat {
                let path = parallel_records_filename(&cli.out_dir, &schedule, ts);
                save(&path, |out| write_parallel_records_csv(out, &reports))?;
                info!("Per-repetition results saved to {}", path.display());
            }
            let path = parallel_filename(&cli.out_dir, &schedule, ts);
            save(&path, |out| write_parallel_csv(out, &reports))?;
            path
        }
    };

    info!("Results saved to {}", path.display());
    Ok(())
}

fn save<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> mmbench::Result<()>,
{
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write(&mut out).with_context(|| format!("writing {}", path.display()))?;
    out.flush()?;
    Ok(())
}
