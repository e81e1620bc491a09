//! Benchmark driver: configuration, the repetition protocol, memory
//! telemetry and CSV output.

pub mod config;
pub mod memory;
pub mod report;
pub mod runner;

pub use config::{BenchConfig, ParallelConfig};
pub use memory::{MemorySnapshot, TrackingAllocator};
pub use runner::{
    BaselineTable, ParallelRecord, ParallelReport, ParallelRunner, Phase, Sample, SizeReport,
    run_benchmark, run_size,
};
