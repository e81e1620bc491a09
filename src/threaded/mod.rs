//! Multi-threaded dense GEMM.
//!
//! Rows of A are split into contiguous chunks, one per worker thread. Each
//! worker runs the scalar i-k-j kernel on its chunk and writes into a
//! disjoint row range of C.
//!
//! - `partition`: row chunking and disjoint output slicing
//! - `parallel`: scoped-thread fan-out and join

pub mod parallel;
pub mod partition;

pub use parallel::parallel_mul;
pub use partition::{RowChunk, partition_rows};
