//! Cache-blocked GEMM.
//!
//! Breaks the multiplication into cubic tiles so that the slices of A, B
//! and C a tile touches stay resident in cache while they are reused.
//!
//! Available implementations:
//! - `tiled`: i/k/j tiling with a tunable edge length (default 64)

pub mod tiled;

pub use tiled::{DEFAULT_BLOCK_SIZE, blocked};
