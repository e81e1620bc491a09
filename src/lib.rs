//! Matrix multiplication strategies, and a harness to time them.
//!
//! Five kernels over square `f64` matrices, each returning a fresh result:
//! the i-k-j triple loop, a transpose-then-dot-product variant, cubic-tile
//! blocking, CSR-sparse times dense, and a row-parallel split of the i-k-j
//! loop across threads. Inputs come from seeded generators so that every
//! run, and every implementation, multiplies the same numbers.
//!
//! ## Usage
//!
//! ```
//! use mmbench::{blocked, generate_dense, naive};
//!
//! let a = generate_dense(64, 403086);
//! let b = generate_dense(64, 403087);
//!
//! let c = naive(&a, &b).unwrap();
//! let d = blocked(&a, &b, 16).unwrap();
//! assert!(c.max_relative_diff(&d).unwrap() < 1e-9);
//! ```
//!
//! Splitting the rows of A over four threads:
//!
//! ```
//! use mmbench::{generate_dense, parallel_mul};
//!
//! let a = generate_dense(128, 1);
//! let b = generate_dense(128, 2);
//! let c = parallel_mul(&a, &b, 4).unwrap();
//! assert_eq!(c.n(), 128);
//! ```
//!
//! ## What's inside
//!
//! - `matrix`: dense and CSR storage, seeded generators, i-k-j, transposed
//!   and sparse kernels
//! - `blocked`: tiled kernel with a tunable block edge
//! - `threaded`: row partitioning and the scoped-thread kernel
//! - `kernels`: algorithm selector and input generation per algorithm
//! - `driver`: repetition protocol, speedup accounting, memory telemetry, CSV

pub mod blocked;
pub mod driver;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod threaded;

pub use blocked::tiled::blocked;
pub use driver::memory::TrackingAllocator;
pub use error::{BenchError, Result};
pub use kernels::{Algorithm, KernelParams, Operands};
pub use matrix::naive_ikj::naive;
pub use matrix::spmm::spmm_csr_dense;
pub use matrix::transposed::transposed;
pub use matrix::{BASE_SEED, DenseMatrix, SparseCsr, generate_dense, generate_sparse_csr};
pub use threaded::parallel::parallel_mul;
