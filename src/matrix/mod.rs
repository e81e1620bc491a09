//! Matrix storage, deterministic input generation, and the sequential
//! kernels.
//!
//! Dense matrices are square and row-major; sparse matrices use CSR.
//! The i-k-j kernel in `naive_ikj` is the correctness baseline the
//! transposed, blocked and parallel kernels are compared against.

pub mod dense;
pub mod generate;
pub mod naive_ikj;
pub mod sparse;
pub mod spmm;
pub mod transpose;
pub mod transposed;

pub use dense::DenseMatrix;
pub use generate::{BASE_SEED, generate_dense, generate_sparse_csr};
pub use sparse::SparseCsr;
