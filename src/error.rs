use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("dimension mismatch: [{left}x{left}] @ [{right}x{right}]")]
    InvalidDimension { left: usize, right: usize },
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("worker {worker} failed while computing rows {start}..{end}")]
    WorkerFailure {
        worker: usize,
        start: usize,
        end: usize,
    },
    #[error("malformed CSR matrix: {0}")]
    MalformedSparse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BenchError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        BenchError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
