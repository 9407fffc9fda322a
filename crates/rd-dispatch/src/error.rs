use rd_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("batch selection requested on an empty queue")]
    EmptyQueue,

    #[error("task stream parse error: {0}")]
    Parse(String),

    #[error("invalid task stream: {0}")]
    Stream(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
