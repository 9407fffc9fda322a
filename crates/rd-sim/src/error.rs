use rd_core::{CoreError, RobotId};
use rd_dispatch::DispatchError;
use rd_route::RouteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match robot count {expected}")]
    RobotCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("invalid input: {0}")]
    Core(#[from] CoreError),

    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// The routing oracle broke its contract.  Never retried.
    #[error("routing failed for {robot}: {source}")]
    Route {
        robot:  RobotId,
        #[source]
        source: RouteError,
    },

    #[error("{robot} has {remaining} undispatched tasks but nothing left to admit")]
    Stalled { robot: RobotId, remaining: usize },
}

pub type SimResult<T> = Result<T, SimError>;
