//! Routing error type.

use thiserror::Error;

/// Errors produced by `rd-route`.
///
/// `OriginMismatch` and `NotPermutation` mean an oracle broke its contract.
/// They are fatal: the engine aborts the run rather than repairing the tour.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("routing oracle called with no points")]
    Empty,

    #[error("origin index {origin} out of range for {points} points")]
    OriginOutOfRange { origin: usize, points: usize },

    #[error("oracle tour starts at {found:?}, expected origin {expected}")]
    OriginMismatch { expected: usize, found: Option<usize> },

    #[error("oracle tour is not a permutation of {expected} points")]
    NotPermutation { expected: usize },

    #[error("{points} points exceed the exact solver limit of {max}")]
    TooLarge { points: usize, max: usize },
}

pub type RouteResult<T> = Result<T, RouteError>;
