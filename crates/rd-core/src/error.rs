//! Core error type.
//!
//! Every variant is a configuration error: it is raised while inputs are
//! being validated, before any simulated time passes.

use thiserror::Error;

use crate::TaskId;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("task {task} has non-positive or non-finite urgency {urgency}")]
    NonPositiveUrgency { task: TaskId, urgency: f64 },

    #[error("task {task} has invalid arrival time {arrival_time}")]
    InvalidArrival { task: TaskId, arrival_time: f64 },

    #[error("task stream not sorted: task {task} arrives at {arrival_time} after {previous}")]
    UnsortedArrivals { task: TaskId, arrival_time: f64, previous: f64 },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `rd-core`.
pub type CoreResult<T> = Result<T, CoreError>;
