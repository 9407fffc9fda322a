use rd_core::CoreError;
use rd_sim::SimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario configuration error: {0}")]
    Config(String),

    #[error("cannot partition tasks: no anchors")]
    NoAnchors,

    #[error("invalid scenario data: {0}")]
    Core(#[from] CoreError),

    #[error("simulation failed: {0}")]
    Sim(#[from] SimError),
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
