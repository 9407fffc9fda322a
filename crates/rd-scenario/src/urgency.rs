//! Urgency distributions for generated tasks.

use rd_core::SimRng;

use crate::{ScenarioError, ScenarioResult};

/// How a generated task's urgency is drawn.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UrgencyModel {
    /// `high` or `low` with equal probability.
    TwoLevel { low: f64, high: f64 },
    /// Uniform on `[low, high)`.
    Uniform { low: f64, high: f64 },
    /// Every task gets the same urgency.
    Constant { value: f64 },
}

impl Default for UrgencyModel {
    fn default() -> Self {
        UrgencyModel::TwoLevel { low: 0.5, high: 10.0 }
    }
}

impl UrgencyModel {
    pub fn sample(&self, rng: &mut SimRng) -> f64 {
        match *self {
            UrgencyModel::TwoLevel { low, high } => {
                if rng.gen_bool(0.5) { high } else { low }
            }
            UrgencyModel::Uniform { low, high } => low + rng.unit() * (high - low),
            UrgencyModel::Constant { value } => value,
        }
    }

    /// Every value the model can produce must be a valid task urgency.
    pub fn validate(&self) -> ScenarioResult<()> {
        let (low, high) = match *self {
            UrgencyModel::TwoLevel { low, high } | UrgencyModel::Uniform { low, high } => {
                (low, high)
            }
            UrgencyModel::Constant { value } => (value, value),
        };
        if !(low > 0.0 && low.is_finite() && high.is_finite() && high >= low) {
            return Err(ScenarioError::Config(format!(
                "urgency range [{low}, {high}] must be finite, positive, and non-empty"
            )));
        }
        Ok(())
    }
}
