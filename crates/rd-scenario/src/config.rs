//! Experiment configuration.
//!
//! `ScenarioConfig::default()` is the reference four-robot experiment.  A
//! JSON scenario file only needs the fields it changes:
//!
//! ```json
//! { "num_trials": 10, "arrival_rate": 0.9, "coverage": null }
//! ```

use rd_core::time::validate_speed;
use rd_core::{Point, SimConfig};

use crate::{CoverageParams, ScenarioError, ScenarioResult, UrgencyModel};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Side length of the square world.
    pub world_size: f64,

    /// Tasks arrive on `[0, end_time)`.
    pub end_time: f64,

    /// Expected task arrivals per unit time, fleet-wide.
    pub arrival_rate: f64,

    /// One anchor per robot, before coverage placement.
    pub initial_anchors: Vec<Point>,

    /// One speed per robot, parallel to `initial_anchors`.
    pub robot_speeds: Vec<f64>,

    pub urgency: UrgencyModel,

    /// `None` keeps `initial_anchors` as the final anchors.
    pub coverage: Option<CoverageParams>,

    pub num_trials: usize,

    pub sim: SimConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            world_size:      10.0,
            end_time:        1000.0,
            arrival_rate:    0.7,
            initial_anchors: vec![
                Point::new(2.0, 6.0),
                Point::new(4.0, 4.0),
                Point::new(5.0, 3.0),
                Point::new(9.0, 8.0),
            ],
            robot_speeds:    vec![0.5, 1.0, 1.5, 2.0],
            urgency:         UrgencyModel::default(),
            coverage:        Some(CoverageParams::default()),
            num_trials:      5,
            sim:             SimConfig::default(),
        }
    }
}

impl ScenarioConfig {
    pub fn robot_count(&self) -> usize {
        self.initial_anchors.len()
    }

    pub fn validate(&self) -> ScenarioResult<()> {
        if !(self.world_size > 0.0 && self.world_size.is_finite()) {
            return Err(ScenarioError::Config(format!(
                "world_size must be finite and > 0, got {}",
                self.world_size
            )));
        }
        if !(self.end_time >= 0.0 && self.end_time.is_finite()) {
            return Err(ScenarioError::Config(format!(
                "end_time must be finite and >= 0, got {}",
                self.end_time
            )));
        }
        if !(self.arrival_rate > 0.0 && self.arrival_rate.is_finite()) {
            return Err(ScenarioError::Config(format!(
                "arrival_rate must be finite and > 0, got {}",
                self.arrival_rate
            )));
        }
        if self.initial_anchors.is_empty() {
            return Err(ScenarioError::NoAnchors);
        }
        if self.robot_speeds.len() != self.initial_anchors.len() {
            return Err(ScenarioError::Config(format!(
                "{} anchors but {} robot speeds",
                self.initial_anchors.len(),
                self.robot_speeds.len()
            )));
        }
        for &s in &self.robot_speeds {
            validate_speed(s)?;
        }
        if self.num_trials == 0 {
            return Err(ScenarioError::Config("num_trials must be at least 1".into()));
        }
        self.urgency.validate()?;
        if let Some(c) = &self.coverage {
            c.validate()?;
        }
        self.sim.validate()?;
        Ok(())
    }
}
