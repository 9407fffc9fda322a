//! `rd-scenario` — synthetic workloads and multi-trial experiments.
//!
//! # Pipeline
//!
//! ```text
//! ScenarioConfig
//!   │
//!   ├─ place_anchors        coverage gradient, once per experiment
//!   │
//!   └─ per trial (SimRng::child(trial)):
//!        generate_tasks     Poisson arrivals, uniform locations, urgencies
//!        assign_nearest     R-tree nearest anchor, lowest index on ties
//!        Fleet::run         one RobotSim per anchor
//!        TrialSummary       per-robot and fleet-wide weighted waits
//! ```
//!
//! # Feature flags
//!
//! | Flag       | Effect                                               |
//! |------------|------------------------------------------------------|
//! | `parallel` | `Experiment::run` evaluates robots on Rayon's pool.  |

pub mod config;
pub mod coverage;
pub mod error;
pub mod experiment;
pub mod generate;
pub mod partition;
pub mod urgency;


pub use config::ScenarioConfig;
pub use coverage::{CoverageParams, place_anchors};
pub use error::{ScenarioError, ScenarioResult};
pub use experiment::{Experiment, ExperimentSummary, TrialSummary, run_trial};
pub use generate::{generate_tasks, poisson_arrivals, uniform_locations};
pub use partition::{AnchorIndex, assign_nearest};
pub use urgency::UrgencyModel;
