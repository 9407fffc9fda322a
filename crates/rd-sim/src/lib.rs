//! `rd-sim` — the per-robot event loop of the robot_dispatch simulator.
//!
//! # Robot event loop
//!
//! ```text
//! until every task in the stream is dispatched:
//!   queue empty, robot away      → drive to anchor (no wait charged)
//!   queue empty, robot at anchor → fast-forward clock to next arrival
//!   queue non-empty              → batch = CutoffSelector.select_batch()
//!                                  route = RouteSequencer.sequence(position, batch)
//!                                  for each stop: clock += leg / speed + service
//!                                                 wait  += (clock - arrival) * urgency
//!   admit every task with arrival_time <= clock
//! ```
//!
//! Robots are independent.  A [`Fleet`] runs many of them over disjoint task
//! partitions, sequentially or (feature `parallel`) on Rayon.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Adds `Fleet::run_parallel`.                            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rd_core::{Point, RobotId, SimConfig};
//! use rd_dispatch::UrgencyThreshold;
//! use rd_route::HybridOracle;
//! use rd_sim::{NoopObserver, RobotSimBuilder};
//!
//! let config = SimConfig::default();
//! let mut sim = RobotSimBuilder::new(&config, RobotId(0), Point::ORIGIN, &stream,
//!                                    HybridOracle::default(), UrgencyThreshold)
//!     .build()?;
//! let result = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod fleet;
pub mod observer;
pub mod result;
pub mod state;

#[cfg(test)]
mod tests;

pub use builder::RobotSimBuilder;
pub use engine::RobotSim;
pub use error::{SimError, SimResult};
pub use fleet::{Fleet, RobotSpec};
pub use observer::{NoopObserver, SimObserver};
pub use result::{FleetSummary, RobotResult};
pub use state::{BatchRecord, RobotState, StopRecord, Transition};
