//! `rd-core` — foundational types for the `robot_dispatch` simulator.
//!
//! This crate is a dependency of every other `rd-*` crate.  It has no `rd-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                               |
//! |------------|--------------------------------------------------------|
//! | [`ids`]    | `RobotId`, `TaskId`                                    |
//! | [`geo`]    | `Point`, Euclidean distance                            |
//! | [`time`]   | `SimClock`, `SimConfig`                                |
//! | [`rng`]    | `RobotRng` (per-robot), `SimRng` (scenario-level)      |
//! | [`task`]   | `Task`, validated `TaskStream`                         |
//! | [`error`]  | `CoreError`, `CoreResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod task;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Point;
pub use ids::{RobotId, TaskId};
pub use rng::{RobotRng, SimRng};
pub use task::{Task, TaskStream};
pub use time::{SimClock, SimConfig};
