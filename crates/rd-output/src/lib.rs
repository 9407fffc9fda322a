//! `rd-output` — simulation output writers for the robot_dispatch simulator.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created                              |
//! |-----------|-------------|--------------------------------------------|
//! | *(none)*  | CSV         | `stops.csv`, `robot_summaries.csv`         |
//! | `sqlite`  | SQLite      | `output.db`                                |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `rd_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rd_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! experiment.run_with(&mut obs)?;
//! obs.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{RobotSummaryRow, StopRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
