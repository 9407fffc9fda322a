//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, RobotSummaryRow, StopRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// All methods are infallible from the observer's perspective — errors are
/// stored internally and retrieved with [`SimOutputObserver::take_error`].
///
/// [`SimOutputObserver::take_error`]: crate::SimOutputObserver::take_error
pub trait OutputWriter {
    /// Write a batch of served stops.
    fn write_stops(&mut self, rows: &[StopRow]) -> OutputResult<()>;

    /// Write one robot summary row.
    fn write_robot_summary(&mut self, row: &RobotSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

impl<W: OutputWriter + ?Sized> OutputWriter for Box<W> {
    fn write_stops(&mut self, rows: &[StopRow]) -> OutputResult<()> {
        (**self).write_stops(rows)
    }

    fn write_robot_summary(&mut self, row: &RobotSummaryRow) -> OutputResult<()> {
        (**self).write_robot_summary(row)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}
