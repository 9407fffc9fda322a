//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use rd_core::{Point, RobotId};
use rd_sim::{RobotResult, SimObserver, StopRecord};

use crate::row::{RobotSummaryRow, StopRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes served stops and per-robot summaries to any
/// [`OutputWriter`] backend (CSV, SQLite, …).
///
/// Stops are buffered per robot and written in one call when the robot
/// finishes.  Errors from the writer are stored internally because
/// `SimObserver` methods have no return value.  After the run, call
/// [`finish`][Self::finish] (or check [`take_error`][Self::take_error]).
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    trial:      u32,
    pending:    Vec<StopRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            trial:      0,
            pending:    Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer, reporting the first error seen during the run.
    pub fn finish(&mut self) -> OutputResult<()> {
        let result = self.writer.finish();
        self.store_err(result);
        self.take_error().map_or(Ok(()), Err)
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_trial_start(&mut self, trial: usize) {
        self.trial = trial as u32;
    }

    fn on_robot_start(&mut self, _robot: RobotId, _anchor: Point, _task_count: usize) {
        // Stops left by a robot whose run failed are never flushed.
        self.pending.clear();
    }

    fn on_stop(&mut self, stop: &StopRecord) {
        self.pending.push(StopRow::from_record(self.trial, stop));
    }

    fn on_robot_end(&mut self, result: &RobotResult) {
        if !self.pending.is_empty() {
            let result = self.writer.write_stops(&self.pending);
            self.pending.clear();
            self.store_err(result);
        }
        let row = RobotSummaryRow::from_result(self.trial, result);
        let result = self.writer.write_robot_summary(&row);
        self.store_err(result);
    }
}
