//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `stops.csv`
//! - `robot_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::{OutputResult, RobotSummaryRow, StopRow};
use crate::writer::OutputWriter;

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    stops:     Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut stops = Writer::from_path(dir.join("stops.csv"))?;
        stops.write_record([
            "trial",
            "robot_id",
            "task_id",
            "batch",
            "arrival_time",
            "completion_time",
            "urgency",
            "weighted_wait",
            "x",
            "y",
        ])?;

        let mut summaries = Writer::from_path(dir.join("robot_summaries.csv"))?;
        summaries.write_record([
            "trial",
            "robot_id",
            "task_count",
            "batches",
            "total_weighted_wait",
            "average_weighted_wait",
            "final_clock",
            "distance_traveled",
        ])?;

        Ok(Self {
            stops,
            summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_stops(&mut self, rows: &[StopRow]) -> OutputResult<()> {
        for row in rows {
            self.stops.write_record(&[
                row.trial.to_string(),
                row.robot_id.to_string(),
                row.task_id.to_string(),
                row.batch.to_string(),
                row.arrival_time.to_string(),
                row.completion_time.to_string(),
                row.urgency.to_string(),
                row.weighted_wait.to_string(),
                row.x.to_string(),
                row.y.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_robot_summary(&mut self, row: &RobotSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.trial.to_string(),
            row.robot_id.to_string(),
            row.task_count.to_string(),
            row.batches.to_string(),
            row.total_weighted_wait.to_string(),
            row.average_weighted_wait.map(|a| a.to_string()).unwrap_or_default(),
            row.final_clock.to_string(),
            row.distance_traveled.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.stops.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
