//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `stops` and `robot_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::{OutputResult, RobotSummaryRow, StopRow};
use crate::writer::OutputWriter;

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    ///
    /// Rows from an earlier run into the same directory are discarded, as
    /// `CsvWriter` truncates its files.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             DROP TABLE IF EXISTS stops;
             DROP TABLE IF EXISTS robot_summaries;
             CREATE TABLE stops (
                 trial           INTEGER NOT NULL,
                 robot_id        INTEGER NOT NULL,
                 task_id         INTEGER NOT NULL,
                 batch           INTEGER NOT NULL,
                 arrival_time    REAL    NOT NULL,
                 completion_time REAL    NOT NULL,
                 urgency         REAL    NOT NULL,
                 weighted_wait   REAL    NOT NULL,
                 x               REAL    NOT NULL,
                 y               REAL    NOT NULL
             );
             CREATE TABLE robot_summaries (
                 trial                 INTEGER NOT NULL,
                 robot_id              INTEGER NOT NULL,
                 task_count            INTEGER NOT NULL,
                 batches               INTEGER NOT NULL,
                 total_weighted_wait   REAL    NOT NULL,
                 average_weighted_wait REAL,
                 final_clock           REAL    NOT NULL,
                 distance_traveled     REAL    NOT NULL,
                 PRIMARY KEY (trial, robot_id)
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_stops(&mut self, rows: &[StopRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO stops \
                 (trial, robot_id, task_id, batch, arrival_time, completion_time, \
                  urgency, weighted_wait, x, y) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.trial,
                    row.robot_id,
                    row.task_id,
                    row.batch,
                    row.arrival_time,
                    row.completion_time,
                    row.urgency,
                    row.weighted_wait,
                    row.x,
                    row.y,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_robot_summary(&mut self, row: &RobotSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO robot_summaries \
             (trial, robot_id, task_count, batches, total_weighted_wait, \
              average_weighted_wait, final_clock, distance_traveled) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                row.trial,
                row.robot_id,
                row.task_count as i64,
                row.batches as i64,
                row.total_weighted_wait,
                row.average_weighted_wait,
                row.final_clock,
                row.distance_traveled,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
