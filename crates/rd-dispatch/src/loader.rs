//! CSV task-stream loader.
//!
//! # CSV format
//!
//! One row per task, already sorted by arrival time.  The `TaskId` of each
//! task is its zero-based row number.
//!
//! ```csv
//! arrival_time,x,y,urgency
//! 0.8,3.1,4.0,10.0
//! 2.5,7.2,1.9,0.5
//! ```
//!
//! Rows are validated through `TaskStream::new`, so an unsorted file or a
//! non-positive urgency is rejected here rather than during simulation.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use rd_core::{Point, Task, TaskId, TaskStream};

use crate::DispatchError;

#[derive(Deserialize)]
struct TaskRecord {
    arrival_time: f64,
    x:            f64,
    y:            f64,
    urgency:      f64,
}

/// Load a `TaskStream` from a CSV file.
pub fn load_stream_csv(path: &Path) -> Result<TaskStream, DispatchError> {
    let file = std::fs::File::open(path).map_err(DispatchError::Io)?;
    load_stream_reader(file)
}

/// Like [`load_stream_csv`] but accepts any `Read` source.
pub fn load_stream_reader<R: Read>(reader: R) -> Result<TaskStream, DispatchError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut tasks = Vec::new();

    for (row, result) in csv_reader.deserialize::<TaskRecord>().enumerate() {
        let rec = result.map_err(|e| DispatchError::Parse(e.to_string()))?;
        let id = TaskId::try_from(row)
            .map_err(|_| DispatchError::Parse(format!("row {row} exceeds TaskId range")))?;
        tasks.push(Task::new(id, rec.arrival_time, Point::new(rec.x, rec.y), rec.urgency));
    }

    Ok(TaskStream::new(tasks)?)
}
