//! Integration tests for rd-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{RobotSummaryRow, StopRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn stop_row(task_id: u32, completion_time: f64) -> StopRow {
        StopRow {
            trial:           0,
            robot_id:        1,
            task_id,
            batch:           0,
            arrival_time:    0.0,
            completion_time,
            urgency:         2.0,
            weighted_wait:   completion_time * 2.0,
            x:               1.5,
            y:               2.5,
        }
    }

    fn summary_row(average_weighted_wait: Option<f64>) -> RobotSummaryRow {
        RobotSummaryRow {
            trial:                 3,
            robot_id:              2,
            task_count:            4,
            batches:               2,
            total_weighted_wait:   10.0,
            average_weighted_wait,
            final_clock:           12.5,
            distance_traveled:     7.0,
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("stops.csv").exists());
        assert!(dir.path().join("robot_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("stops.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers,
            [
                "trial", "robot_id", "task_id", "batch", "arrival_time", "completion_time",
                "urgency", "weighted_wait", "x", "y",
            ]
        );

        let mut rdr2 = csv::Reader::from_path(dir.path().join("robot_summaries.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers2,
            [
                "trial", "robot_id", "task_count", "batches", "total_weighted_wait",
                "average_weighted_wait", "final_clock", "distance_traveled",
            ]
        );
    }

    #[test]
    fn csv_stops_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_stops(&[stop_row(0, 1.0), stop_row(5, 3.5)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("stops.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][2], "5");   // task_id
        assert_eq!(&rows[1][5], "3.5"); // completion_time
        assert_eq!(&rows[1][7], "7");   // weighted_wait
    }

    #[test]
    fn csv_missing_average_is_blank() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_robot_summary(&summary_row(Some(2.5))).unwrap();
        w.write_robot_summary(&summary_row(None)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("robot_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][0], "3");
        assert_eq!(&rows[0][5], "2.5");
        assert_eq!(&rows[1][5], "");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_stops_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_stops(&[]).unwrap();
    }
}

// ── Observer tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use rd_core::{Point, RobotId, SimConfig, Task, TaskId, TaskStream};
    use rd_dispatch::UrgencyThreshold;
    use rd_route::ExactOracle;
    use rd_sim::{Fleet, SimObserver, StopRecord};

    use crate::{CsvWriter, OutputError, OutputResult, OutputWriter, RobotSummaryRow, SimOutputObserver, StopRow};

    fn fleet() -> Fleet<ExactOracle, UrgencyThreshold> {
        let stream = TaskStream::new(vec![
            Task::new(TaskId(0), 0.0, Point::new(1.0, 0.0), 1.0),
            Task::new(TaskId(1), 0.5, Point::new(2.0, 0.0), 10.0),
            Task::new(TaskId(2), 4.0, Point::new(0.0, 3.0), 0.5),
        ])
        .unwrap();
        Fleet::from_parts(
            SimConfig::default(),
            ExactOracle,
            UrgencyThreshold,
            &[Point::ORIGIN, Point::new(9.0, 9.0)],
            &[],
            vec![stream, TaskStream::empty()],
        )
        .unwrap()
    }

    #[test]
    fn integration_csv() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        obs.on_trial_start(4);
        let summary = fleet().run(&mut obs).unwrap();
        obs.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("stops.csv")).unwrap();
        let stops: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(stops.len(), 3);
        assert!(stops.iter().all(|r| &r[0] == "4" && &r[1] == "0"));

        let mut rdr = csv::Reader::from_path(dir.path().join("robot_summaries.csv")).unwrap();
        let robots: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(robots.len(), 2);
        assert_eq!(&robots[0][2], "3");
        assert_eq!(&robots[1][2], "0");
        assert_eq!(&robots[1][5], "");

        let total: f64 = robots[0][4].parse().unwrap();
        assert_eq!(total, summary.robots[0].total_weighted_wait);
    }

    #[test]
    fn stops_from_an_aborted_robot_are_discarded() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        // A robot that served one stop and then failed before `on_robot_end`.
        obs.on_robot_start(RobotId(7), Point::ORIGIN, 1);
        obs.on_stop(&StopRecord {
            robot:           RobotId(7),
            task:            TaskId(99),
            batch:           0,
            arrival_time:    0.0,
            completion_time: 1.0,
            urgency:         1.0,
            position:        Point::new(1.0, 0.0),
        });
        fleet().run(&mut obs).unwrap();
        obs.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("stops.csv")).unwrap();
        let stops: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(stops.len(), 3);
        assert!(stops.iter().all(|r| &r[1] == "0" && &r[2] != "99"));
    }

    /// Writer whose stop writes always fail.
    #[derive(Default)]
    struct Failing {
        summaries: usize,
        finished:  bool,
    }

    impl OutputWriter for Failing {
        fn write_stops(&mut self, _rows: &[StopRow]) -> OutputResult<()> {
            Err(OutputError::Io(std::io::Error::other("disk full")))
        }
        fn write_robot_summary(&mut self, _row: &RobotSummaryRow) -> OutputResult<()> {
            self.summaries += 1;
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.finished = true;
            Ok(())
        }
    }

    #[test]
    fn first_write_error_is_reported_by_finish() {
        let mut obs = SimOutputObserver::new(Failing::default());
        fleet().run(&mut obs).unwrap();

        assert!(matches!(obs.finish(), Err(OutputError::Io(_))));
        // Reported once; the run itself was not interrupted.
        assert!(obs.take_error().is_none());
        let writer = obs.into_writer();
        assert_eq!(writer.summaries, 2);
        assert!(writer.finished);
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use crate::row::{RobotSummaryRow, StopRow};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn stop(task_id: u32) -> StopRow {
        StopRow {
            trial: 0, robot_id: 0, task_id, batch: 0, arrival_time: 0.0,
            completion_time: 2.0, urgency: 1.0, weighted_wait: 2.0, x: 0.0, y: 0.0,
        }
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_stop_count() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_stops(&[stop(0), stop(1), stop(2)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM stops", [], |r| r.get(0)
        ).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn sqlite_missing_average_is_null() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_robot_summary(&RobotSummaryRow {
            trial: 1, robot_id: 3, task_count: 0, batches: 0, total_weighted_wait: 0.0,
            average_weighted_wait: None, final_clock: 0.0, distance_traveled: 0.0,
        }).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let avg: Option<f64> = conn.query_row(
            "SELECT average_weighted_wait FROM robot_summaries WHERE trial = 1 AND robot_id = 3",
            [],
            |r| r.get(0),
        ).unwrap();
        assert_eq!(avg, None);
    }

    #[test]
    fn sqlite_reopen_replaces_previous_run() {
        let dir = tmp();
        let summary = RobotSummaryRow {
            trial: 0, robot_id: 0, task_count: 1, batches: 1, total_weighted_wait: 2.0,
            average_weighted_wait: Some(2.0), final_clock: 2.0, distance_traveled: 0.0,
        };
        for _ in 0..2 {
            let mut w = SqliteWriter::new(dir.path()).unwrap();
            w.write_stops(&[stop(0)]).unwrap();
            w.write_robot_summary(&summary).unwrap();
            w.finish().unwrap();
        }

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let stops: i64 = conn.query_row("SELECT COUNT(*) FROM stops", [], |r| r.get(0)).unwrap();
        let robots: i64 = conn.query_row(
            "SELECT COUNT(*) FROM robot_summaries", [], |r| r.get(0)
        ).unwrap();
        assert_eq!((stops, robots), (1, 1));
    }
}
