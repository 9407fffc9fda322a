//! Plain data row types written by output backends.

use rd_sim::{RobotResult, StopRecord};

/// One served stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopRow {
    pub trial:           u32,
    pub robot_id:        u32,
    pub task_id:         u32,
    pub batch:           u32,
    pub arrival_time:    f64,
    pub completion_time: f64,
    pub urgency:         f64,
    pub weighted_wait:   f64,
    pub x:               f64,
    pub y:               f64,
}

impl StopRow {
    pub fn from_record(trial: u32, stop: &StopRecord) -> Self {
        Self {
            trial,
            robot_id:        stop.robot.0,
            task_id:         stop.task.0,
            batch:           stop.batch as u32,
            arrival_time:    stop.arrival_time,
            completion_time: stop.completion_time,
            urgency:         stop.urgency,
            weighted_wait:   stop.weighted_wait(),
            x:               stop.position.x,
            y:               stop.position.y,
        }
    }
}

/// One robot's totals for one trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotSummaryRow {
    pub trial:                 u32,
    pub robot_id:              u32,
    pub task_count:            u64,
    pub batches:               u64,
    pub total_weighted_wait:   f64,
    /// `None` for a robot that had no tasks.
    pub average_weighted_wait: Option<f64>,
    pub final_clock:           f64,
    pub distance_traveled:     f64,
}

impl RobotSummaryRow {
    pub fn from_result(trial: u32, result: &RobotResult) -> Self {
        Self {
            trial,
            robot_id:              result.robot.0,
            task_count:            result.task_count as u64,
            batches:               result.batches as u64,
            total_weighted_wait:   result.total_weighted_wait,
            average_weighted_wait: result.average_weighted_wait(),
            final_clock:           result.final_clock,
            distance_traveled:     result.distance_traveled,
        }
    }
}
