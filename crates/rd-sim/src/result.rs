//! Run results and their aggregation.

use rd_core::RobotId;

/// Outcome of one robot's run.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotResult {
    pub robot:               RobotId,
    pub task_count:          usize,
    pub total_weighted_wait: f64,
    /// Clock after the last stop.  The final drive home is not included.
    pub final_clock:         f64,
    pub batches:             usize,
    pub distance_traveled:   f64,
}

impl RobotResult {
    /// Weighted wait per task, or `None` for a robot that had no tasks.
    pub fn average_weighted_wait(&self) -> Option<f64> {
        (self.task_count > 0).then(|| self.total_weighted_wait / self.task_count as f64)
    }
}

/// Results for every robot of a fleet, in robot order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetSummary {
    pub robots: Vec<RobotResult>,
}

impl FleetSummary {
    pub fn total_tasks(&self) -> usize {
        self.robots.iter().map(|r| r.task_count).sum()
    }

    pub fn total_weighted_wait(&self) -> f64 {
        self.robots.iter().map(|r| r.total_weighted_wait).sum()
    }

    /// Fleet-wide weighted wait per task; `None` if no robot had any task.
    pub fn average_weighted_wait(&self) -> Option<f64> {
        let n = self.total_tasks();
        (n > 0).then(|| self.total_weighted_wait() / n as f64)
    }

    /// Latest final clock across robots.
    pub fn makespan(&self) -> f64 {
        self.robots.iter().map(|r| r.final_clock).fold(0.0, f64::max)
    }
}
