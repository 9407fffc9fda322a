//! Simulation observer trait for progress reporting and data collection.

use rd_core::{Point, RobotId};

use crate::{BatchRecord, RobotResult, StopRecord};

/// Callbacks invoked by [`RobotSim`][crate::RobotSim] at each transition.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — per-stop printer
///
/// ```rust,ignore
/// struct StopPrinter;
///
/// impl SimObserver for StopPrinter {
///     fn on_stop(&mut self, stop: &StopRecord) {
///         println!("{} served {} at {:.2}", stop.robot, stop.task, stop.completion_time);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called by multi-trial drivers before a trial's first robot.
    fn on_trial_start(&mut self, _trial: usize) {}

    /// Called once before a robot's first transition.
    fn on_robot_start(&mut self, _robot: RobotId, _anchor: Point, _task_count: usize) {}

    /// Called after an idle robot drives back to its anchor.
    fn on_return_to_anchor(&mut self, _robot: RobotId, _distance: f64, _clock: f64) {}

    /// Called after an idle robot at its anchor jumps to the next arrival.
    fn on_fast_forward(&mut self, _robot: RobotId, _clock: f64, _admitted: usize) {}

    /// Called when a batch has been committed and routed, before any stop.
    fn on_batch(&mut self, _batch: &BatchRecord) {}

    /// Called after each stop's service completes.
    fn on_stop(&mut self, _stop: &StopRecord) {}

    /// Called once after a robot's last task.
    fn on_robot_end(&mut self, _result: &RobotResult) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
