//! Per-robot mutable state and the records emitted while it changes.

use rd_core::{Point, RobotId, SimClock, TaskId};

/// The only mutable record of a robot's run.  Owned by its `RobotSim`.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotState {
    pub position:            Point,
    pub clock:               SimClock,
    /// Σ (completion − arrival) × urgency over completed stops.
    pub total_weighted_wait: f64,
}

impl RobotState {
    /// A robot idling at its anchor at time zero.
    pub fn at_anchor(anchor: Point) -> Self {
        Self {
            position:            anchor,
            clock:               SimClock::ZERO,
            total_weighted_wait: 0.0,
        }
    }
}

/// What a single call to `RobotSim::step` did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Queue empty away from the anchor: drove home.  No wait charged.
    ReturnedToAnchor { distance: f64, clock: f64 },
    /// Queue empty at the anchor: jumped to the next arrival.
    FastForwarded { clock: f64, admitted: usize },
    /// Committed a batch and served every stop in it.
    ExecutedBatch { size: usize, reversed: bool, clock: f64 },
    /// Every task has been dispatched; further steps do nothing.
    Finished,
}

/// One served stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopRecord {
    pub robot:           RobotId,
    pub task:            TaskId,
    /// Zero-based batch counter within this robot's run.
    pub batch:           usize,
    pub arrival_time:    f64,
    pub completion_time: f64,
    pub urgency:         f64,
    pub position:        Point,
}

impl StopRecord {
    #[inline]
    pub fn wait(&self) -> f64 {
        self.completion_time - self.arrival_time
    }

    #[inline]
    pub fn weighted_wait(&self) -> f64 {
        self.wait() * self.urgency
    }
}

/// Summary of a committed batch, reported before its stops are served.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchRecord {
    pub robot:    RobotId,
    pub batch:    usize,
    pub clock:    f64,
    pub size:     usize,
    /// Entries left pending after the cutoff.
    pub deferred: usize,
    pub reversed: bool,
    pub distance: f64,
}
