//! Tasks and the validated per-robot arrival stream.

use std::ops::Index;

use crate::{CoreError, CoreResult, Point, TaskId};

/// A single service request.
///
/// Immutable once created.  `id` is the task's index in the global arrival
/// sequence, before it was assigned to a robot.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    pub id:           TaskId,
    pub arrival_time: f64,
    pub pos:          Point,
    /// Strictly positive weight; both the dispatch sort key and the
    /// multiplier on this task's waiting time.
    pub urgency:      f64,
}

impl Task {
    #[inline]
    pub fn new(id: TaskId, arrival_time: f64, pos: Point, urgency: f64) -> Self {
        Self { id, arrival_time, pos, urgency }
    }

    fn validate(&self) -> CoreResult<()> {
        if !(self.arrival_time >= 0.0 && self.arrival_time.is_finite()) || !self.pos.is_finite() {
            return Err(CoreError::InvalidArrival {
                task:         self.id,
                arrival_time: self.arrival_time,
            });
        }
        if !(self.urgency > 0.0 && self.urgency.is_finite()) {
            return Err(CoreError::NonPositiveUrgency {
                task:    self.id,
                urgency: self.urgency,
            });
        }
        Ok(())
    }
}

// ── TaskStream ────────────────────────────────────────────────────────────────

/// One robot's tasks, sorted ascending by arrival time.
///
/// The only way to build a non-empty stream is [`TaskStream::new`], which
/// rejects non-positive urgencies and out-of-order arrivals.  Everything
/// downstream may therefore assume both invariants.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskStream {
    tasks: Vec<Task>,
}

impl TaskStream {
    /// Validate and wrap `tasks`.
    ///
    /// Equal arrival times are allowed; their relative order is kept and later
    /// serves as the urgency tie-breaker.
    pub fn new(tasks: Vec<Task>) -> CoreResult<Self> {
        let mut previous = 0.0_f64;
        for task in &tasks {
            task.validate()?;
            if task.arrival_time < previous {
                return Err(CoreError::UnsortedArrivals {
                    task:         task.id,
                    arrival_time: task.arrival_time,
                    previous,
                });
            }
            previous = task.arrival_time;
        }
        Ok(Self { tasks })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Sum of all urgencies — the denominator of an urgency-normalised mean.
    pub fn total_urgency(&self) -> f64 {
        self.tasks.iter().map(|t| t.urgency).sum()
    }
}

impl Index<usize> for TaskStream {
    type Output = Task;

    #[inline]
    fn index(&self, index: usize) -> &Task {
        &self.tasks[index]
    }
}

impl<'a> IntoIterator for &'a TaskStream {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
