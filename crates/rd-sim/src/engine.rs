//! `RobotSim` — one robot's event loop.

use rd_core::{Point, RobotId, RobotRng, TaskStream};
use rd_dispatch::{CutoffPolicy, CutoffSelector, PendingEntry, PendingQueue};
use rd_route::{RouteSequencer, RoutingOracle};

use crate::{
    BatchRecord, RobotResult, RobotState, SimError, SimObserver, SimResult, StopRecord,
    Transition,
};

/// Simulates a single robot over its own task stream.
///
/// Each [`step`](Self::step) performs exactly one transition:
///
/// | Queue     | Position      | Transition                                    |
/// |-----------|---------------|-----------------------------------------------|
/// | empty     | away          | drive to anchor (clock += distance / speed)   |
/// | empty     | at anchor     | fast-forward clock to the next arrival        |
/// | non-empty | anywhere      | select batch, route it, serve every stop      |
///
/// After every transition, tasks whose arrival time is at or before the
/// clock are admitted to the queue.  The run ends once every task in the
/// stream has been dispatched.
///
/// Create via [`RobotSimBuilder`][crate::RobotSimBuilder].
pub struct RobotSim<'a, O: RoutingOracle, P: CutoffPolicy> {
    pub robot:        RobotId,
    pub anchor:       Point,
    pub speed:        f64,
    pub service_time: f64,

    /// Position, clock, and accumulated weighted wait.
    pub state: RobotState,

    /// Admitted, not yet dispatched tasks.
    pub queue: PendingQueue,

    pub(crate) tasks:     &'a TaskStream,
    pub(crate) rng:       RobotRng,
    pub(crate) selector:  CutoffSelector<P>,
    pub(crate) sequencer: RouteSequencer<O>,

    /// Index of the first task not yet admitted.
    pub(crate) next_arrival: usize,
    pub(crate) dispatched:   usize,
    pub(crate) batches:      usize,
    pub(crate) distance:     f64,
}

impl<'a, O: RoutingOracle, P: CutoffPolicy> RobotSim<'a, O, P> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until every task has been dispatched.
    pub fn run<Obs: SimObserver>(&mut self, observer: &mut Obs) -> SimResult<RobotResult> {
        observer.on_robot_start(self.robot, self.anchor, self.tasks.len());
        while !self.is_finished() {
            self.step(observer)?;
        }
        let result = self.result();
        tracing::info!(
            robot = %self.robot,
            tasks = result.task_count,
            batches = result.batches,
            total_weighted_wait = result.total_weighted_wait,
            final_clock = result.final_clock,
            "robot finished"
        );
        observer.on_robot_end(&result);
        Ok(result)
    }

    /// Perform one transition.  Useful for tests and incremental stepping.
    pub fn step<Obs: SimObserver>(&mut self, observer: &mut Obs) -> SimResult<Transition> {
        if self.is_finished() {
            return Ok(Transition::Finished);
        }

        let transition = if !self.queue.is_empty() {
            self.execute_batch(observer)?
        } else if self.state.position != self.anchor {
            self.return_to_anchor(observer)
        } else {
            self.fast_forward(observer)?
        };

        self.admit_arrivals();
        Ok(transition)
    }

    pub fn is_finished(&self) -> bool {
        self.dispatched == self.tasks.len()
    }

    /// Number of tasks committed to batches so far.
    pub fn dispatched(&self) -> usize {
        self.dispatched
    }

    /// Snapshot of the run so far.
    pub fn result(&self) -> RobotResult {
        RobotResult {
            robot:               self.robot,
            task_count:          self.dispatched,
            total_weighted_wait: self.state.total_weighted_wait,
            final_clock:         self.state.clock.now(),
            batches:             self.batches,
            distance_traveled:   self.distance,
        }
    }

    // ── Transitions ───────────────────────────────────────────────────────

    fn return_to_anchor<Obs: SimObserver>(&mut self, observer: &mut Obs) -> Transition {
        let distance = self.state.position.distance(self.anchor);
        self.state.clock.advance(distance / self.speed);
        self.state.position = self.anchor;
        self.distance += distance;

        let clock = self.state.clock.now();
        tracing::trace!(robot = %self.robot, distance, clock, "returned to anchor");
        observer.on_return_to_anchor(self.robot, distance, clock);
        Transition::ReturnedToAnchor { distance, clock }
    }

    fn fast_forward<Obs: SimObserver>(&mut self, observer: &mut Obs) -> SimResult<Transition> {
        let Some(next) = self.tasks.get(self.next_arrival) else {
            return Err(SimError::Stalled {
                robot:     self.robot,
                remaining: self.tasks.len() - self.dispatched,
            });
        };
        self.state.clock.fast_forward_to(next.arrival_time);
        let admitted = self.admit_arrivals();

        let clock = self.state.clock.now();
        tracing::trace!(robot = %self.robot, clock, admitted, "fast-forwarded");
        observer.on_fast_forward(self.robot, clock, admitted);
        Ok(Transition::FastForwarded { clock, admitted })
    }

    fn execute_batch<Obs: SimObserver>(&mut self, observer: &mut Obs) -> SimResult<Transition> {
        let tasks = self.tasks;
        let batch = self.selector.select_batch(&mut self.queue, &mut self.rng)?;

        let stops: Vec<Point> = batch.iter().map(|e| tasks[e.task].pos).collect();
        let route = self
            .sequencer
            .sequence(self.state.position, &stops)
            .map_err(|source| SimError::Route { robot: self.robot, source })?;

        let record = BatchRecord {
            robot:    self.robot,
            batch:    self.batches,
            clock:    self.state.clock.now(),
            size:     batch.len(),
            deferred: self.queue.len(),
            reversed: route.reversed,
            distance: route.distance,
        };
        tracing::debug!(
            robot = %self.robot,
            batch = record.batch,
            clock = record.clock,
            size = record.size,
            urgency = batch.total_urgency(),
            deferred = record.deferred,
            reversed = record.reversed,
            "dispatching batch"
        );
        observer.on_batch(&record);

        let mut prev = self.state.position;
        for &stop in &route.stops {
            let task = &tasks[batch.entries[stop].task];
            let leg = prev.distance(task.pos);

            self.state.clock.advance(leg / self.speed + self.service_time);
            let completion = self.state.clock.now();
            debug_assert!(completion >= task.arrival_time, "task served before it arrived");
            self.state.total_weighted_wait += (completion - task.arrival_time) * task.urgency;
            self.distance += leg;
            prev = task.pos;
            tracing::trace!(robot = %self.robot, task = %task.id, completion, leg, "served stop");

            observer.on_stop(&StopRecord {
                robot:           self.robot,
                task:            task.id,
                batch:           self.batches,
                arrival_time:    task.arrival_time,
                completion_time: completion,
                urgency:         task.urgency,
                position:        task.pos,
            });
        }

        self.state.position = prev;
        self.dispatched += batch.len();
        self.batches += 1;

        Ok(Transition::ExecutedBatch {
            size:     batch.len(),
            reversed: route.reversed,
            clock:    self.state.clock.now(),
        })
    }

    /// Move every task with `arrival_time <= clock` into the queue.
    fn admit_arrivals(&mut self) -> usize {
        let now = self.state.clock.now();
        let start = self.next_arrival;
        while let Some(task) = self.tasks.get(self.next_arrival) {
            if task.arrival_time > now {
                break;
            }
            self.queue.admit(PendingEntry::new(task.urgency, self.next_arrival));
            self.next_arrival += 1;
        }
        self.next_arrival - start
    }
}
