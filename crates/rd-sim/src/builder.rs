//! Fluent builder for constructing a [`RobotSim`].

use rd_core::{Point, RobotId, RobotRng, SimConfig, TaskStream};
use rd_core::time::validate_speed;
use rd_dispatch::{CutoffPolicy, CutoffSelector, PendingQueue};
use rd_route::{RouteSequencer, RoutingOracle};

use crate::{RobotSim, RobotState, SimError, SimResult};

/// Fluent builder for [`RobotSim<O, P>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — seed, service time, default speed
/// - `RobotId` and anchor position
/// - the robot's [`TaskStream`]
/// - `O: RoutingOracle` — e.g. [`rd_route::HybridOracle`]
/// - `P: CutoffPolicy` — e.g. [`rd_dispatch::UrgencyThreshold`]
///
/// # Optional inputs (have defaults)
///
/// | Method        | Default                                   |
/// |---------------|-------------------------------------------|
/// | `.speed(s)`   | `config.default_speed`                    |
/// | `.rng(r)`     | `RobotRng::new(config.seed, robot)`       |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = RobotSimBuilder::new(&config, RobotId(0), anchor, &stream, ExactOracle, UrgencyThreshold)
///     .speed(1.5)
///     .build()?;
/// let result = sim.run(&mut NoopObserver)?;
/// ```
pub struct RobotSimBuilder<'a, O: RoutingOracle, P: CutoffPolicy> {
    config: &'a SimConfig,
    robot:  RobotId,
    anchor: Point,
    tasks:  &'a TaskStream,
    oracle: O,
    policy: P,
    speed:  Option<f64>,
    rng:    Option<RobotRng>,
}

impl<'a, O: RoutingOracle, P: CutoffPolicy> RobotSimBuilder<'a, O, P> {
    pub fn new(
        config: &'a SimConfig,
        robot:  RobotId,
        anchor: Point,
        tasks:  &'a TaskStream,
        oracle: O,
        policy: P,
    ) -> Self {
        Self {
            config,
            robot,
            anchor,
            tasks,
            oracle,
            policy,
            speed: None,
            rng:   None,
        }
    }

    /// Override the fleet-wide default speed for this robot.
    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Supply the cutoff RNG directly instead of deriving it from the seed.
    pub fn rng(mut self, rng: RobotRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Validate inputs and return a ready-to-run [`RobotSim`].
    pub fn build(self) -> SimResult<RobotSim<'a, O, P>> {
        self.config.validate()?;
        let speed = self.speed.unwrap_or(self.config.default_speed);
        validate_speed(speed)?;
        if !self.anchor.is_finite() {
            return Err(SimError::Config(format!(
                "{} anchor {} is not finite",
                self.robot, self.anchor
            )));
        }

        let rng = self
            .rng
            .unwrap_or_else(|| RobotRng::new(self.config.seed, self.robot));

        Ok(RobotSim {
            robot:        self.robot,
            anchor:       self.anchor,
            speed,
            service_time: self.config.task_completion_time,
            state:        RobotState::at_anchor(self.anchor),
            queue:        PendingQueue::new(),
            tasks:        self.tasks,
            rng,
            selector:     CutoffSelector::new(self.policy),
            sequencer:    RouteSequencer::new(self.oracle),
            next_arrival: 0,
            dispatched:   0,
            batches:      0,
            distance:     0.0,
        })
    }
}
