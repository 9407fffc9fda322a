//! `Fleet` — independent robots evaluated over disjoint task partitions.

use rd_core::{Point, RobotId, SimConfig, TaskStream};
use rd_dispatch::CutoffPolicy;
use rd_route::RoutingOracle;

use crate::{FleetSummary, NoopObserver, RobotResult, RobotSimBuilder, SimError, SimObserver, SimResult};

/// One robot's fixed inputs.
#[derive(Debug, Clone)]
pub struct RobotSpec {
    pub anchor: Point,
    /// `None` uses `SimConfig::default_speed`.
    pub speed:  Option<f64>,
    pub tasks:  TaskStream,
}

/// A set of robots sharing one oracle, one cutoff policy, and one config.
///
/// Robots never interact: each has its own clock, queue, and RNG.  Running
/// them one after another or in parallel gives identical results.
pub struct Fleet<O: RoutingOracle, P: CutoffPolicy> {
    pub config: SimConfig,
    pub robots: Vec<RobotSpec>,
    oracle:     O,
    policy:     P,
}

impl<O: RoutingOracle, P: CutoffPolicy> Fleet<O, P> {
    pub fn new(config: SimConfig, oracle: O, policy: P) -> Self {
        Self { config, robots: Vec::new(), oracle, policy }
    }

    /// Build a fleet from parallel per-robot vectors.
    ///
    /// `speeds` may be empty (everyone uses the default speed); otherwise it
    /// must match `anchors` in length, as must `streams`.
    pub fn from_parts(
        config:  SimConfig,
        oracle:  O,
        policy:  P,
        anchors: &[Point],
        speeds:  &[f64],
        streams: Vec<TaskStream>,
    ) -> SimResult<Self> {
        if streams.len() != anchors.len() {
            return Err(SimError::RobotCountMismatch {
                expected: anchors.len(),
                got:      streams.len(),
                what:     "task streams",
            });
        }
        if !speeds.is_empty() && speeds.len() != anchors.len() {
            return Err(SimError::RobotCountMismatch {
                expected: anchors.len(),
                got:      speeds.len(),
                what:     "robot speeds",
            });
        }

        let mut fleet = Self::new(config, oracle, policy);
        for (i, (&anchor, tasks)) in anchors.iter().zip(streams).enumerate() {
            fleet.push(RobotSpec { anchor, speed: speeds.get(i).copied(), tasks });
        }
        Ok(fleet)
    }

    /// Append a robot; its id is its position in the fleet.
    pub fn push(&mut self, spec: RobotSpec) -> RobotId {
        let id = RobotId(self.robots.len() as u32);
        self.robots.push(spec);
        id
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Simulate every robot in order, reporting to `observer`.
    pub fn run<Obs: SimObserver>(&self, observer: &mut Obs) -> SimResult<FleetSummary> {
        let robots = self
            .robots
            .iter()
            .enumerate()
            .map(|(i, spec)| self.simulate(RobotId(i as u32), spec, observer))
            .collect::<SimResult<Vec<_>>>()?;
        Ok(FleetSummary { robots })
    }

    /// Simulate every robot on Rayon's thread pool.
    ///
    /// Uses `config.num_threads` workers when set.  No observer: callbacks
    /// would arrive interleaved across robots.
    #[cfg(feature = "parallel")]
    pub fn run_parallel(&self) -> SimResult<FleetSummary> {
        use rayon::prelude::*;

        let work = || {
            self.robots
                .par_iter()
                .enumerate()
                .map(|(i, spec)| self.simulate(RobotId(i as u32), spec, &mut NoopObserver))
                .collect::<SimResult<Vec<_>>>()
        };

        let robots = match self.config.num_threads {
            Some(n) => rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| SimError::Config(e.to_string()))?
                .install(work)?,
            None => work()?,
        };
        Ok(FleetSummary { robots })
    }

    /// Simulate a single robot with a no-op observer.
    pub fn run_robot(&self, robot: RobotId) -> SimResult<RobotResult> {
        let spec = self.robots.get(robot.index()).ok_or_else(|| {
            SimError::Config(format!("{robot} is not part of this fleet"))
        })?;
        self.simulate(robot, spec, &mut NoopObserver)
    }

    fn simulate<Obs: SimObserver>(
        &self,
        robot:    RobotId,
        spec:     &RobotSpec,
        observer: &mut Obs,
    ) -> SimResult<RobotResult> {
        if spec.tasks.is_empty() {
            tracing::warn!(robot = %robot, "robot has no tasks; it never leaves its anchor");
        }
        let mut builder = RobotSimBuilder::new(
            &self.config,
            robot,
            spec.anchor,
            &spec.tasks,
            &self.oracle,
            &self.policy,
        );
        if let Some(speed) = spec.speed {
            builder = builder.speed(speed);
        }
        builder.build()?.run(observer)
    }
}
