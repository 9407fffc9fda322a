//! Multi-trial experiments: generate → partition → simulate → aggregate.

use rand::Rng;

use rd_core::{Point, SimConfig, SimRng, TaskStream};
use rd_dispatch::CutoffPolicy;
use rd_route::RoutingOracle;
use rd_sim::{Fleet, FleetSummary, SimObserver};

use crate::{ScenarioConfig, ScenarioResult, assign_nearest, generate_tasks, place_anchors};

/// Outcome of one trial.
#[derive(Clone, Debug, PartialEq)]
pub struct TrialSummary {
    pub trial:      usize,
    /// Tasks generated for the whole fleet.
    pub task_count: usize,
    pub fleet:      FleetSummary,
}

impl TrialSummary {
    /// Weighted wait per task over every robot of the trial.
    pub fn average_weighted_wait(&self) -> Option<f64> {
        self.fleet.average_weighted_wait()
    }
}

/// Outcome of every trial of an experiment.
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentSummary {
    /// Anchors used by every trial, after coverage placement.
    pub anchors: Vec<Point>,
    pub trials:  Vec<TrialSummary>,
}

impl ExperimentSummary {
    /// Mean of the per-trial averages, skipping trials that produced no
    /// tasks.  `None` if none did.
    pub fn mean_average_weighted_wait(&self) -> Option<f64> {
        let averages: Vec<f64> = self
            .trials
            .iter()
            .filter_map(TrialSummary::average_weighted_wait)
            .collect();
        (!averages.is_empty()).then(|| averages.iter().sum::<f64>() / averages.len() as f64)
    }
}

/// A validated scenario plus the oracle and cutoff policy every robot uses.
pub struct Experiment<O: RoutingOracle, P: CutoffPolicy> {
    config: ScenarioConfig,
    oracle: O,
    policy: P,
}

impl<O: RoutingOracle, P: CutoffPolicy> Experiment<O, P> {
    pub fn new(config: ScenarioConfig, oracle: O, policy: P) -> ScenarioResult<Self> {
        config.validate()?;
        Ok(Self { config, oracle, policy })
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Final anchors: coverage-placed, or the initial ones when coverage
    /// is disabled.
    pub fn anchors(&self) -> ScenarioResult<Vec<Point>> {
        match &self.config.coverage {
            Some(params) => place_anchors(
                &self.config.initial_anchors,
                &self.config.robot_speeds,
                self.config.world_size,
                params,
            ),
            None => Ok(self.config.initial_anchors.clone()),
        }
    }

    /// Run every trial without observation.
    ///
    /// With the `parallel` feature each trial's robots run on Rayon's pool.
    pub fn run(&self) -> ScenarioResult<ExperimentSummary> {
        #[cfg(feature = "parallel")]
        {
            self.run_trials(|fleet, _trial| Ok(fleet.run_parallel()?))
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.run_with(&mut rd_sim::NoopObserver)
        }
    }

    /// Run every trial sequentially, reporting to `observer`.
    pub fn run_with<Obs: SimObserver>(&self, observer: &mut Obs) -> ScenarioResult<ExperimentSummary> {
        self.run_trials(|fleet, trial| {
            observer.on_trial_start(trial);
            Ok(fleet.run(observer)?)
        })
    }

    /// Run one trial over a recorded fleet-wide task stream instead of a
    /// generated one.  Reported as trial 0.
    pub fn replay<Obs: SimObserver>(
        &self,
        tasks:    &TaskStream,
        observer: &mut Obs,
    ) -> ScenarioResult<TrialSummary> {
        let anchors = self.anchors()?;
        let streams = assign_nearest(tasks.as_slice(), &anchors)?;
        let fleet = Fleet::from_parts(
            self.config.sim.clone(),
            &self.oracle,
            &self.policy,
            &anchors,
            &self.config.robot_speeds,
            streams,
        )?;
        observer.on_trial_start(0);
        let summary = TrialSummary { trial: 0, task_count: tasks.len(), fleet: fleet.run(observer)? };
        log_trial(&summary);
        Ok(summary)
    }

    fn run_trials<F>(&self, mut simulate: F) -> ScenarioResult<ExperimentSummary>
    where
        F: FnMut(&Fleet<&O, &P>, usize) -> ScenarioResult<FleetSummary>,
    {
        let anchors = self.anchors()?;
        let mut root = SimRng::new(self.config.sim.seed);

        let trials = (0..self.config.num_trials)
            .map(|trial| {
                let mut rng = root.child(trial as u64);
                let (fleet, task_count) =
                    build_trial(&self.config, &anchors, &self.oracle, &self.policy, &mut rng)?;
                let summary = TrialSummary { trial, task_count, fleet: simulate(&fleet, trial)? };
                log_trial(&summary);
                Ok(summary)
            })
            .collect::<ScenarioResult<Vec<_>>>()?;

        Ok(ExperimentSummary { anchors, trials })
    }
}

/// Run a single trial from an explicit RNG.
///
/// `anchors` must have one entry per robot speed in `config`.
pub fn run_trial<O, P, Obs>(
    config:   &ScenarioConfig,
    anchors:  &[Point],
    oracle:   &O,
    policy:   &P,
    trial:    usize,
    rng:      &mut SimRng,
    observer: &mut Obs,
) -> ScenarioResult<TrialSummary>
where
    O: RoutingOracle,
    P: CutoffPolicy,
    Obs: SimObserver,
{
    let (fleet, task_count) = build_trial(config, anchors, oracle, policy, rng)?;
    observer.on_trial_start(trial);
    let summary = TrialSummary { trial, task_count, fleet: fleet.run(observer)? };
    log_trial(&summary);
    Ok(summary)
}

fn build_trial<'a, O: RoutingOracle, P: CutoffPolicy>(
    config:  &ScenarioConfig,
    anchors: &[Point],
    oracle:  &'a O,
    policy:  &'a P,
    rng:     &mut SimRng,
) -> ScenarioResult<(Fleet<&'a O, &'a P>, usize)> {
    let tasks = generate_tasks(
        config.end_time,
        config.arrival_rate,
        config.world_size,
        &config.urgency,
        rng,
    )?;
    let streams = assign_nearest(&tasks, anchors)?;

    // Cutoff draws differ between trials too.
    let sim = SimConfig { seed: rng.inner().r#gen(), ..config.sim.clone() };
    let fleet = Fleet::from_parts(sim, oracle, policy, anchors, &config.robot_speeds, streams)?;
    Ok((fleet, tasks.len()))
}

fn log_trial(summary: &TrialSummary) {
    tracing::info!(
        trial = summary.trial,
        tasks = summary.task_count,
        average_weighted_wait = summary.average_weighted_wait().unwrap_or(f64::NAN),
        "trial finished"
    );
}
