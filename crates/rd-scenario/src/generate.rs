//! Random task streams: Poisson arrivals, uniform locations, and drawn
//! urgencies.
//!
//! Draw order is fixed (all arrival times, then locations, then
//! urgencies), so a given `SimRng` seed always yields the same stream.

use rand_distr::{Distribution, Exp};

use rd_core::{Point, SimRng, Task, TaskId};

use crate::{ScenarioError, ScenarioResult, UrgencyModel};

/// Arrival times of a Poisson process with rate `rate` on `[0, end_time)`.
///
/// Inter-arrival gaps are exponential; the first arrival at or past
/// `end_time` is discarded along with everything after it.
pub fn poisson_arrivals(end_time: f64, rate: f64, rng: &mut SimRng) -> ScenarioResult<Vec<f64>> {
    if !(end_time >= 0.0 && end_time.is_finite()) {
        return Err(ScenarioError::Config(format!(
            "end_time must be finite and >= 0, got {end_time}"
        )));
    }
    // `Exp::new` accepts a zero rate, which would never terminate here.
    let gaps = Exp::new(rate)
        .ok()
        .filter(|_| rate > 0.0 && rate.is_finite())
        .ok_or_else(|| {
            ScenarioError::Config(format!("arrival rate must be finite and > 0, got {rate}"))
        })?;

    let mut times = Vec::with_capacity((end_time * rate) as usize + 1);
    let mut t = 0.0;
    loop {
        t += gaps.sample(rng.inner());
        if t >= end_time {
            break;
        }
        times.push(t);
    }
    Ok(times)
}

/// `count` points uniform on the `world_size × world_size` square.
pub fn uniform_locations(count: usize, world_size: f64, rng: &mut SimRng) -> Vec<Point> {
    (0..count)
        .map(|_| {
            let x = rng.unit() * world_size;
            let y = rng.unit() * world_size;
            Point::new(x, y)
        })
        .collect()
}

/// A complete fleet-wide task list.  `TaskId`s are assigned in arrival
/// order starting at zero.
pub fn generate_tasks(
    end_time:   f64,
    rate:       f64,
    world_size: f64,
    urgency:    &UrgencyModel,
    rng:        &mut SimRng,
) -> ScenarioResult<Vec<Task>> {
    urgency.validate()?;
    let arrivals = poisson_arrivals(end_time, rate, rng)?;
    let locations = uniform_locations(arrivals.len(), world_size, rng);
    let urgencies: Vec<f64> = (0..arrivals.len()).map(|_| urgency.sample(rng)).collect();

    Ok(arrivals
        .into_iter()
        .zip(locations)
        .zip(urgencies)
        .enumerate()
        .map(|(i, ((arrival_time, pos), u))| Task::new(TaskId(i as u32), arrival_time, pos, u))
        .collect())
}
