//! Simulated time model.
//!
//! # Design
//!
//! Time is a continuous `f64` that only ever moves forward.  There is no
//! wall clock: the engine jumps the clock straight to the next event
//! (a task arrival, the end of a travel leg, the end of a service).
//!
//! `SimClock` enforces monotonicity at the single point where time is
//! mutated, so every other component can rely on it.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── SimClock ──────────────────────────────────────────────────────────────────

/// A robot's virtual clock.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    now: f64,
}

impl SimClock {
    pub const ZERO: SimClock = SimClock { now: 0.0 };

    #[inline]
    pub fn now(self) -> f64 {
        self.now
    }

    /// Advance by a non-negative duration.
    #[inline]
    pub fn advance(&mut self, dt: f64) {
        debug_assert!(dt >= 0.0, "clock cannot run backwards (dt = {dt})");
        self.now += dt.max(0.0);
    }

    /// Jump to `t`; a target in the past leaves the clock unchanged.
    #[inline]
    pub fn fast_forward_to(&mut self, t: f64) {
        if t > self.now {
            self.now = t;
        }
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}", self.now)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Simulation parameters shared by every robot in a run.
///
/// Typically embedded in a scenario file loaded by the application crate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Flat service time charged at every stop, independent of distance.
    pub task_completion_time: f64,

    /// Speed used for robots that do not specify their own.
    pub default_speed: f64,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:                 42,
            task_completion_time: 1.0,
            default_speed:        1.0,
            num_threads:          None,
        }
    }
}

impl SimConfig {
    /// Reject parameters that would break clock monotonicity or divide by
    /// zero.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.task_completion_time >= 0.0 && self.task_completion_time.is_finite()) {
            return Err(CoreError::Config(format!(
                "task_completion_time must be finite and >= 0, got {}",
                self.task_completion_time
            )));
        }
        validate_speed(self.default_speed)?;
        if self.num_threads == Some(0) {
            return Err(CoreError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }
}

/// A robot speed must be strictly positive and finite.
pub fn validate_speed(speed: f64) -> CoreResult<()> {
    if speed > 0.0 && speed.is_finite() {
        Ok(())
    } else {
        Err(CoreError::Config(format!("speed must be finite and > 0, got {speed}")))
    }
}
