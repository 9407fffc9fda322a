//! Cutoff policies — how much of the pending queue to commit per round.
//!
//! # Urgency threshold rule
//!
//! ```text
//! threshold ~ Uniform[0, max pending urgency)
//! batch     = longest prefix of the sorted queue with urgency >= threshold
//! ```
//!
//! The highest-urgency entry always satisfies the rule because the draw is
//! strictly below the maximum, so a batch is never empty.  An entry whose
//! urgency equals the threshold is included; the first entry strictly below
//! it ends the batch.  The more urgency is pending, the more entries clear a
//! given draw, so busy queues tend to produce larger batches.
//!
//! The draw is taken even when only one entry is pending, so the RNG stream
//! depends on the number of rounds and not on queue sizes.

use rd_core::RobotRng;

use crate::{Batch, DispatchError, DispatchResult, PendingEntry, PendingQueue};

/// Pluggable batch-size rule.
///
/// `sorted` is non-empty and already in dispatch order.  The returned length
/// is clamped to `1..=sorted.len()` by [`CutoffSelector`], so policies need
/// not guard against either bound.
pub trait CutoffPolicy: Send + Sync {
    fn batch_len(&self, sorted: &[PendingEntry], rng: &mut RobotRng) -> usize;

    /// Short human-readable name, used in logs and output files.
    fn name(&self) -> &'static str;
}

impl<T: CutoffPolicy + ?Sized> CutoffPolicy for &T {
    fn batch_len(&self, sorted: &[PendingEntry], rng: &mut RobotRng) -> usize {
        (**self).batch_len(sorted, rng)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<T: CutoffPolicy + ?Sized> CutoffPolicy for Box<T> {
    fn batch_len(&self, sorted: &[PendingEntry], rng: &mut RobotRng) -> usize {
        (**self).batch_len(sorted, rng)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Length of the prefix of `sorted` whose urgencies are all `>= threshold`,
/// never less than one.
pub fn prefix_len(sorted: &[PendingEntry], threshold: f64) -> usize {
    sorted
        .iter()
        .take_while(|e| e.urgency >= threshold)
        .count()
        .max(1)
        .min(sorted.len())
}

// ── Policies ──────────────────────────────────────────────────────────────────

/// Randomised, urgency-weighted cutoff (the default).
#[derive(Debug, Clone, Copy, Default)]
pub struct UrgencyThreshold;

impl CutoffPolicy for UrgencyThreshold {
    fn batch_len(&self, sorted: &[PendingEntry], rng: &mut RobotRng) -> usize {
        let max = sorted[0].urgency;
        let threshold = rng.gen_range(0.0..max);
        let n = prefix_len(sorted, threshold);
        tracing::trace!(threshold, pending = sorted.len(), batch = n, "urgency cutoff");
        n
    }

    fn name(&self) -> &'static str {
        "threshold"
    }
}

/// Commit everything pending.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchAll;

impl CutoffPolicy for DispatchAll {
    fn batch_len(&self, sorted: &[PendingEntry], _rng: &mut RobotRng) -> usize {
        sorted.len()
    }

    fn name(&self) -> &'static str {
        "all"
    }
}

/// Cutoff index drawn uniformly over the queue, ignoring urgency values.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPrefix;

impl CutoffPolicy for UniformPrefix {
    fn batch_len(&self, sorted: &[PendingEntry], rng: &mut RobotRng) -> usize {
        rng.gen_range(0..sorted.len()) + 1
    }

    fn name(&self) -> &'static str {
        "uniform"
    }
}

// ── CutoffSelector ────────────────────────────────────────────────────────────

/// Sorts a queue, applies a [`CutoffPolicy`], and splits off the batch.
pub struct CutoffSelector<P: CutoffPolicy> {
    policy: P,
}

impl<P: CutoffPolicy> CutoffSelector<P> {
    pub fn new(policy: P) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Remove and return the next batch.
    ///
    /// # Errors
    /// [`DispatchError::EmptyQueue`] if nothing is pending.
    pub fn select_batch(
        &self,
        queue: &mut PendingQueue,
        rng:   &mut RobotRng,
    ) -> DispatchResult<Batch> {
        if queue.is_empty() {
            return Err(DispatchError::EmptyQueue);
        }
        let sorted = queue.sort_by_urgency();
        let n = self.policy.batch_len(sorted, rng).clamp(1, sorted.len());
        Ok(queue.take_front(n))
    }
}
