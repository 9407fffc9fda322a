//! The `RoutingOracle` trait and the `Tour` it returns.
//!
//! # Pluggability
//!
//! `rd-sim` reaches the tour solver only through [`RoutingOracle`], so an
//! exact solver can back small test cases while a heuristic runs at
//! production scale, with no change to the engine.

use rd_core::Point;

use crate::{ExactOracle, RouteError, RouteResult, TwoOptOracle};

// ── Tour ──────────────────────────────────────────────────────────────────────

/// An open tour over a point set.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    /// Sum of leg lengths along `order`.  No closing edge.
    pub length: f64,
    /// Visiting order as indices into the point set; starts at the origin.
    pub order: Vec<usize>,
}

impl Tour {
    /// The one- and two-point tours every oracle must support.
    pub(crate) fn trivial(points: &[Point], origin: usize) -> Tour {
        let mut order = vec![origin];
        order.extend((0..points.len()).filter(|&i| i != origin));
        Tour {
            length: open_tour_length(points, &order),
            order,
        }
    }

    /// Check the oracle contract: starts at `origin`, visits each of the
    /// `points` indices exactly once.
    pub fn validate(&self, points: usize, origin: usize) -> RouteResult<()> {
        match self.order.first() {
            Some(&first) if first == origin => {}
            found => {
                return Err(RouteError::OriginMismatch {
                    expected: origin,
                    found:    found.copied(),
                });
            }
        }
        if self.order.len() != points {
            return Err(RouteError::NotPermutation { expected: points });
        }
        let mut seen = vec![false; points];
        for &i in &self.order {
            if i >= points || std::mem::replace(&mut seen[i], true) {
                return Err(RouteError::NotPermutation { expected: points });
            }
        }
        Ok(())
    }
}

/// Length of the open path visiting `points` in `order`.
pub fn open_tour_length(points: &[Point], order: &[usize]) -> f64 {
    order
        .windows(2)
        .map(|w| points[w[0]].distance(points[w[1]]))
        .sum()
}

/// Shared argument check for oracle implementations.
pub(crate) fn check_input(points: &[Point], origin: usize) -> RouteResult<()> {
    if points.is_empty() {
        return Err(RouteError::Empty);
    }
    if origin >= points.len() {
        return Err(RouteError::OriginOutOfRange { origin, points: points.len() });
    }
    Ok(())
}

// ── RoutingOracle ─────────────────────────────────────────────────────────────

/// Near-optimal open-tour solver.
///
/// # Contract
///
/// - The returned `order` is a permutation of `0..points.len()` beginning
///   with `origin`.
/// - One and two points are answered with the trivial order.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`; one oracle is shared by every robot
/// when a fleet is evaluated in parallel.
pub trait RoutingOracle: Send + Sync {
    fn solve(&self, points: &[Point], origin: usize) -> RouteResult<Tour>;

    /// Short human-readable name, used in logs and output files.
    fn name(&self) -> &'static str;
}

impl<T: RoutingOracle + ?Sized> RoutingOracle for &T {
    fn solve(&self, points: &[Point], origin: usize) -> RouteResult<Tour> {
        (**self).solve(points, origin)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<T: RoutingOracle + ?Sized> RoutingOracle for Box<T> {
    fn solve(&self, points: &[Point], origin: usize) -> RouteResult<Tour> {
        (**self).solve(points, origin)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

// ── HybridOracle ──────────────────────────────────────────────────────────────

/// Exact below a size threshold, heuristic above it.
///
/// Most batches are small, so the exact solver handles the bulk of calls and
/// the heuristic only kicks in after long idle-free stretches let the queue
/// grow.
#[derive(Debug, Clone)]
pub struct HybridOracle {
    exact_limit: usize,
    exact:       ExactOracle,
    heuristic:   TwoOptOracle,
}

impl HybridOracle {
    /// `exact_limit` is clamped to [`ExactOracle::MAX_POINTS`].
    pub fn new(exact_limit: usize) -> Self {
        Self {
            exact_limit: exact_limit.min(ExactOracle::MAX_POINTS),
            exact:       ExactOracle,
            heuristic:   TwoOptOracle::default(),
        }
    }

    /// Largest point count handed to the exact solver.
    #[inline]
    pub fn exact_limit(&self) -> usize {
        self.exact_limit
    }
}

impl Default for HybridOracle {
    fn default() -> Self {
        Self::new(10)
    }
}

impl RoutingOracle for HybridOracle {
    fn solve(&self, points: &[Point], origin: usize) -> RouteResult<Tour> {
        if points.len() <= self.exact_limit {
            self.exact.solve(points, origin)
        } else {
            self.heuristic.solve(points, origin)
        }
    }

    fn name(&self) -> &'static str {
        "hybrid"
    }
}
