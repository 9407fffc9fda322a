//! Batch sequencing: oracle call plus orientation correction.
//!
//! The node list handed to the oracle is `[position, stop_0, stop_1, …]` in
//! the caller's (urgency) order.  The oracle's tour is validated, then
//! possibly flipped: if the tour's last stop is strictly closer to the
//! current position than its first stop, the non-origin part is reversed so
//! the robot sets off towards the nearer end.  Equal first-leg distances keep
//! the forward direction.  Flipping never changes which stops are adjacent.

use rd_core::Point;

use crate::{RouteResult, RoutingOracle};

/// A directed visiting order for one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectedRoute {
    /// Indices into the caller's stop slice, in visiting order.
    pub stops: Vec<usize>,
    /// `true` if the oracle's tour was traversed backwards.
    pub reversed: bool,
    /// Travel distance of the directed route, starting leg included.
    pub distance: f64,
}

impl DirectedRoute {
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// Wraps a [`RoutingOracle`] and turns its undirected tours into directed
/// routes.
pub struct RouteSequencer<O: RoutingOracle> {
    oracle: O,
}

impl<O: RoutingOracle> RouteSequencer<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Order `stops` for a robot currently at `position`.
    ///
    /// # Errors
    /// Any oracle error, or a contract violation (tour not starting at the
    /// origin, or not a permutation).  Both are fatal to the caller.
    pub fn sequence(&self, position: Point, stops: &[Point]) -> RouteResult<DirectedRoute> {
        let mut nodes = Vec::with_capacity(stops.len() + 1);
        nodes.push(position);
        nodes.extend_from_slice(stops);

        let tour = self.oracle.solve(&nodes, 0)?;
        tour.validate(nodes.len(), 0)?;

        let mut order = tour.order;
        let reversed = orient(&nodes, &mut order);

        let distance = crate::open_tour_length(&nodes, &order);
        Ok(DirectedRoute {
            stops: order[1..].iter().map(|&i| i - 1).collect(),
            reversed,
            distance,
        })
    }
}

/// Reverse `order[1..]` when the far end is strictly nearer to `nodes[0]`.
fn orient(nodes: &[Point], order: &mut [usize]) -> bool {
    if order.len() <= 2 {
        return false;
    }
    let origin = nodes[order[0]];
    let first = origin.distance(nodes[order[1]]);
    let last = origin.distance(nodes[order[order.len() - 1]]);
    if last < first {
        order[1..].reverse();
        true
    } else {
        false
    }
}
