//! Exact open-tour solver (Held-Karp dynamic programme).
//!
//! `O(2^m · m²)` time and `O(2^m · m)` memory for `m = n - 1` non-origin
//! points, which is why inputs are capped at [`ExactOracle::MAX_POINTS`].
//! Ties resolve towards the lower index, so results are reproducible.

use rd_core::Point;

use crate::oracle::{check_input, open_tour_length};
use crate::{RouteError, RouteResult, RoutingOracle, Tour};

/// Optimal open tour from a fixed origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactOracle;

impl ExactOracle {
    /// Largest point set (origin included) the solver accepts.
    pub const MAX_POINTS: usize = 16;
}

const NO_PARENT: u8 = u8::MAX;

impl RoutingOracle for ExactOracle {
    fn solve(&self, points: &[Point], origin: usize) -> RouteResult<Tour> {
        check_input(points, origin)?;
        let n = points.len();
        if n <= 2 {
            return Ok(Tour::trivial(points, origin));
        }
        if n > Self::MAX_POINTS {
            return Err(RouteError::TooLarge { points: n, max: Self::MAX_POINTS });
        }

        // `others[j]` is the point index of DP slot `j`.
        let others: Vec<usize> = (0..n).filter(|&i| i != origin).collect();
        let m = others.len();
        let full = (1usize << m) - 1;

        // cost[mask * m + j]: shortest path from origin through `mask`, ending at slot j.
        let mut cost = vec![f64::INFINITY; (full + 1) * m];
        let mut parent = vec![NO_PARENT; (full + 1) * m];

        for j in 0..m {
            cost[(1 << j) * m + j] = points[origin].distance(points[others[j]]);
        }

        for mask in 1..=full {
            for last in 0..m {
                if mask & (1 << last) == 0 {
                    continue;
                }
                let here = cost[mask * m + last];
                if !here.is_finite() {
                    continue;
                }
                for next in 0..m {
                    if mask & (1 << next) != 0 {
                        continue;
                    }
                    let to = mask | (1 << next);
                    let candidate = here + points[others[last]].distance(points[others[next]]);
                    if candidate < cost[to * m + next] {
                        cost[to * m + next] = candidate;
                        parent[to * m + next] = last as u8;
                    }
                }
            }
        }

        let mut end = 0;
        for j in 1..m {
            if cost[full * m + j] < cost[full * m + end] {
                end = j;
            }
        }

        // Walk parents back from the cheapest end slot.
        let mut rev = Vec::with_capacity(m);
        let mut mask = full;
        let mut slot = end;
        loop {
            rev.push(others[slot]);
            let p = parent[mask * m + slot];
            mask &= !(1 << slot);
            if p == NO_PARENT {
                break;
            }
            slot = p as usize;
        }

        let mut order = Vec::with_capacity(n);
        order.push(origin);
        order.extend(rev.into_iter().rev());

        Ok(Tour {
            length: open_tour_length(points, &order),
            order,
        })
    }

    fn name(&self) -> &'static str {
        "exact"
    }
}
