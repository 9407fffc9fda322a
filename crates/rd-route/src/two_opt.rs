//! Heuristic open-tour solver: nearest-neighbour construction followed by
//! 2-opt local search with the origin pinned in place.
//!
//! ```text
//! 2-opt move on positions i < j (reverse order[i..=j]):
//!   Δ = d(o[i-1], o[j]) - d(o[i-1], o[i]) + d(o[i], o[j+1]) - d(o[j], o[j+1])
//! ```
//!
//! On an open path the `o[j+1]` terms vanish when `j` is the last position.

use rd_core::Point;

use crate::oracle::{check_input, open_tour_length};
use crate::{RouteResult, RoutingOracle, Tour};

/// Improvements smaller than this are treated as noise.
const EPSILON: f64 = 1e-10;

/// Nearest neighbour + 2-opt.
#[derive(Debug, Clone)]
pub struct TwoOptOracle {
    /// Upper bound on full improvement sweeps.
    pub max_passes: usize,
}

impl Default for TwoOptOracle {
    fn default() -> Self {
        Self { max_passes: 100 }
    }
}

impl RoutingOracle for TwoOptOracle {
    fn solve(&self, points: &[Point], origin: usize) -> RouteResult<Tour> {
        check_input(points, origin)?;
        if points.len() <= 2 {
            return Ok(Tour::trivial(points, origin));
        }

        let mut order = nearest_neighbour(points, origin);
        let passes = improve(points, &mut order, self.max_passes);
        tracing::trace!(points = points.len(), passes, "2-opt converged");

        Ok(Tour {
            length: open_tour_length(points, &order),
            order,
        })
    }

    fn name(&self) -> &'static str {
        "two-opt"
    }
}

/// Greedy path: always step to the closest unvisited point (lowest index on
/// ties).
fn nearest_neighbour(points: &[Point], origin: usize) -> Vec<usize> {
    let n = points.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    visited[origin] = true;
    order.push(origin);

    let mut current = origin;
    for _ in 1..n {
        let mut best: Option<(usize, f64)> = None;
        for (i, &seen) in visited.iter().enumerate() {
            if seen {
                continue;
            }
            let d = points[current].distance_2(points[i]);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }
        if let Some((next, _)) = best {
            visited[next] = true;
            order.push(next);
            current = next;
        }
    }
    order
}

/// First-improvement 2-opt.  Returns the number of sweeps performed.
fn improve(points: &[Point], order: &mut [usize], max_passes: usize) -> usize {
    let n = order.len();
    let mut passes = 0;
    while passes < max_passes {
        passes += 1;
        let mut improved = false;
        for i in 1..n - 1 {
            for j in i + 1..n {
                let a = points[order[i - 1]];
                let b = points[order[i]];
                let c = points[order[j]];
                let mut delta = a.distance(c) - a.distance(b);
                if j + 1 < n {
                    let e = points[order[j + 1]];
                    delta += b.distance(e) - c.distance(e);
                }
                if delta < -EPSILON {
                    order[i..=j].reverse();
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }
    passes
}
