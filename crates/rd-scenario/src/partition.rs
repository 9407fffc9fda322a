//! Nearest-anchor task partitioning.
//!
//! An R-tree (via `rstar`) over the anchors answers one nearest-neighbour
//! query per task.  Each robot's stream keeps the fleet-wide arrival order
//! and the original `TaskId`s.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use rd_core::{Point, Task, TaskStream};

use crate::{ScenarioError, ScenarioResult};

// ── R-tree anchor entry ───────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct AnchorEntry {
    point: [f64; 2],
    robot: usize,
}

impl RTreeObject for AnchorEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AnchorEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── AnchorIndex ───────────────────────────────────────────────────────────────

/// Spatial index over robot anchors.
pub struct AnchorIndex {
    tree: RTree<AnchorEntry>,
}

impl AnchorIndex {
    pub fn new(anchors: &[Point]) -> ScenarioResult<Self> {
        if anchors.is_empty() {
            return Err(ScenarioError::NoAnchors);
        }
        if let Some(bad) = anchors.iter().find(|a| !a.is_finite()) {
            return Err(ScenarioError::Config(format!("anchor {bad} is not finite")));
        }
        let entries = anchors
            .iter()
            .enumerate()
            .map(|(robot, a)| AnchorEntry { point: a.as_array(), robot })
            .collect();
        Ok(Self { tree: RTree::bulk_load(entries) })
    }

    /// Index of the anchor nearest to `pos`.  Equidistant anchors resolve
    /// to the lowest index.
    ///
    /// Returns `None` only if the index has no anchors.
    pub fn nearest(&self, pos: Point) -> Option<usize> {
        let mut hits = self.tree.nearest_neighbor_iter_with_distance_2(&pos.as_array());
        let (first, best_d2) = hits.next()?;
        Some(
            hits.take_while(|&(_, d2)| d2 <= best_d2)
                .fold(first.robot, |best, (e, _)| best.min(e.robot)),
        )
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// Split `tasks` into one stream per anchor, each task going to its
/// nearest anchor.
pub fn assign_nearest(tasks: &[Task], anchors: &[Point]) -> ScenarioResult<Vec<TaskStream>> {
    let index = AnchorIndex::new(anchors)?;
    let mut buckets: Vec<Vec<Task>> = vec![Vec::new(); anchors.len()];
    for task in tasks {
        let robot = index.nearest(task.pos).ok_or(ScenarioError::NoAnchors)?;
        buckets[robot].push(*task);
    }
    buckets
        .into_iter()
        .map(|b| TaskStream::new(b).map_err(ScenarioError::from))
        .collect()
}
