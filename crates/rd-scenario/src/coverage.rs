//! Speed-aware coverage placement of robot anchors.
//!
//! Each robot `i` at `p_i` with speed `s_i` reaches a grid point `q` in
//! time `f_i(q) = |q − p_i| / s_i`.  The fleet's cost at `q` is the soft
//! minimum
//!
//!   g(q) = (Σ_i f_i(q)^α)^(1/α),    α < 0
//!
//! and every iteration moves each anchor along
//!
//!   p_i += gain · Σ_q (f_i(q) / g(q))^(α−1) · (q − p_i)
//!
//! over the grid `{0, res, 2·res, …} × {0, res, 2·res, …}` clipped to the
//! world square.  Grid points that coincide with an anchor contribute
//! nothing.  Faster robots end up owning larger regions.

use rd_core::Point;
use rd_core::time::validate_speed;

use crate::{ScenarioError, ScenarioResult};

/// Tuning for [`place_anchors`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CoverageParams {
    pub iterations: usize,
    /// Mixing exponent; more negative approaches a hard minimum.
    pub alpha:      f64,
    /// Grid spacing in world units.
    pub resolution: f64,
    pub gain:       f64,
}

impl Default for CoverageParams {
    fn default() -> Self {
        Self {
            iterations: 40,
            alpha:      -10.0,
            resolution: 0.1,
            gain:       1e-4,
        }
    }
}

impl CoverageParams {
    pub fn validate(&self) -> ScenarioResult<()> {
        if !(self.alpha < 0.0 && self.alpha.is_finite()) {
            return Err(ScenarioError::Config(format!(
                "coverage alpha must be finite and negative, got {}",
                self.alpha
            )));
        }
        if !(self.resolution > 0.0 && self.resolution.is_finite()) {
            return Err(ScenarioError::Config(format!(
                "coverage resolution must be finite and > 0, got {}",
                self.resolution
            )));
        }
        if !self.gain.is_finite() {
            return Err(ScenarioError::Config("coverage gain must be finite".into()));
        }
        Ok(())
    }
}

/// Iteratively move `initial` anchors to cover the world square.
pub fn place_anchors(
    initial:    &[Point],
    speeds:     &[f64],
    world_size: f64,
    params:     &CoverageParams,
) -> ScenarioResult<Vec<Point>> {
    if initial.len() != speeds.len() {
        return Err(ScenarioError::Config(format!(
            "{} initial anchors but {} robot speeds",
            initial.len(),
            speeds.len()
        )));
    }
    params.validate()?;
    for &s in speeds {
        validate_speed(s)?;
    }

    let axis: Vec<f64> = (0..)
        .map(|i| i as f64 * params.resolution)
        .take_while(|&v| v < world_size)
        .collect();

    let mut anchors = initial.to_vec();
    let mut input = vec![(0.0, 0.0); anchors.len()];
    let mut f = vec![0.0; anchors.len()];

    for iter in 0..params.iterations {
        input.fill((0.0, 0.0));
        for &x in &axis {
            for &y in &axis {
                let q = Point::new(x, y);
                accumulate(q, &anchors, speeds, params.alpha, &mut f, &mut input);
            }
        }
        for (p, &(dx, dy)) in anchors.iter_mut().zip(&input) {
            p.x += params.gain * dx;
            p.y += params.gain * dy;
        }
        tracing::trace!(iter, ?anchors, "coverage iteration");
    }

    if anchors.iter().any(|p| !p.is_finite()) {
        return Err(ScenarioError::Config(
            "coverage placement diverged; reduce gain".into(),
        ));
    }
    tracing::debug!(?anchors, iterations = params.iterations, "placed anchors");
    Ok(anchors)
}

/// Add grid point `q`'s gradient contribution to every robot's input.
fn accumulate(
    q:       Point,
    anchors: &[Point],
    speeds:  &[f64],
    alpha:   f64,
    f:       &mut [f64],
    input:   &mut [(f64, f64)],
) {
    for ((fi, p), s) in f.iter_mut().zip(anchors).zip(speeds) {
        *fi = q.distance(*p) / s;
        if *fi == 0.0 {
            return;
        }
    }
    let g = f.iter().map(|fi| fi.powf(alpha)).sum::<f64>().powf(1.0 / alpha);

    for ((acc, p), &fi) in input.iter_mut().zip(anchors).zip(f.iter()) {
        let w = (fi / g).powf(alpha - 1.0);
        acc.0 += w * (q.x - p.x);
        acc.1 += w * (q.y - p.y);
    }
}
