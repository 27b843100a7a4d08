//! Trajectory generation: anchored spline, frame rotation, resampling
//!
//! The new curve is anchored to the tail of the previously issued
//! trajectory so its initial tangent matches the vehicle's actual direction
//! of travel, which keeps the stitched trajectory jerk-continuous across
//! cycles. All fitting happens in an ego-relative, heading-aligned frame so
//! the curve stays a function of a single coordinate.

use crate::common::{Curve, CurveFitter, EgoState, FrenetProjector, PlannerResult, Point2D, Trajectory};
use crate::planning::spline::CubicSplineFitter;
use crate::planning::PlannerConfig;
use crate::road::lane_center;

/// Reference frame anchored at a pose: translate to the origin, rotate the
/// heading onto the local x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefFrame {
    pub origin: Point2D,
    pub yaw: f64,
}

impl RefFrame {
    pub fn new(origin: Point2D, yaw: f64) -> Self {
        Self { origin, yaw }
    }

    pub fn to_local(&self, p: Point2D) -> Point2D {
        let shift_x = p.x - self.origin.x;
        let shift_y = p.y - self.origin.y;
        let (sin, cos) = (-self.yaw).sin_cos();
        Point2D::new(shift_x * cos - shift_y * sin, shift_x * sin + shift_y * cos)
    }

    pub fn to_world(&self, p: Point2D) -> Point2D {
        let (sin, cos) = self.yaw.sin_cos();
        Point2D::new(
            p.x * cos - p.y * sin + self.origin.x,
            p.x * sin + p.y * cos + self.origin.y,
        )
    }
}

/// Generates the fixed-length waypoint sequence for one cycle.
pub struct TrajectoryGenerator<F = CubicSplineFitter> {
    fitter: F,
    cfg: PlannerConfig,
}

impl TrajectoryGenerator<CubicSplineFitter> {
    pub fn new(cfg: PlannerConfig) -> Self {
        Self { fitter: CubicSplineFitter, cfg }
    }
}

impl<F: CurveFitter> TrajectoryGenerator<F> {
    pub fn with_fitter(fitter: F, cfg: PlannerConfig) -> Self {
        Self { fitter, cfg }
    }

    /// Produce the next trajectory.
    ///
    /// `planning_s` is the ego s coordinate at the end of the unconsumed
    /// previous path (or the live value when no path remains); `lane` and
    /// `reference_speed` come from this cycle's behavior decision.
    pub fn generate<M: FrenetProjector>(
        &self,
        ego: &EgoState,
        previous_path: &[Point2D],
        planning_s: f64,
        lane: usize,
        reference_speed: f64,
        road: &M,
    ) -> PlannerResult<Trajectory> {
        let (frame, mut anchors) = seed_anchors(ego, previous_path);

        // lookahead anchors along the destination lane center bias the
        // curve shape toward the target lane
        for k in 1..=3 {
            let s = planning_s + self.cfg.anchor_spacing * k as f64;
            anchors.push(road.to_cartesian(s, lane_center(lane)));
        }

        let local: Vec<Point2D> = anchors.iter().map(|&p| frame.to_local(p)).collect();
        let xs: Vec<f64> = local.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = local.iter().map(|p| p.y).collect();
        let curve = self.fitter.fit(&xs, &ys)?;

        let mut trajectory = Trajectory::with_capacity(self.cfg.horizon);
        trajectory.points.extend_from_slice(previous_path);

        // calibrate the x step so that consecutive points, traversed one
        // per time step, realize the reference speed
        let target_x = self.cfg.lookahead;
        let target_y = curve.y_at(target_x);
        let target_dist = target_x.hypot(target_y);
        let steps = target_dist / (self.cfg.time_step * reference_speed / self.cfg.mph_per_mps);

        let mut x_local = 0.0;
        for _ in 0..self.cfg.horizon.saturating_sub(previous_path.len()) {
            x_local += target_x / steps;
            let point = Point2D::new(x_local, curve.y_at(x_local));
            trajectory.push(frame.to_world(point));
        }

        assert_eq!(
            trajectory.len(),
            self.cfg.horizon,
            "trajectory must span the full horizon"
        );
        Ok(trajectory)
    }
}

/// Pick the two near anchors and the reference frame.
///
/// With at least two unconsumed points the previous path's tail defines
/// both; otherwise a second anchor is synthesized one unit backward along
/// the current heading to establish the initial tangent.
fn seed_anchors(ego: &EgoState, previous_path: &[Point2D]) -> (RefFrame, Vec<Point2D>) {
    if previous_path.len() < 2 {
        let origin = ego.position();
        let back = Point2D::new(origin.x - ego.yaw.cos(), origin.y - ego.yaw.sin());
        (RefFrame::new(origin, ego.yaw), vec![back, origin])
    } else {
        let last = previous_path[previous_path.len() - 1];
        let before = previous_path[previous_path.len() - 2];
        (RefFrame::new(last, before.heading_to(&last)), vec![before, last])
    }
}
