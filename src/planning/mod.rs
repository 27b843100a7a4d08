//! Planning pipeline: traffic snapshot, behavior decision, trajectory
//! generation
//!
//! The pipeline is stateless per invocation; the persistent (lane,
//! reference speed) pair lives in [`crate::session::PlannerSession`].

pub mod behavior;
pub mod snapshot;
pub mod spline;
pub mod trajectory;

pub use behavior::{BehaviorPlanner, Decision};
pub use snapshot::{TrafficSnapshot, VehicleView};
pub use spline::{CubicSpline, CubicSplineFitter};
pub use trajectory::{RefFrame, TrajectoryGenerator};

/// Tunable planning constants.
///
/// Speeds are carried in the display unit the downstream controller expects
/// (mph); sensor fusion velocities arrive in m/s and are converted with
/// `mph_per_mps` where the two meet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerConfig {
    /// Seconds between consecutive trajectory points.
    pub time_step: f64,
    /// Number of points in every emitted trajectory.
    pub horizon: usize,
    /// Speed to hold when the lane ahead is free.
    pub cruise_speed: f64,
    /// A vehicle ahead in-lane closer than this is a threat.
    pub threat_gap: f64,
    /// An adjacent-lane gap must exceed this before a lane change is
    /// considered.
    pub pass_gap: f64,
    /// Sentinel distance meaning "no vehicle seen in that lane".
    pub detection_range: f64,
    /// Safety margin subtracted from a threat vehicle's converted speed.
    pub speed_margin: f64,
    /// Unit conversion factor between m/s and the display unit.
    pub mph_per_mps: f64,
    /// Longitudinal spacing of the three far spline anchors.
    pub anchor_spacing: f64,
    /// Local-frame x at which the sampling step is calibrated.
    pub lookahead: f64,
    /// Weight of the target in the per-cycle reference speed blend.
    pub speed_blend: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            time_step: 0.02,
            horizon: 50,
            cruise_speed: 49.5,
            threat_gap: 30.0,
            pass_gap: 35.0,
            detection_range: 1000.0,
            speed_margin: 10.0,
            mph_per_mps: 2.24,
            anchor_spacing: 30.0,
            lookahead: 30.0,
            speed_blend: 0.1,
        }
    }
}
