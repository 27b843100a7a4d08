//! highway_planner - highway lane decision and trajectory planning
//!
//! This crate decides, once per planning cycle, which lane a highway vehicle
//! should occupy and at what speed, then emits a smooth 50-point trajectory
//! for a downstream controller. It also carries the thin collaborators the
//! pipeline needs at runtime: the waypoint map, the telemetry protocol and a
//! single-client serve loop.

// Core modules
pub mod common;
pub mod road;

// Planning pipeline
pub mod planning;
pub mod session;

// Runtime collaborators
pub mod protocol;
pub mod server;

// Re-export common types for convenience
pub use common::{EgoState, Point2D, TrackedVehicle, Trajectory};
pub use common::{Curve, CurveFitter, FrenetProjector};
pub use common::{PlannerError, PlannerResult};
pub use planning::{BehaviorPlanner, Decision, PlannerConfig, TrafficSnapshot, TrajectoryGenerator};
pub use road::HighwayMap;
pub use session::PlannerSession;
