//! Per-connection planning session
//!
//! Owns the only state that survives across planning cycles: the current
//! lane and the smoothed reference speed. One session exists per connected
//! vehicle; a fresh connection starts over at lane 1 and cruise speed.

use tracing::debug;

use crate::common::{EgoState, FrenetProjector, PlannerResult, Point2D, TrackedVehicle, Trajectory};
use crate::planning::{BehaviorPlanner, PlannerConfig, TrafficSnapshot, TrajectoryGenerator};

/// Everything one planning cycle consumes, already decoded into domain
/// types (yaw in radians, sensor-fusion rows as tracked vehicles).
#[derive(Debug, Clone, PartialEq)]
pub struct CycleInput {
    pub ego: EgoState,
    pub previous_path: Vec<Point2D>,
    pub end_path_s: f64,
    pub vehicles: Vec<TrackedVehicle>,
}

/// Planning session for one connected vehicle.
pub struct PlannerSession<'m, M: FrenetProjector> {
    map: &'m M,
    behavior: BehaviorPlanner,
    generator: TrajectoryGenerator,
    cfg: PlannerConfig,
    lane: usize,
    reference_speed: f64,
}

impl<'m, M: FrenetProjector> PlannerSession<'m, M> {
    pub fn new(map: &'m M, cfg: PlannerConfig) -> Self {
        Self {
            map,
            behavior: BehaviorPlanner::new(cfg),
            generator: TrajectoryGenerator::new(cfg),
            cfg,
            lane: 1,
            reference_speed: cfg.cruise_speed,
        }
    }

    pub fn lane(&self) -> usize {
        self.lane
    }

    pub fn reference_speed(&self) -> f64 {
        self.reference_speed
    }

    /// Run one full planning cycle: snapshot, decision, trajectory.
    ///
    /// While unconsumed previous-path points remain, planning happens from
    /// the end of that path, so the ego s is replaced by `end_path_s`.
    pub fn run_cycle(&mut self, input: &CycleInput) -> PlannerResult<Trajectory> {
        let planning_s = if input.previous_path.is_empty() {
            input.ego.s
        } else {
            input.end_path_s
        };

        let snapshot = TrafficSnapshot::build(
            planning_s,
            self.lane,
            input.previous_path.len(),
            &input.vehicles,
            &self.cfg,
        );
        let decision = self.behavior.decide(&snapshot, input.ego.speed);
        self.lane = decision.lane;
        self.reference_speed = decision.reference_speed;
        debug!(
            lane = self.lane,
            reference_speed = self.reference_speed,
            vehicles = input.vehicles.len(),
            "cycle decision"
        );

        self.generator.generate(
            &input.ego,
            &input.previous_path,
            planning_s,
            self.lane,
            self.reference_speed,
            self.map,
        )
    }
}
