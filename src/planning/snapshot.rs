//! Per-cycle derived view of the sensor-fusion rows
//!
//! Each tracked vehicle is projected forward with constant velocity to the
//! moment the new trajectory begins executing (the end of the unconsumed
//! previous path), then classified relative to the ego lane.

use crate::common::TrackedVehicle;
use crate::planning::PlannerConfig;
use crate::road::{in_lane, in_left_lane};

/// One tracked vehicle, projected and classified for this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleView {
    pub id: u64,
    /// Speed from the raw velocity components, m/s.
    pub speed: f64,
    /// s coordinate after constant-velocity projection over the remaining
    /// previous-path horizon.
    pub projected_s: f64,
    /// Longitudinal gap to the ego, direction-corrected: vehicles behind
    /// are counted at twice their distance so rear threats weigh heavier.
    pub gap: f64,
    pub in_ego_lane: bool,
    pub in_left_lane: bool,
}

/// Snapshot of the traffic around the ego vehicle for one planning cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficSnapshot {
    pub ego_s: f64,
    pub lane: usize,
    pub vehicles: Vec<VehicleView>,
}

impl TrafficSnapshot {
    /// Build the snapshot. `prev_len` is the number of unconsumed points of
    /// the previously issued trajectory; iteration order of `vehicles` is
    /// preserved because the behavior planner is order-sensitive.
    pub fn build(
        ego_s: f64,
        lane: usize,
        prev_len: usize,
        vehicles: &[TrackedVehicle],
        cfg: &PlannerConfig,
    ) -> Self {
        let views = vehicles
            .iter()
            .map(|v| {
                let speed = v.speed();
                let projected_s = v.s + prev_len as f64 * cfg.time_step * speed;
                VehicleView {
                    id: v.id,
                    speed,
                    projected_s,
                    gap: rear_adjusted(projected_s - ego_s),
                    in_ego_lane: in_lane(v.d, lane),
                    in_left_lane: in_left_lane(v.d, lane),
                }
            })
            .collect();
        Self { ego_s, lane, vehicles: views }
    }
}

/// Vehicles behind count double: a negative gap g becomes -2g.
fn rear_adjusted(gap: f64) -> f64 {
    if gap < 0.0 {
        gap * -2.0
    } else {
        gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(id: u64, vx: f64, vy: f64, s: f64, d: f64) -> TrackedVehicle {
        TrackedVehicle { id, x: 0.0, y: 0.0, vx, vy, s, d }
    }

    #[test]
    fn test_rear_gap_magnification() {
        assert_eq!(rear_adjusted(-10.0), 20.0);
        assert_eq!(rear_adjusted(-0.5), 1.0);
        assert_eq!(rear_adjusted(0.0), 0.0);
        assert_eq!(rear_adjusted(25.0), 25.0);
    }

    #[test]
    fn test_constant_velocity_projection() {
        let cfg = PlannerConfig::default();
        // 5 m/s straight ahead, 10 unconsumed points -> 10 * 0.02 * 5 = 1.0
        let snap = TrafficSnapshot::build(100.0, 1, 10, &[vehicle(1, 3.0, 4.0, 120.0, 6.0)], &cfg);
        let view = &snap.vehicles[0];
        assert!((view.speed - 5.0).abs() < 1e-12);
        assert!((view.projected_s - 121.0).abs() < 1e-12);
        assert!((view.gap - 21.0).abs() < 1e-12);
    }

    #[test]
    fn test_vehicle_behind_gets_magnified_gap() {
        let cfg = PlannerConfig::default();
        let snap = TrafficSnapshot::build(100.0, 1, 0, &[vehicle(1, 0.0, 0.0, 85.0, 6.0)], &cfg);
        assert!((snap.vehicles[0].gap - 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_lane_classification() {
        let cfg = PlannerConfig::default();
        let snap = TrafficSnapshot::build(
            0.0,
            1,
            0,
            &[
                vehicle(1, 0.0, 0.0, 10.0, 6.0),  // ego lane
                vehicle(2, 0.0, 0.0, 10.0, 2.0),  // lane 0
                vehicle(3, 0.0, 0.0, 10.0, 10.0), // lane 2
            ],
            &cfg,
        );
        assert!(snap.vehicles[0].in_ego_lane && !snap.vehicles[0].in_left_lane);
        assert!(!snap.vehicles[1].in_ego_lane && snap.vehicles[1].in_left_lane);
        assert!(!snap.vehicles[2].in_ego_lane && !snap.vehicles[2].in_left_lane);
    }

    #[test]
    fn test_iteration_order_preserved() {
        let cfg = PlannerConfig::default();
        let snap = TrafficSnapshot::build(
            0.0,
            1,
            0,
            &[vehicle(9, 0.0, 0.0, 25.0, 6.0), vehicle(4, 0.0, 0.0, 10.0, 6.0)],
            &cfg,
        );
        assert_eq!(snap.vehicles[0].id, 9);
        assert_eq!(snap.vehicles[1].id, 4);
    }
}
