//! Behavior planner: lane choice and target speed
//!
//! Consumes the traffic snapshot and produces one decision per cycle. The
//! threat scan keeps the first in-lane vehicle that is ahead and within the
//! threat gap; later, closer vehicles in iteration order do not override it.

use ordered_float::OrderedFloat;

use crate::planning::snapshot::TrafficSnapshot;
use crate::planning::PlannerConfig;
use crate::road::LANE_COUNT;

/// Outcome of one planning cycle: the lane to occupy and the updated
/// reference speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub lane: usize,
    pub reference_speed: f64,
}

pub struct BehaviorPlanner {
    cfg: PlannerConfig,
}

impl BehaviorPlanner {
    pub fn new(cfg: PlannerConfig) -> Self {
        Self { cfg }
    }

    /// Decide lane and reference speed for this cycle.
    ///
    /// `measured_speed` is the ego speed reported by localization; the
    /// reference speed is re-blended from it every cycle, toward cruise
    /// speed on a free road and toward the threat-derived target otherwise.
    pub fn decide(&self, snapshot: &TrafficSnapshot, measured_speed: f64) -> Decision {
        let threat = self.first_threat(snapshot);
        let (left_gap, right_gap) = self.adjacent_gaps(snapshot);

        match threat {
            Some(target) => Decision {
                lane: self.resolve_lane(snapshot.lane, left_gap, right_gap),
                reference_speed: self.blend_speed(measured_speed, target),
            },
            None => Decision {
                lane: snapshot.lane,
                reference_speed: self.blend_speed(measured_speed, self.cfg.cruise_speed),
            },
        }
    }

    /// First-order blend toward the target: the fixed point is the target
    /// itself, approached at 10% per cycle.
    pub fn blend_speed(&self, current: f64, target: f64) -> f64 {
        current * (1.0 - self.cfg.speed_blend) + target * self.cfg.speed_blend
    }

    /// Target speed derived from the first vehicle ahead in the ego lane
    /// within the threat gap, converted to display units minus a safety
    /// margin. None when the lane ahead is free.
    ///
    /// The raw projected position is compared here, not the
    /// direction-corrected gap: a vehicle behind the ego is never a threat
    /// no matter how close.
    fn first_threat(&self, snapshot: &TrafficSnapshot) -> Option<f64> {
        let ego_s = snapshot.ego_s;
        snapshot
            .vehicles
            .iter()
            .find(|v| {
                v.in_ego_lane
                    && v.projected_s > ego_s
                    && v.projected_s - ego_s < self.cfg.threat_gap
            })
            .map(|v| v.speed * self.cfg.mph_per_mps - self.cfg.speed_margin)
    }

    /// Smallest gap on each side, clamped at the detection-range sentinel.
    /// A side the ego cannot move into keeps the sentinel.
    fn adjacent_gaps(&self, snapshot: &TrafficSnapshot) -> (f64, f64) {
        let max_range = self.cfg.detection_range;
        let left = snapshot
            .vehicles
            .iter()
            .filter(|v| snapshot.lane > 0 && v.in_left_lane)
            .map(|v| OrderedFloat(v.gap))
            .min()
            .map_or(max_range, |g| g.into_inner().min(max_range));
        // the far side has no membership test of its own: any vehicle that
        // is in neither the ego lane nor the inner lane bounds it
        let right = snapshot
            .vehicles
            .iter()
            .filter(|v| snapshot.lane < LANE_COUNT - 1 && !v.in_ego_lane && !v.in_left_lane)
            .map(|v| OrderedFloat(v.gap))
            .min()
            .map_or(max_range, |g| g.into_inner().min(max_range));
        (left, right)
    }

    /// Lane-change policy, applied only when a threat exists.
    ///
    /// A change is considered only when one of the adjacent gaps is known,
    /// finite and comfortably sized (strictly between the pass gap and the
    /// sentinel). Preference order: a completely unbounded side wins,
    /// otherwise the side with more room. Every move is a single step and a
    /// move whose boundary lane is already occupied is dropped, not
    /// redirected.
    fn resolve_lane(&self, lane: usize, left_gap: f64, right_gap: f64) -> usize {
        let max_range = self.cfg.detection_range;
        let open = |gap: f64| self.cfg.pass_gap < gap && gap < max_range;
        if !open(left_gap) && !open(right_gap) {
            return lane;
        }

        if right_gap == max_range {
            if lane != 0 {
                lane - 1
            } else {
                lane
            }
        } else if left_gap == max_range {
            if lane != LANE_COUNT - 1 {
                lane + 1
            } else {
                lane
            }
        } else if left_gap > right_gap {
            if lane != LANE_COUNT - 1 {
                lane + 1
            } else {
                lane
            }
        } else if lane != 0 {
            lane - 1
        } else {
            lane
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::TrackedVehicle;

    fn planner() -> BehaviorPlanner {
        BehaviorPlanner::new(PlannerConfig::default())
    }

    fn vehicle(vx: f64, s: f64, d: f64) -> TrackedVehicle {
        TrackedVehicle { id: 0, x: 0.0, y: 0.0, vx, vy: 0.0, s, d }
    }

    fn snapshot(lane: usize, vehicles: &[TrackedVehicle]) -> TrafficSnapshot {
        TrafficSnapshot::build(0.0, lane, 0, vehicles, &PlannerConfig::default())
    }

    #[test]
    fn test_free_road_blends_toward_cruise() {
        let planner = planner();
        let decision = planner.decide(&snapshot(1, &[]), 20.0);
        assert_eq!(decision.lane, 1);
        assert!((decision.reference_speed - (20.0 * 0.9 + 49.5 * 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_blend_converges_monotonically_to_target() {
        let planner = planner();
        let target = 49.5;
        let mut speed = 0.0;
        let mut last_err = target - speed;
        for _ in 0..200 {
            speed = planner.blend_speed(speed, target);
            let err = target - speed;
            assert!(err >= 0.0 && err <= last_err);
            last_err = err;
        }
        assert!(last_err < 1e-6);
    }

    #[test]
    fn test_vehicle_beyond_threat_gap_is_no_threat() {
        let planner = planner();
        let decision = planner.decide(&snapshot(1, &[vehicle(10.0, 30.0, 6.0)]), 40.0);
        // gap of exactly 30 is outside the threat range
        assert_eq!(decision.lane, 1);
        assert!((decision.reference_speed - (40.0 * 0.9 + 49.5 * 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_threat_sets_target_from_vehicle_speed() {
        let planner = planner();
        let decision = planner.decide(&snapshot(1, &[vehicle(10.0, 20.0, 6.0)]), 40.0);
        let target = 10.0 * 2.24 - 10.0;
        assert!((decision.reference_speed - (40.0 * 0.9 + target * 0.1)).abs() < 1e-12);
        // no adjacent gap qualifies, so the lane is held
        assert_eq!(decision.lane, 1);
    }

    #[test]
    fn test_first_match_wins_over_closer_threat() {
        // two vehicles ahead in-lane; the first in iteration order sets the
        // target even though the second is closer
        let planner = planner();
        let first = vehicle(10.0, 25.0, 6.0);
        let closer = vehicle(4.0, 10.0, 6.0);
        let decision = planner.decide(&snapshot(1, &[first, closer]), 40.0);
        let target = 10.0 * 2.24 - 10.0;
        assert!((decision.reference_speed - (40.0 * 0.9 + target * 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_vehicle_behind_is_not_a_threat() {
        let planner = planner();
        let decision = planner.decide(&snapshot(1, &[vehicle(10.0, -10.0, 6.0)]), 40.0);
        assert!((decision.reference_speed - (40.0 * 0.9 + 49.5 * 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_gap_gate_is_open_interval() {
        let planner = planner();
        // both bounds excluded
        assert_eq!(planner.resolve_lane(1, 35.0, 1000.0), 1);
        assert_eq!(planner.resolve_lane(1, 1000.0, 1000.0), 1);
        // just inside qualifies
        assert_ne!(planner.resolve_lane(1, 35.1, 1000.0), 1);
    }

    #[test]
    fn test_unbounded_far_side_wins() {
        let planner = planner();
        assert_eq!(planner.resolve_lane(1, 50.0, 1000.0), 0);
        // clamped at the boundary lane
        assert_eq!(planner.resolve_lane(0, 36.0, 1000.0), 0);
    }

    #[test]
    fn test_unbounded_near_side_moves_out() {
        let planner = planner();
        assert_eq!(planner.resolve_lane(1, 1000.0, 50.0), 2);
        assert_eq!(planner.resolve_lane(2, 1000.0, 50.0), 2);
    }

    #[test]
    fn test_larger_gap_wins_when_both_bounded() {
        let planner = planner();
        assert_eq!(planner.resolve_lane(1, 50.0, 20.0), 2);
        assert_eq!(planner.resolve_lane(1, 40.0, 60.0), 0);
        // clamped at the boundary lanes
        assert_eq!(planner.resolve_lane(2, 50.0, 20.0), 2);
        assert_eq!(planner.resolve_lane(0, 40.0, 60.0), 0);
    }

    #[test]
    fn test_adjacent_gap_minima() {
        let planner = planner();
        let snap = snapshot(
            1,
            &[
                vehicle(0.0, 80.0, 2.0),  // lane 0, gap 80
                vehicle(0.0, 45.0, 2.0),  // lane 0, gap 45
                vehicle(0.0, 60.0, 10.0), // lane 2, gap 60
            ],
        );
        let (left, right) = planner.adjacent_gaps(&snap);
        assert!((left - 45.0).abs() < 1e-12);
        assert!((right - 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_adjacent_gaps_keep_sentinel_when_sides_are_empty() {
        let planner = planner();
        let (left, right) = planner.adjacent_gaps(&snapshot(1, &[vehicle(0.0, 20.0, 6.0)]));
        assert_eq!(left, 1000.0);
        assert_eq!(right, 1000.0);
    }

    #[test]
    fn test_far_rear_vehicle_cannot_shrink_sentinel() {
        let planner = planner();
        // 600 behind in lane 0 doubles to a 1200 gap, beyond the sentinel
        let (left, _) = planner.adjacent_gaps(&snapshot(1, &[vehicle(0.0, -600.0, 2.0)]));
        assert_eq!(left, 1000.0);
    }

    #[test]
    fn test_boundary_lanes_keep_sentinels() {
        let planner = planner();
        // in lane 0 there is no inner side; in lane 2 there is no outer side
        let (left, _) = planner.adjacent_gaps(&snapshot(0, &[vehicle(0.0, 50.0, 2.0)]));
        assert_eq!(left, 1000.0);
        let (_, right) = planner.adjacent_gaps(&snapshot(2, &[vehicle(0.0, 50.0, 2.0)]));
        assert_eq!(right, 1000.0);
    }
}
