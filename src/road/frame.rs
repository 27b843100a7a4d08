//! Lane/offset coordinate convention
//!
//! Lanes are indexed 0..3 from the road centerline outward. Each lane is
//! 4 units wide, so lane L is centered at lateral offset 2 + 4*L.

use std::f64::consts::PI;

/// Lane width in map units.
pub const LANE_WIDTH: f64 = 4.0;

/// Number of lanes per direction. Lane indices are 0..LANE_COUNT.
pub const LANE_COUNT: usize = 3;

/// Lateral center offset of the given lane.
pub fn lane_center(lane: usize) -> f64 {
    LANE_WIDTH / 2.0 + LANE_WIDTH * lane as f64
}

/// True if a vehicle at lateral offset `d` is inside lane `lane`.
///
/// The bounds are strict: a vehicle sitting exactly on a lane line belongs
/// to neither adjacent lane.
pub fn in_lane(d: f64, lane: usize) -> bool {
    let center = lane_center(lane);
    d < center + LANE_WIDTH / 2.0 && d > center - LANE_WIDTH / 2.0
}

/// True if a vehicle at lateral offset `d` is in the lane adjacent to
/// `lane` on the centerline side. Always false for lane 0.
pub fn in_left_lane(d: f64, lane: usize) -> bool {
    lane > 0 && in_lane(d, lane - 1)
}

pub fn deg2rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_centers() {
        assert_eq!(lane_center(0), 2.0);
        assert_eq!(lane_center(1), 6.0);
        assert_eq!(lane_center(2), 10.0);
    }

    #[test]
    fn test_in_lane_bounds() {
        for lane in 0..LANE_COUNT {
            let center = lane_center(lane);
            assert!(in_lane(center, lane));
            assert!(in_lane(center + 1.9, lane));
            assert!(in_lane(center - 1.9, lane));
            assert!(!in_lane(center + 2.1, lane));
            assert!(!in_lane(center - 2.1, lane));
            // lane lines themselves are out, the interval is open
            assert!(!in_lane(center + 2.0, lane));
            assert!(!in_lane(center - 2.0, lane));
        }
    }

    #[test]
    fn test_in_left_lane() {
        assert!(in_left_lane(2.0, 1));
        assert!(in_left_lane(6.0, 2));
        assert!(!in_left_lane(6.0, 1));
        // lane 0 has no lane on the centerline side
        assert!(!in_left_lane(-2.0, 0));
    }

    #[test]
    fn test_deg2rad() {
        assert!((deg2rad(180.0) - PI).abs() < 1e-12);
        assert!((deg2rad(90.0) - PI / 2.0).abs() < 1e-12);
    }
}
