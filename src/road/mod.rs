//! Road geometry: the lane/offset convention and the waypoint map

pub mod frame;
pub mod map;

pub use frame::{deg2rad, in_lane, in_left_lane, lane_center, LANE_COUNT, LANE_WIDTH};
pub use map::{HighwayMap, TRACK_LENGTH};
