//! Highway waypoint map and Frenet -> Cartesian conversion
//!
//! The map is a whitespace-delimited table of waypoints, one `x y s dx dy`
//! row per line, loaded once at startup. A process without a usable map
//! cannot plan, so loader failures are fatal.

use std::f64::consts::FRAC_PI_2;
use std::fs;
use std::path::Path;

use itertools::Itertools;

use crate::common::{FrenetProjector, PlannerError, PlannerResult, Point2D};

/// The s value at which the track wraps back to 0.
pub const TRACK_LENGTH: f64 = 6945.554;

/// Precomputed waypoint table for one highway loop.
///
/// The normal columns (dx, dy) of the table are validated but not stored;
/// the projection derives the lateral direction from the segment heading.
#[derive(Debug, Clone)]
pub struct HighwayMap {
    x: Vec<f64>,
    y: Vec<f64>,
    s: Vec<f64>,
    track_length: f64,
}

impl HighwayMap {
    pub fn from_file<P: AsRef<Path>>(path: P) -> PlannerResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_str(&text)
    }

    pub fn from_str(text: &str) -> PlannerResult<Self> {
        Self::with_track_length(text, TRACK_LENGTH)
    }

    pub fn with_track_length(text: &str, track_length: f64) -> PlannerResult<Self> {
        let mut x = Vec::new();
        let mut y = Vec::new();
        let mut s = Vec::new();

        for (lineno, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<f64> = line
                .split_whitespace()
                .map(|f| {
                    f.parse::<f64>().map_err(|_| {
                        PlannerError::Map(format!("line {}: bad field '{}'", lineno + 1, f))
                    })
                })
                .collect::<PlannerResult<_>>()?;
            if fields.len() != 5 {
                return Err(PlannerError::Map(format!(
                    "line {}: expected 5 fields, got {}",
                    lineno + 1,
                    fields.len()
                )));
            }
            x.push(fields[0]);
            y.push(fields[1]);
            s.push(fields[2]);
        }

        if x.len() < 2 {
            return Err(PlannerError::Map(format!(
                "need at least 2 waypoints, got {}",
                x.len()
            )));
        }
        if !s.iter().tuple_windows().all(|(a, b)| a < b) {
            return Err(PlannerError::Map(
                "waypoint s values must be strictly increasing".to_string(),
            ));
        }

        Ok(Self { x, y, s, track_length })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn track_length(&self) -> f64 {
        self.track_length
    }

    /// Index of the waypoint at or before the (wrapped) s position.
    fn bracketing_waypoint(&self, s: f64) -> usize {
        let idx = self.s.partition_point(|&si| si <= s);
        if idx == 0 {
            self.len() - 1
        } else {
            idx - 1
        }
    }
}

impl FrenetProjector for HighwayMap {
    /// Project (s, d) onto the segment between the bracketing waypoints.
    ///
    /// `d` is measured along the right-hand normal of the segment heading,
    /// so positive d lies to the driving side of the centerline.
    fn to_cartesian(&self, s: f64, d: f64) -> Point2D {
        let s = s.rem_euclid(self.track_length);
        let prev = self.bracketing_waypoint(s);
        let next = (prev + 1) % self.len();

        let heading = (self.y[next] - self.y[prev]).atan2(self.x[next] - self.x[prev]);
        let seg_s = s - self.s[prev];
        let seg_x = self.x[prev] + seg_s * heading.cos();
        let seg_y = self.y[prev] + seg_s * heading.sin();

        let normal = heading - FRAC_PI_2;
        Point2D::new(seg_x + d * normal.cos(), seg_y + d * normal.sin())
    }
}
