//! Telemetry and control payloads
//!
//! A frame body is planner-relevant only when it starts with the `42`
//! event marker; the rest is a JSON 2-element array `[event, payload]`.
//! An empty (or null) payload means the simulator is in manual mode.

use serde::{Deserialize, Serialize};

use crate::common::{EgoState, Point2D, TrackedVehicle, Trajectory};
use crate::road::deg2rad;
use crate::session::CycleInput;

/// Marker distinguishing planner-relevant frames from transport chatter.
pub const EVENT_MARKER: &str = "42";

/// Ego localization plus environment, as received from the wire.
///
/// `yaw` is in degrees and `speed` in display units; conversion to domain
/// types happens in [`Telemetry::into_cycle_input`].
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Telemetry {
    pub x: f64,
    pub y: f64,
    pub s: f64,
    pub d: f64,
    pub yaw: f64,
    pub speed: f64,
    pub previous_path_x: Vec<f64>,
    pub previous_path_y: Vec<f64>,
    pub end_path_s: f64,
    pub end_path_d: f64,
    /// One row per nearby vehicle: id, x, y, vx, vy, s, d.
    pub sensor_fusion: Vec<[f64; 7]>,
}

impl Telemetry {
    pub fn into_cycle_input(self) -> CycleInput {
        let previous_path = self
            .previous_path_x
            .iter()
            .zip(self.previous_path_y.iter())
            .map(|(&x, &y)| Point2D::new(x, y))
            .collect();
        CycleInput {
            ego: EgoState::new(self.x, self.y, self.s, self.d, deg2rad(self.yaw), self.speed),
            previous_path,
            end_path_s: self.end_path_s,
            vehicles: self.sensor_fusion.into_iter().map(TrackedVehicle::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Control {
    next_x: Vec<f64>,
    next_y: Vec<f64>,
}

/// What an inbound frame body turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// A telemetry event: run a planning cycle and reply with control.
    Telemetry(Telemetry),
    /// Marker present but no payload: reply with the manual placeholder.
    Manual,
    /// Not for the planner (no marker, unknown event, malformed JSON).
    Ignored,
}

/// Classify one frame body.
///
/// Malformed payloads are never an error: anything that does not parse as
/// a telemetry event is simply not for us.
pub fn classify(body: &str) -> Inbound {
    let payload = match body.strip_prefix(EVENT_MARKER) {
        Some(rest) => rest.trim(),
        None => return Inbound::Ignored,
    };
    if payload.is_empty() || payload == "null" {
        return Inbound::Manual;
    }
    match serde_json::from_str::<(String, serde_json::Value)>(payload) {
        Ok((event, value)) if event == "telemetry" => {
            match serde_json::from_value::<Telemetry>(value) {
                Ok(telemetry) => Inbound::Telemetry(telemetry),
                Err(_) => Inbound::Ignored,
            }
        }
        _ => Inbound::Ignored,
    }
}

/// Encode the control reply for a finished cycle.
pub fn control_frame(trajectory: &Trajectory) -> String {
    let control = Control {
        next_x: trajectory.x_coords(),
        next_y: trajectory.y_coords(),
    };
    // serializing a (str, struct) tuple cannot fail
    let body = serde_json::to_string(&("control", control)).unwrap_or_default();
    format!("{}{}", EVENT_MARKER, body)
}

/// The no-planning placeholder reply.
pub fn manual_frame() -> String {
    format!("{}[\"manual\",{{}}]", EVENT_MARKER)
}
