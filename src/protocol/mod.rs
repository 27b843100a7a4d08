//! Wire protocol: length-prefixed textual frames carrying JSON events

pub mod frame;
pub mod telemetry;

pub use frame::{encode_frame, FrameCodec};
pub use telemetry::{classify, control_frame, manual_frame, Inbound, Telemetry};
