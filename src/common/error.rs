//! Error types for highway_planner

use thiserror::Error;

/// Main error type for the planning pipeline and its collaborators
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Behavior planning failed
    #[error("planning error: {0}")]
    Planning(String),
    /// Geometric precondition violated (e.g. non-monotonic spline anchors).
    /// Treated as a contract violation: fatal, not recoverable.
    #[error("geometry error: {0}")]
    Geometry(String),
    /// Numerical computation failed (matrix inversion, etc.)
    #[error("numerical error: {0}")]
    Numerical(String),
    /// Waypoint map missing, short, or malformed
    #[error("map error: {0}")]
    Map(String),
    /// Wire frame or payload could not be handled
    #[error("protocol error: {0}")]
    Protocol(String),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
