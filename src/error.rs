use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the collision engine.
///
/// Degenerate physical cases (parallel motion, receding particles, zero velocity)
/// are not errors; predictions report them as an infinite time instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid particle or configuration parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// The initial particle set is not a legal starting state (overlap, out of the box).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Geometric degeneracy that leaves a collision response undefined.
    #[error("numerical error: {0}")]
    MathError(String),

    /// The scheduler ran dry while the simulation was still running.
    #[error("simulation stalled at t={time}: no pending events")]
    SimulationStalled { time: f64 },

    /// An operation was called in the wrong lifecycle state.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Propagated I/O errors (configuration files).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::InvalidParam("radius must be > 0".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("invalid parameter"));
        assert!(msg.contains("radius"));
    }

    #[test]
    fn stalled_reports_time() {
        let e = Error::SimulationStalled { time: 1.5 };
        assert!(e.to_string().contains("t=1.5"));
    }

    #[test]
    fn json_errors_convert() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: Error = err.into();
        assert!(matches!(e, Error::Json(_)));
    }
}
