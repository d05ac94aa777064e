//! Error types for simulation setup and collision handling.

use thiserror::Error;

use crate::sim::SimPhase;

/// Errors that can occur while configuring, populating, or stepping a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// Body mass must be finite and strictly positive.
    #[error("Invalid body: mass {mass} must be finite and > 0")]
    InvalidBody { mass: f64 },

    /// The spawner ran out of attempts to find a free spot.
    #[error(
        "Placement exhausted after {attempts} attempts ({placed} of {requested} bodies placed)"
    )]
    PlacementExhausted {
        attempts: u32,
        placed: usize,
        requested: u32,
    },

    /// Configuration values that cannot produce a valid simulation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Lifecycle operation attempted in the wrong phase.
    #[error("Invalid phase: expected {expected:?}, found {actual:?}")]
    InvalidPhase { expected: SimPhase, actual: SimPhase },

    /// Reading or writing a config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config JSON could not be parsed or produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for simulation operations.
pub type SimResult<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimError::InvalidBody { mass: -2.0 };
        assert!(format!("{err}").contains("-2"));

        let err = SimError::PlacementExhausted {
            attempts: 50,
            placed: 3,
            requested: 20,
        };
        let msg = format!("{err}");
        assert!(msg.contains("50 attempts"));
        assert!(msg.contains("3 of 20"));

        let err = SimError::InvalidPhase {
            expected: SimPhase::Running,
            actual: SimPhase::Terminated,
        };
        assert!(format!("{err}").contains("Terminated"));
    }
}
