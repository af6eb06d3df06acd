//! Error types for stereoscope-rs.

use thiserror::Error;

/// The main error type for stereoscope-rs operations.
///
/// Pipeline stages never hand these to the host application; they are logged
/// and converted to a safe default at the stage boundary. They are returned
/// only from setup and configuration calls.
#[derive(Error, Debug)]
pub enum StereoError {
    /// No camera is assigned as the head pose / projection source.
    #[error("no camera assigned as the head pose source")]
    MissingCamera,

    /// No board reference is present in the host scene.
    #[error("board reference is missing")]
    MissingBoard,

    /// A scale factor was zero, negative, or not finite.
    #[error("invalid scale factor {0} - scale must be positive")]
    InvalidScale(f32),

    /// The tracking provider failed.
    #[error("tracking error: {0}")]
    Tracking(#[from] TrackingError),

    /// The device rejected a frame.
    #[error("submission error: {0}")]
    Submission(#[from] SubmitError),

    /// Querying the display dimensions failed.
    #[error("display query failed: {0}")]
    DisplayQuery(String),

    /// Rendering backend error.
    #[error("render error: {0}")]
    Render(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures reported by a tracking provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackingError {
    /// The device is not connected or not ready.
    #[error("tracking device unavailable")]
    Unavailable,

    /// No fresh data within the frame budget.
    #[error("no fresh tracking data within the frame budget")]
    Timeout,

    /// Device-specific failure.
    #[error("device error: {0}")]
    Device(String),
}

/// Failures reported by a device presenter when submitting a frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The device refused the frame.
    #[error("frame rejected: {0}")]
    Rejected(String),

    /// The device is not ready to accept frames.
    #[error("device not ready")]
    NotReady,

    /// One of the texture handles was null.
    #[error("invalid texture handle")]
    InvalidHandle,
}

/// A specialized Result type for stereoscope-rs operations.
pub type Result<T> = std::result::Result<T, StereoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborator_errors_convert() {
        let tracking = StereoError::from(TrackingError::Timeout);
        assert!(matches!(tracking, StereoError::Tracking(TrackingError::Timeout)));
        assert_eq!(
            tracking.to_string(),
            "tracking error: no fresh tracking data within the frame budget"
        );

        let submission = StereoError::from(SubmitError::InvalidHandle);
        assert_eq!(submission.to_string(), "submission error: invalid texture handle");
    }

    #[test]
    fn test_stage_messages() {
        assert_eq!(
            StereoError::MissingCamera.to_string(),
            "no camera assigned as the head pose source"
        );
        assert_eq!(StereoError::MissingBoard.to_string(), "board reference is missing");
    }
}
