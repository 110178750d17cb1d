//! Error types for motioncheck
//!
//! Setup errors abort a start request synchronously; per-unit errors
//! (stale references, invalid positions) are recovered inside the job.

use thiserror::Error;

/// Main error type for the motion analysis engine
#[derive(Error, Debug)]
pub enum CheckError {
    /// Timeline range or sampling stride cannot produce any frame pair
    #[error("Invalid frame range [{start}, {end}] with step {step}")]
    InvalidRange { start: i64, end: i64, step: i64 },

    /// Target resolution found no armatures
    #[error("No armatures to check")]
    NoArmatures,

    /// Target resolution found no bones after filtering
    #[error("No bones to check")]
    NoBones,

    /// A job is already running or cancelling
    #[error("An analysis is already running")]
    AlreadyRunning,

    /// Armature or bone can no longer be resolved by the host
    #[error("Stale reference: {armature}.{bone}")]
    StaleReference { armature: String, bone: String },

    /// Host returned a non-finite position
    #[error("Invalid position for {armature}.{bone} at frame {frame}")]
    InvalidPosition {
        armature: String,
        bone: String,
        frame: i64,
    },

    /// Analysis configuration out of bounds
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Job state machine transition errors
    #[error("Invalid state transition from {from} via {event}")]
    InvalidTransition { from: String, event: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors (scene dumps, reports)
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML settings errors
    #[error("Settings format error: {0}")]
    SettingsFormat(String),
}

impl CheckError {
    /// Whether the error is recovered per unit instead of aborting the job
    pub fn is_unit_error(&self) -> bool {
        matches!(
            self,
            CheckError::StaleReference { .. } | CheckError::InvalidPosition { .. }
        )
    }
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, CheckError>;

impl From<toml::de::Error> for CheckError {
    fn from(err: toml::de::Error) -> Self {
        CheckError::SettingsFormat(err.to_string())
    }
}

impl From<toml::ser::Error> for CheckError {
    fn from(err: toml::ser::Error) -> Self {
        CheckError::SettingsFormat(err.to_string())
    }
}
