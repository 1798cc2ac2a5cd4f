// src/error.rs
//! Error types for track loading and timelapse playback

pub type Result<T> = std::result::Result<T, TimelapseError>;

#[derive(Debug, thiserror::Error)]
pub enum TimelapseError {
    /// A track is empty or its timestamps go backwards.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A playback parameter is out of range (e.g. a non-positive speed).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The run was stopped while a segmenter was waiting.
    #[error("Playback stopped before completion")]
    SuspensionAborted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GPX error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Error: {0}")]
    Other(String),
}

impl TimelapseError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        TimelapseError::InvalidInput(msg.into())
    }

    /// True when the run ended because it was cancelled rather than failed.
    pub fn is_aborted(&self) -> bool {
        matches!(self, TimelapseError::SuspensionAborted)
    }
}

impl From<anyhow::Error> for TimelapseError {
    fn from(error: anyhow::Error) -> Self {
        TimelapseError::Other(error.to_string())
    }
}
