//! Error types for Synheart Pulse

use thiserror::Error;

/// Errors that can occur during processing
#[derive(Debug, Error)]
pub enum PulseError {
    #[error("Failed to parse sensor event: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to decode heart rate frame: {0}")]
    FrameDecodeError(String),

    #[error("Invalid sensor event: {0}")]
    InvalidEvent(String),
}
