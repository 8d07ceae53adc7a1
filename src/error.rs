use std::io;
use thiserror::Error;

/// Custom error type for statline
#[derive(Error, Debug)]
pub enum StatusError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Device event source error: {0}")]
    EventSource(String),

    #[error("Bus error: {0}")]
    Bus(#[from] zbus::Error),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Output pipe closed")]
    BrokenPipe,

    #[error("Wait failed: {0}")]
    Wait(io::Error),
}

/// Result type alias for statline
pub type Result<T> = std::result::Result<T, StatusError>;

impl StatusError {
    /// Create a parse error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        StatusError::Parse(msg.into())
    }

    /// Create a source unavailable error
    pub fn source_unavailable<S: Into<String>>(msg: S) -> Self {
        StatusError::SourceUnavailable(msg.into())
    }

    pub fn event_source<S: Into<String>>(msg: S) -> Self {
        StatusError::EventSource(msg.into())
    }

    pub fn audio<S: Into<String>>(msg: S) -> Self {
        StatusError::Audio(msg.into())
    }

    /// Map an output write failure, singling out a closed pipe
    pub fn from_write(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::BrokenPipe {
            StatusError::BrokenPipe
        } else {
            StatusError::Io(err)
        }
    }

    /// Errors after which the process must exit with a non-zero status
    pub fn is_fatal(&self) -> bool {
        matches!(self, StatusError::BrokenPipe | StatusError::Wait(_))
    }
}
