//! Error types for jukebox-remote

use thiserror::Error;

/// Coarse classification of failures, used to decide how they surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Network errors
    TransportError,

    // Remote said no
    ApplicationError,

    // User errors
    NoSelection,
    InvalidConfig,

    // System errors
    FileError,
    SpawnError,
}

/// Main error type for jukebox-remote
#[derive(Error, Debug)]
pub enum JukeboxError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("{0}")]
    Rejected(String),

    #[error("No selection made")]
    NoSelection,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("File error: {0}")]
    File(#[from] std::io::Error),

    #[error("Failed to spawn process: {0}")]
    Spawn(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl JukeboxError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Network(_) => ErrorCode::TransportError,
            Self::MalformedResponse { .. } => ErrorCode::TransportError,
            Self::Rejected(_) => ErrorCode::ApplicationError,
            Self::NoSelection => ErrorCode::NoSelection,
            Self::InvalidConfig(_) => ErrorCode::InvalidConfig,
            Self::File(_) => ErrorCode::FileError,
            Self::Spawn(_) => ErrorCode::SpawnError,
            Self::Http(_) => ErrorCode::TransportError,
            Self::Json(_) => ErrorCode::TransportError,
        }
    }

    /// True when the call never produced a usable answer from the remote
    pub fn is_transport(&self) -> bool {
        self.code() == ErrorCode::TransportError
    }
}

pub type Result<T> = std::result::Result<T, JukeboxError>;
