// Error types for the server module

use thiserror::Error;

/// Bridge server errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind TCP listener: {0}")]
    BindFailed(String),

    #[error("Server error: {0}")]
    Serve(String),

    #[error("Server not running")]
    NotRunning,

    #[error("Shutdown deadline exceeded")]
    ShutdownTimeout,
}

pub type Result<T> = std::result::Result<T, ServerError>;
