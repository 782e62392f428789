// Error types for the runtime module

use thiserror::Error;

use super::types::Language;

/// Environment errors from code execution
///
/// Execution outcomes (timeout, non-zero exit, bad output) are reported
/// inside `ExecutionResult`, never through this type.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("runtime not available: {0}")]
    NotAvailable(Language),

    #[error("Failed to create temp file: {0}")]
    TempFile(std::io::Error),

    #[error("Failed to write code: {0}")]
    WriteCode(std::io::Error),

    #[error("Failed to spawn '{interpreter}': {source}")]
    Spawn {
        interpreter: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
