// Error types for the tools module

use thiserror::Error;

/// Tool resolution and invocation errors
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid input for tool '{0}': {1}")]
    InvalidInput(String, String),

    #[error("Tool '{0}' failed: {1}")]
    ExecutionFailed(String, String),

    #[error("Failed to construct tool '{0}': {1}")]
    ConstructionFailed(String, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ToolError>;
