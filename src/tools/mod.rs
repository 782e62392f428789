// Tools module - host-defined tool abstraction and registry

pub mod builtin;
pub mod error;
pub mod registry;

pub use error::{Result, ToolError};
pub use registry::Registry;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Per-call services and ambient state handed to tools by the host
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    pub services: HashMap<String, Value>,
}

/// A host-defined tool callable through the bridge
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// JSON schema of the accepted input
    fn input_schema(&self) -> Value;

    /// Run the tool with a key-unique input map
    async fn execute(&self, input: Map<String, Value>, tcx: &ToolContext) -> Result<Value>;
}
