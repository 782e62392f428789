// Data types for the bridge module

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single tool invocation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolInput {
    pub name: String,
    #[serde(default)]
    pub input: Map<String, Value>,
}

impl CallToolInput {
    pub fn new(name: impl Into<String>, input: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            input,
        }
    }
}

/// Outcome of a single tool invocation
///
/// `result` is present only on success, `error` only on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolResult {
    pub name: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CallToolResult {
    pub fn success(name: impl Into<String>, result: Value) -> Self {
        Self {
            name: name.into(),
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Aggregated outcome of a batch or parallel invocation
#[derive(Debug, Clone, Serialize)]
pub struct BatchCallResult {
    pub results: Vec<CallToolResult>,
    pub succeeded: usize,
    pub failed: usize,
}

/// Maps the previous step's result into the next step's input
pub type InputMapper = Box<dyn Fn(&Value) -> Map<String, Value> + Send + Sync>;

/// One step of a tool chain
pub struct ChainStep {
    pub name: String,
    pub input: Map<String, Value>,
    /// Applied to the previous step's result once one exists; the literal
    /// input is used otherwise
    pub input_mapper: Option<InputMapper>,
}

impl ChainStep {
    pub fn new(name: impl Into<String>, input: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            input,
            input_mapper: None,
        }
    }

    /// A step whose input is derived from the previous step's result
    pub fn mapped<F>(name: impl Into<String>, mapper: F) -> Self
    where
        F: Fn(&Value) -> Map<String, Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            input: Map::new(),
            input_mapper: Some(Box::new(mapper)),
        }
    }
}

/// Outcome of a chain execution
///
/// `steps` holds exactly the steps attempted; execution stops at the first
/// failing step.
#[derive(Debug, Clone, Serialize)]
pub struct ChainResult {
    pub steps: Vec<CallToolResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_result: Option<Value>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
