// Builtin tools shipped with the daemon

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use super::error::{Result, ToolError};
use super::registry::Registry;
use super::{Tool, ToolContext};

/// Echo tool - returns its input map unchanged
pub struct EchoTool {
    description: String,
}

impl EchoTool {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "additionalProperties": true
        })
    }

    async fn execute(&self, input: Map<String, Value>, _tcx: &ToolContext) -> Result<Value> {
        Ok(Value::Object(input))
    }
}

/// Calculator tool input parameters
#[derive(Debug, Deserialize)]
struct CalculatorInput {
    operation: String,
    a: f64,
    b: Option<f64>,
}

/// Calculator tool - basic arithmetic over two operands
pub struct CalculatorTool {
    description: String,
}

impl CalculatorTool {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "enum": ["add", "subtract", "multiply", "divide"],
                    "description": "The arithmetic operation to perform"
                },
                "a": {
                    "type": "number",
                    "description": "The first operand"
                },
                "b": {
                    "type": "number",
                    "description": "The second operand"
                }
            },
            "required": ["operation", "a", "b"]
        })
    }

    async fn execute(&self, input: Map<String, Value>, _tcx: &ToolContext) -> Result<Value> {
        let CalculatorInput { operation, a, b } = serde_json::from_value(Value::Object(input))
            .map_err(|e| ToolError::InvalidInput("calculator".to_string(), e.to_string()))?;

        let b = b.ok_or_else(|| {
            ToolError::InvalidInput("calculator".to_string(), "missing operand 'b'".to_string())
        })?;

        let result = match operation.as_str() {
            "add" => a + b,
            "subtract" => a - b,
            "multiply" => a * b,
            "divide" => {
                if b == 0.0 {
                    return Err(ToolError::ExecutionFailed(
                        "calculator".to_string(),
                        "division by zero".to_string(),
                    ));
                }
                a / b
            }
            other => {
                return Err(ToolError::InvalidInput(
                    "calculator".to_string(),
                    format!("unknown operation: {other}"),
                ));
            }
        };

        Ok(json!({ "result": result }))
    }
}

/// Default echo tool description
fn default_echo_description() -> String {
    "Return the input object unchanged. Useful for wiring checks.".to_string()
}

/// Default calculator tool description
fn default_calculator_description() -> String {
    "Perform basic arithmetic (add, subtract, multiply, divide) on two numbers.".to_string()
}

/// Load tool descriptions from a TOML config file
pub fn load_tool_descriptions(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        debug!(path = %path.display(), "tools.toml not found, using default descriptions");
        return Ok(HashMap::new());
    }

    let content = std::fs::read_to_string(path)?;
    let config: toml::Value = content.parse()?;

    let mut descriptions = HashMap::new();

    if let Some(table) = config.as_table() {
        for (key, value) in table {
            if let Some(desc) = value.get("description") {
                if let Some(s) = desc.as_str() {
                    descriptions.insert(key.clone(), s.to_string());
                }
            }
        }
    }

    debug!(path = %path.display(), tool_count = descriptions.len(), "loaded tool descriptions");
    Ok(descriptions)
}

/// Register the builtin tools, honoring optional description overrides
pub fn register_builtins(registry: &Registry, descriptions_path: &Path) {
    let descriptions = load_tool_descriptions(descriptions_path).unwrap_or_default();

    let echo_desc = descriptions
        .get("echo")
        .cloned()
        .unwrap_or_else(default_echo_description);
    registry.register("echo", move |_config| {
        Ok(Arc::new(EchoTool::new(echo_desc.clone())) as Arc<dyn Tool>)
    });

    let calc_desc = descriptions
        .get("calculator")
        .cloned()
        .unwrap_or_else(default_calculator_description);
    registry.register("calculator", move |_config| {
        Ok(Arc::new(CalculatorTool::new(calc_desc.clone())) as Arc<dyn Tool>)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_calculator_add() {
        let calc = CalculatorTool::new(default_calculator_description());
        let mut input = Map::new();
        input.insert("operation".to_string(), json!("add"));
        input.insert("a".to_string(), json!(5));
        input.insert("b".to_string(), json!(3));

        let result = calc.execute(input, &ToolContext::default()).await.unwrap();
        assert_eq!(result["result"], 8.0);
    }

    #[tokio::test]
    async fn test_calculator_division_by_zero() {
        let calc = CalculatorTool::new(default_calculator_description());
        let mut input = Map::new();
        input.insert("operation".to_string(), json!("divide"));
        input.insert("a".to_string(), json!(10));
        input.insert("b".to_string(), json!(0));

        let result = calc.execute(input, &ToolContext::default()).await;
        assert!(result.is_err(), "division by zero should fail");
    }

    #[tokio::test]
    async fn test_echo_returns_input() {
        let echo = EchoTool::new(default_echo_description());
        let mut input = Map::new();
        input.insert("message".to_string(), json!("hello"));

        let result = echo.execute(input, &ToolContext::default()).await.unwrap();
        assert_eq!(result["message"], "hello");
    }

    #[test]
    fn test_missing_descriptions_file() {
        let descriptions =
            load_tool_descriptions(Path::new("/nonexistent/tools.toml")).unwrap();
        assert!(descriptions.is_empty());
    }
}
