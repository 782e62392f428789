// Tool bridge - resolves and invokes named tools for host-side callers

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info};

use crate::tools::{Registry, Tool, ToolContext, ToolError};

use super::types::{BatchCallResult, CallToolInput, CallToolResult};

/// Host-side tool dispatcher with lazy, cached tool instantiation
///
/// Tool-level failures never fail the outer call; every invocation path
/// returns a `CallToolResult` so batch and parallel callers always get a
/// full result set.
pub struct ToolBridge {
    registry: Arc<Registry>,
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl ToolBridge {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            tools: RwLock::new(HashMap::new()),
        }
    }

    /// Get or create a tool instance; construction runs at most once per name
    pub fn get_tool(&self, name: &str) -> Result<Arc<dyn Tool>, ToolError> {
        if let Some(tool) = self.tools.read().unwrap().get(name) {
            return Ok(tool.clone());
        }

        let mut tools = self.tools.write().unwrap();
        // Re-check under the write lock: a concurrent first use may have won.
        if let Some(tool) = tools.get(name) {
            return Ok(tool.clone());
        }

        let tool = self.registry.create(name, None)?;
        debug!(tool = %name, "tool instance created");
        tools.insert(name.to_string(), tool.clone());
        Ok(tool)
    }

    /// Invoke a single tool by name
    pub async fn call_tool(
        &self,
        name: &str,
        input: Map<String, Value>,
        tcx: &ToolContext,
    ) -> CallToolResult {
        let tool = match self.get_tool(name) {
            Ok(tool) => tool,
            Err(e) => return CallToolResult::error(name, e.to_string()),
        };

        debug!(tool = %name, "invoking tool");
        match tool.execute(input, tcx).await {
            Ok(result) => CallToolResult::success(name, result),
            Err(e) => CallToolResult::error(name, e.to_string()),
        }
    }

    /// Invoke a tool with its input given as a JSON string
    pub async fn call_tool_json(
        &self,
        name: &str,
        input_json: &str,
        tcx: &ToolContext,
    ) -> CallToolResult {
        match serde_json::from_str::<Map<String, Value>>(input_json) {
            Ok(input) => self.call_tool(name, input, tcx).await,
            Err(e) => CallToolResult::error(name, format!("invalid JSON input: {e}")),
        }
    }

    /// Invoke tools strictly in order, never stopping early
    pub async fn call_tools_batch(
        &self,
        calls: Vec<CallToolInput>,
        tcx: &ToolContext,
    ) -> BatchCallResult {
        let mut results = Vec::with_capacity(calls.len());
        let mut succeeded = 0;
        let mut failed = 0;

        for call in calls {
            let result = self.call_tool(&call.name, call.input, tcx).await;
            if result.success {
                succeeded += 1;
            } else {
                failed += 1;
            }
            results.push(result);
        }

        info!(total = results.len(), succeeded, failed, "batch call completed");
        BatchCallResult {
            results,
            succeeded,
            failed,
        }
    }

    /// Invoke tools concurrently, one task per call
    ///
    /// Waits for every task; result slots and both counters share a single
    /// mutex so the aggregate is exact regardless of completion order.
    pub async fn call_tools_parallel(
        self: Arc<Self>,
        calls: Vec<CallToolInput>,
        tcx: &ToolContext,
    ) -> BatchCallResult {
        struct Aggregate {
            results: Vec<Option<CallToolResult>>,
            succeeded: usize,
            failed: usize,
        }

        let names: Vec<String> = calls.iter().map(|c| c.name.clone()).collect();
        let aggregate = Arc::new(Mutex::new(Aggregate {
            results: vec![None; calls.len()],
            succeeded: 0,
            failed: 0,
        }));

        let mut handles = Vec::with_capacity(calls.len());
        for (idx, call) in calls.into_iter().enumerate() {
            let bridge = Arc::clone(&self);
            let tcx = tcx.clone();
            let aggregate = Arc::clone(&aggregate);
            handles.push(tokio::spawn(async move {
                let result = bridge.call_tool(&call.name, call.input, &tcx).await;
                let mut agg = aggregate.lock().unwrap();
                if result.success {
                    agg.succeeded += 1;
                } else {
                    agg.failed += 1;
                }
                agg.results[idx] = Some(result);
            }));
        }

        futures::future::join_all(handles).await;

        let mut agg = aggregate.lock().unwrap();
        for idx in 0..agg.results.len() {
            if agg.results[idx].is_none() {
                agg.failed += 1;
                agg.results[idx] = Some(CallToolResult::error(&names[idx], "call task panicked"));
            }
        }
        let results: Vec<CallToolResult> = agg
            .results
            .iter_mut()
            .map(|slot| slot.take().expect("slot filled"))
            .collect();

        info!(
            total = results.len(),
            succeeded = agg.succeeded,
            failed = agg.failed,
            "parallel call completed"
        );
        BatchCallResult {
            succeeded: agg.succeeded,
            failed: agg.failed,
            results,
        }
    }

    /// Names of every tool the registry can create
    pub fn list_available_tools(&self) -> Vec<String> {
        self.registry.list()
    }

    /// The `{name, description, input_schema}` document for a tool
    pub fn get_tool_schema(&self, name: &str) -> Result<Value, ToolError> {
        let tool = self.get_tool(name)?;
        Ok(serde_json::json!({
            "name": tool.name(),
            "description": tool.description(),
            "input_schema": tool.input_schema(),
        }))
    }
}
