// Tool chain - ordered pipeline of tool calls

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::tools::ToolContext;

use super::dispatch::ToolBridge;
use super::types::{ChainResult, ChainStep};

/// Ordered sequence of tool calls where each step may consume the previous
/// step's result
pub struct ToolChain {
    bridge: Arc<ToolBridge>,
    steps: Vec<ChainStep>,
}

impl ToolChain {
    pub fn new(bridge: Arc<ToolBridge>) -> Self {
        Self {
            bridge,
            steps: Vec::new(),
        }
    }

    /// Append a step to the chain
    pub fn add_step(mut self, step: ChainStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Run the chain strictly in order, stopping at the first failing step
    pub async fn execute(&self, tcx: &ToolContext) -> ChainResult {
        if self.steps.is_empty() {
            return ChainResult {
                steps: Vec::new(),
                final_result: None,
                success: false,
                error: Some("no steps in chain".to_string()),
            };
        }

        let mut results = Vec::with_capacity(self.steps.len());
        let mut prev_result: Option<Value> = None;

        for (idx, step) in self.steps.iter().enumerate() {
            let input = match (&step.input_mapper, &prev_result) {
                (Some(mapper), Some(prev)) => mapper(prev),
                _ => step.input.clone(),
            };

            debug!(step = idx, tool = %step.name, "executing chain step");
            let result = self.bridge.call_tool(&step.name, input, tcx).await;

            if !result.success {
                let error = result.error.clone().unwrap_or_default();
                warn!(step = idx, tool = %step.name, error = %error, "chain step failed");
                results.push(result);
                return ChainResult {
                    steps: results,
                    final_result: None,
                    success: false,
                    error: Some(format!("step {idx} ({}) failed: {error}", step.name)),
                };
            }

            prev_result = result.result.clone();
            results.push(result);
        }

        ChainResult {
            steps: results,
            final_result: prev_result,
            success: true,
            error: None,
        }
    }
}
