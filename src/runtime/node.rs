// Node.js language runtime

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

use super::config::RuntimeConfig;
use super::error::{Result, RuntimeError};
use super::types::{ExecutionResult, Language};
use super::{CodeRuntime, inject, process};

/// Node.js runtime
pub struct NodeRuntime {
    config: RuntimeConfig,
    node_path: PathBuf,
}

impl NodeRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        let node_path = which::which("node").unwrap_or_else(|_| PathBuf::from("node"));
        Self { config, node_path }
    }
}

#[async_trait]
impl CodeRuntime for NodeRuntime {
    fn language(&self) -> Language {
        Language::NodeJs
    }

    fn is_available(&self) -> bool {
        which::which(&self.node_path).is_ok()
    }

    async fn execute(&self, code: &str, input: &Map<String, Value>) -> Result<ExecutionResult> {
        let start = Instant::now();

        let source = inject::wrap_node(code, input);
        let file = process::write_source(&self.config.work_dir, ".js", &source)?;

        debug!(
            language = %self.language(),
            file = %file.path().display(),
            "executing code"
        );

        let mut cmd = Command::new(&self.node_path);
        cmd.arg(file.path())
            .current_dir(&self.config.work_dir)
            .envs(&self.config.env);

        let outcome = process::run_bounded(cmd, self.config.timeout(), self.config.max_output_bytes)
            .await
            .map_err(|e| RuntimeError::Spawn {
                interpreter: self.node_path.display().to_string(),
                source: e,
            })?;

        Ok(process::classify(
            outcome,
            start.elapsed().as_millis() as u64,
            true,
        ))
    }
}
