// Python language runtime

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

/// Python runtime with optional tool-calling injection
///
/// When tool names and a bridge URL are set, generated source carries an
/// HTTP bridge client so sandboxed code can call host tools directly.
pub struct PythonRuntime {
    config: RuntimeConfig,
    python_path: PathBuf,
    tools: Vec<String>,
    bridge_url: Option<String>,
}

impl PythonRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        let python_path = which::which("python3")
            .or_else(|_| which::which("python"))
            .unwrap_or_else(|_| PathBuf::from("python3"));

        Self {
            config,
            python_path,
            tools: Vec::new(),
            bridge_url: None,
        }
    }

    /// Set the tool names callable from sandboxed code
    pub fn set_tools(&mut self, tools: Vec<String>) {
        self.tools = tools;
    }

    /// Set the bridge server base URL injected into generated code
    pub fn set_bridge_url(&mut self, url: impl Into<String>) {
        self.bridge_url = Some(url.into());
    }
}

#[async_trait]
impl CodeRuntime for PythonRuntime {
    fn language(&self) -> Language {
        Language::Python
    }

    fn is_available(&self) -> bool {
        which::which(&self.python_path).is_ok()
    }

    async fn execute(&self, code: &str, input: &Map<String, Value>) -> Result<ExecutionResult> {
        let start = Instant::now();

        let source = inject::wrap_python(code, input, &self.tools, self.bridge_url.as_deref());
        let file = process::write_source(&self.config.work_dir, ".py", &source)?;

        debug!(
            language = %self.language(),
            file = %file.path().display(),
            tools = self.tools.len(),
            "executing code"
        );

        let mut cmd = Command::new(&self.python_path);
        cmd.arg(file.path())
            .current_dir(&self.config.work_dir)
            .envs(&self.config.env);

        let outcome = process::run_bounded(cmd, self.config.timeout(), self.config.max_output_bytes)
            .await
            .map_err(|e| RuntimeError::Spawn {
                interpreter: self.python_path.display().to_string(),
                source: e,
            })?;

        Ok(process::classify(
            outcome,
            start.elapsed().as_millis() as u64,
            true,
        ))
    }
}
