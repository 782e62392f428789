// Bash language runtime

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

/// Bash runtime
///
/// Input entries are exported to the child as `INPUT_<KEY>` environment
/// variables in addition to the embedded `INPUT_JSON` string. Non-string
/// values are JSON-stringified.
pub struct BashRuntime {
    config: RuntimeConfig,
    bash_path: PathBuf,
}

impl BashRuntime {
    pub fn new(config: RuntimeConfig) -> Self {
        let bash_path = which::which("bash").unwrap_or_else(|_| PathBuf::from("/bin/bash"));
        Self { config, bash_path }
    }
}

#[async_trait]
impl CodeRuntime for BashRuntime {
    fn language(&self) -> Language {
        Language::Bash
    }

    fn is_available(&self) -> bool {
        which::which(&self.bash_path).is_ok()
    }

    async fn execute(&self, code: &str, input: &Map<String, Value>) -> Result<ExecutionResult> {
        let start = Instant::now();

        let source = inject::wrap_bash(code, input);
        let file = process::write_source(&self.config.work_dir, ".sh", &source)?;

        debug!(
            language = %self.language(),
            file = %file.path().display(),
            "executing code"
        );

        let mut cmd = Command::new(&self.bash_path);
        cmd.arg(file.path())
            .current_dir(&self.config.work_dir)
            .envs(&self.config.env);

        for (key, value) in input {
            let name = format!("INPUT_{}", key.to_uppercase());
            match value {
                Value::String(s) => cmd.env(name, s),
                other => cmd.env(name, other.to_string()),
            };
        }

        let outcome = process::run_bounded(cmd, self.config.timeout(), self.config.max_output_bytes)
            .await
            .map_err(|e| RuntimeError::Spawn {
                interpreter: self.bash_path.display().to_string(),
                source: e,
            })?;

        // Shell output is rarely structured; keep it as raw text.
        Ok(process::classify(
            outcome,
            start.elapsed().as_millis() as u64,
            false,
        ))
    }
}
