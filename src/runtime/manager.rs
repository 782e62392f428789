// Runtime manager - dispatches execution by language tag

use serde_json::{Map, Value};
use tracing::{debug, info};

use super::bash::BashRuntime;
use super::config::RuntimeConfig;
use super::error::{Result, RuntimeError};
use super::node::NodeRuntime;
use super::python::PythonRuntime;
use super::types::{ExecutionResult, Language};
use super::CodeRuntime;

/// Owns one runtime per supported language for the process lifetime
pub struct RuntimeManager {
    python: PythonRuntime,
    node: NodeRuntime,
    bash: BashRuntime,
}

impl RuntimeManager {
    pub fn new(config: RuntimeConfig) -> Self {
        debug!(
            timeout_secs = config.timeout_secs,
            max_output_bytes = config.max_output_bytes,
            work_dir = %config.work_dir.display(),
            "initializing runtime manager"
        );

        let manager = Self {
            python: PythonRuntime::new(config.clone()),
            node: NodeRuntime::new(config.clone()),
            bash: BashRuntime::new(config),
        };

        info!(
            languages = ?manager.available_languages(),
            "runtime manager initialized"
        );
        manager
    }

    fn runtime(&self, lang: Language) -> &dyn CodeRuntime {
        match lang {
            Language::Python => &self.python,
            Language::NodeJs => &self.node,
            Language::Bash => &self.bash,
        }
    }

    /// Execute code under the runtime for the given language
    ///
    /// Fails fast when the interpreter is not installed on this host;
    /// execution outcomes are reported inside the returned result.
    pub async fn execute(
        &self,
        lang: Language,
        code: &str,
        input: &Map<String, Value>,
    ) -> Result<ExecutionResult> {
        let runtime = self.runtime(lang);
        if !runtime.is_available() {
            return Err(RuntimeError::NotAvailable(lang));
        }

        debug!(language = %lang, code_len = code.len(), "dispatching execution");
        runtime.execute(code, input).await
    }

    /// Languages with a working interpreter on this host
    pub fn available_languages(&self) -> Vec<Language> {
        [Language::Python, Language::NodeJs, Language::Bash]
            .into_iter()
            .filter(|lang| self.runtime(*lang).is_available())
            .collect()
    }

    /// Set the tool names callable from sandboxed Python code
    pub fn set_python_tools(&mut self, tools: Vec<String>) {
        self.python.set_tools(tools);
    }

    /// Set the bridge server base URL for sandboxed Python code
    pub fn set_python_bridge_url(&mut self, url: impl Into<String>) {
        self.python.set_bridge_url(url);
    }
}
