// Runtime module - sandboxed execution of generated code via external
// interpreters (Python, Node.js, Bash)

pub mod bash;
pub mod config;
pub mod error;
pub mod inject;
pub mod manager;
pub mod node;
pub mod python;
mod process;
pub mod types;

pub use bash::BashRuntime;
pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use manager::RuntimeManager;
pub use node::NodeRuntime;
pub use python::PythonRuntime;
pub use types::{ExecutionResult, Language};

use async_trait::async_trait;
use serde_json::{Map, Value};

/// One external language interpreter running code as a subprocess
#[async_trait]
pub trait CodeRuntime: Send + Sync {
    /// Execute code with the given input under the configured budget
    ///
    /// Environment failures (temp file, spawn) are hard errors; everything
    /// the sandboxed program itself does wrong lands in `ExecutionResult`.
    async fn execute(&self, code: &str, input: &Map<String, Value>) -> Result<ExecutionResult>;

    /// The language this runtime executes
    fn language(&self) -> Language;

    /// Whether the interpreter is installed on this host
    fn is_available(&self) -> bool;
}
