// Runtime configuration

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration shared by all language runtimes
///
/// Immutable once constructed; every execution of a runtime instance runs
/// under the same budget.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Maximum execution time in seconds
    pub timeout_secs: u64,
    /// Working directory for temp source files and child processes
    pub work_dir: PathBuf,
    /// Environment variable overrides for child processes
    pub env: HashMap<String, String>,
    /// Maximum captured output size in bytes (stdout and stderr each)
    pub max_output_bytes: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            work_dir: std::env::temp_dir(),
            env: HashMap::new(),
            max_output_bytes: 1048576, // 1MB
        }
    }
}

impl RuntimeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
