// Tool registry - factory lookup by name

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

use super::error::{Result, ToolError};
use super::Tool;

/// Factory building a tool instance from optional configuration
pub type ToolFactory =
    Arc<dyn Fn(Option<&serde_json::Value>) -> Result<Arc<dyn Tool>> + Send + Sync>;

/// Creates tool instances by name
///
/// The registry itself holds no instances; callers that want instance reuse
/// cache what `create` returns (the bridge does).
#[derive(Default)]
pub struct Registry {
    factories: RwLock<HashMap<String, ToolFactory>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under a tool name, replacing any existing one
    pub fn register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn(Option<&serde_json::Value>) -> Result<Arc<dyn Tool>> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(tool = %name, "registering tool factory");
        self.factories
            .write()
            .unwrap()
            .insert(name, Arc::new(factory));
    }

    /// Build a tool instance by name
    pub fn create(&self, name: &str, config: Option<&serde_json::Value>) -> Result<Arc<dyn Tool>> {
        let factory = {
            let factories = self.factories.read().unwrap();
            factories
                .get(name)
                .cloned()
                .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?
        };
        factory(config)
    }

    /// Names of every registered tool, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().unwrap().keys().cloned().collect();
        names.sort();
        names
    }
}
