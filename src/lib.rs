//! Sandboxed code execution and tool bridging for AI agents
//!
//! Runs dynamically generated Python, Node.js, and Bash as isolated,
//! time-bounded subprocesses, and lets that sandboxed code call back into
//! host-defined tools over a loopback HTTP bridge.

pub mod bridge;
pub mod runtime;
pub mod server;
pub mod tools;

pub use bridge::{
    BatchCallResult, CallToolInput, CallToolResult, ChainResult, ChainStep, ToolBridge, ToolChain,
};
pub use runtime::{CodeRuntime, ExecutionResult, Language, RuntimeConfig, RuntimeManager};
pub use server::{BridgeServer, ServerConfig};
pub use tools::{Registry, Tool, ToolContext, ToolError};
