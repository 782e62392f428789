// Bridge module - host-side tool dispatch (single, batch, parallel, chain)

pub mod chain;
pub mod dispatch;
pub mod types;

pub use chain::ToolChain;
pub use dispatch::ToolBridge;
pub use types::{BatchCallResult, CallToolInput, CallToolResult, ChainResult, ChainStep};
