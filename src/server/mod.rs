// Server module - HTTP bridge exposing host tools to sandboxed code

pub mod cache;
pub mod config;
pub mod error;
pub mod routes;

pub use cache::SchemaCache;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use routes::{BridgeServer, ContextFactory};
