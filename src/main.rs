use airlock::bridge::ToolBridge;
use airlock::runtime::{RuntimeConfig, RuntimeManager};
use airlock::server::{BridgeServer, ServerConfig};
use airlock::tools::{Registry, builtin};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{Level, info};
use tracing_subscriber::fmt;

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "airlock")]
#[command(about = "Tool bridge server for sandboxed code execution")]
struct Args {
    /// Listen address
    #[arg(long, default_value = "127.0.0.1")]
    listen_addr: String,

    /// Listen port
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Schema cache TTL in seconds
    #[arg(long, default_value = "300")]
    schema_ttl_secs: u64,

    /// Shutdown deadline in seconds
    #[arg(long, default_value = "5")]
    shutdown_secs: u64,

    /// Path to tools.toml description overrides
    #[arg(long, default_value = "tools.toml")]
    tools_toml: PathBuf,
}

/// Tokio runtime with signal handling
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    fmt()
        .with_max_level(Level::INFO)
        .with_target(true)
        .init();

    let args = Args::parse();

    info!("Starting airlock bridge server...");

    // Register tools and build the bridge
    let registry = Arc::new(Registry::new());
    builtin::register_builtins(&registry, &args.tools_toml);

    let bridge = Arc::new(ToolBridge::new(registry));
    info!(tools = ?bridge.list_available_tools(), "Tool bridge initialized");

    // Probe the host for usable interpreters
    let manager = RuntimeManager::new(RuntimeConfig::default());
    info!(languages = ?manager.available_languages(), "Runtimes probed");

    // Start the bridge server
    let config = ServerConfig {
        listen_addr: args.listen_addr,
        listen_port: args.port,
        schema_cache_ttl_secs: args.schema_ttl_secs,
    };
    let server = BridgeServer::new(bridge, config);
    let addr = server.start_async().await?;
    info!(addr = %addr, "Bridge server started");

    // Wait for Ctrl+C / SIGTERM
    signal::ctrl_c().await?;
    info!("Received shutdown signal");

    server.shutdown(Duration::from_secs(args.shutdown_secs)).await?;

    info!("Goodbye!");
    Ok(())
}
