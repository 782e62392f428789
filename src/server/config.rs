// Bridge server configuration

use std::net::SocketAddr;

/// Bridge RPC server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address (default: 127.0.0.1)
    pub listen_addr: String,
    /// Listen port (default: 8080)
    pub listen_port: u16,
    /// Schema cache time-to-live in seconds (default: 300)
    pub schema_cache_ttl_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1".to_string(),
            listen_port: 8080,
            schema_cache_ttl_secs: 300,
        }
    }
}

impl ServerConfig {
    /// Returns the socket address to bind to
    pub fn bind_addr(&self) -> SocketAddr {
        format!("{}:{}", self.listen_addr, self.listen_port)
            .parse()
            .expect("Invalid bind address")
    }
}
