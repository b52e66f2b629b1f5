//! Configuration model loaded from external sources.

use serde::Deserialize;

fn default_pool_size() -> u32 {
    10
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// Maximum number of pooled database connections.
    #[serde(default = "default_pool_size")]
    pub database_pool_size: u32,
}
