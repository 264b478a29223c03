//! Configuration model loaded from external sources.

use serde::Deserialize;

/// Connection settings for the brokerage REST backend.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Service token used to seed the session at startup.
    #[serde(default)]
    pub token: Option<String>,
    /// Transport timeout; the list engine itself imposes none.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    pub secret: String,
    pub api: ApiConfig,
}
