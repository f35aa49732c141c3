//! Configuration management.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::uniprot::UNIPROT_BASE_URL;
use crate::utils::{RetryPolicy, DEFAULT_RETRY_STATUSES, DEFAULT_TIMEOUT_SECS};

/// Application configuration
///
/// Constructed once at process start and passed by reference to whichever
/// component needs it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// UniProt API settings
    #[serde(default)]
    pub uniprot: UniProtConfig,

    /// Retry settings
    #[serde(default)]
    pub retry: RetryConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// UniProt API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniProtConfig {
    /// Base URL for the UniProtKB REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default page size for searches
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Request timeout, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UniProtConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    UNIPROT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    500
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Retry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first request)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay for exponential backoff, in milliseconds
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,

    /// HTTP statuses that trigger a retry
    #[serde(default = "default_retry_statuses")]
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
            retry_statuses: default_retry_statuses(),
        }
    }
}

impl RetryConfig {
    /// Convert into the runtime retry policy
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff_base: Duration::from_millis(self.backoff_base_ms),
            retry_statuses: self.retry_statuses.clone(),
        }
    }
}

fn default_max_attempts() -> u32 {
    5
}

fn default_backoff_base_ms() -> u64 {
    250
}

fn default_retry_statuses() -> Vec<u16> {
    DEFAULT_RETRY_STATUSES.to_vec()
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to for HTTP/SSE mode
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for HTTP/SSE mode
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Load configuration from a file, with environment variable overrides
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("UNIPROT_MCP").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Locate a config file in the default locations
///
/// Probes `./uniprot-mcp.toml`, then the user config directory.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("uniprot-mcp.toml");
    if local.is_file() {
        return Some(local);
    }

    let user = dirs::config_dir()?.join("uniprot-mcp").join("config.toml");
    if user.is_file() {
        return Some(user);
    }

    None
}

/// Get the default configuration
pub fn get_config() -> Config {
    Config::default()
}
