//! Application configuration for SiteTriage.
//!
//! User config lives at `~/.sitetriage/sitetriage.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};
use crate::types::{MAX_CRAWL_DEPTH, MAX_RESOURCES};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "sitetriage.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".sitetriage";

/// Identifying User-Agent sent with every crawl request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; ADA Compliance Triage Scanner)";

// ---------------------------------------------------------------------------
// Config structs (matching sitetriage.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Crawl bounds and HTTP policy.
    #[serde(default)]
    pub crawl: CrawlSection,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Analytics signal source.
    #[serde(default)]
    pub analytics: AnalyticsSection,
}

/// `[crawl]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSection {
    /// Depth used when a scan request does not name one (capped at 7).
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum resources per crawl (capped at 1000).
    #[serde(default = "default_max_resources")]
    pub max_resources: usize,

    /// Concurrent page fetches.
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Delay before each fetch, in ms.
    #[serde(default)]
    pub rate_limit_ms: u64,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Redirects followed before a fetch is abandoned.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Response bodies above this size count as a failed fetch.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Permit fetching loopback/private hosts.
    #[serde(default)]
    pub allow_private_hosts: bool,
}

impl Default for CrawlSection {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_resources: default_max_resources(),
            concurrency: default_concurrency(),
            rate_limit_ms: 0,
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            max_body_bytes: default_max_body_bytes(),
            user_agent: default_user_agent(),
            allow_private_hosts: false,
        }
    }
}

fn default_max_depth() -> u32 {
    MAX_CRAWL_DEPTH
}
fn default_max_resources() -> usize {
    MAX_RESOURCES
}
fn default_concurrency() -> u32 {
    4
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_max_redirects() -> usize {
    5
}
fn default_max_body_bytes() -> u64 {
    10 * 1024 * 1024
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Wall-clock budget for one scan request.
    #[serde(default = "default_scan_budget_secs")]
    pub scan_budget_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            scan_budget_secs: default_scan_budget_secs(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    3000
}
fn default_scan_budget_secs() -> u64 {
    300
}

/// `[analytics]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSection {
    /// Provider name. Only "simulated" ships today.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Seed mixed into simulated signals.
    #[serde(default = "default_analytics_seed")]
    pub seed: String,
}

impl Default for AnalyticsSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            seed: default_analytics_seed(),
        }
    }
}

fn default_provider() -> String {
    "simulated".into()
}
fn default_analytics_seed() -> String {
    "sitetriage".into()
}

// ---------------------------------------------------------------------------
// Crawl config (runtime, merged from config + request/CLI flags)
// ---------------------------------------------------------------------------

/// Runtime crawl configuration with all caps applied.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Maximum crawl depth from the seed.
    pub max_depth: u32,
    /// Maximum discovered resources.
    pub max_resources: usize,
    /// Maximum concurrent fetches.
    pub concurrency: u32,
    /// Delay before each fetch in ms.
    pub rate_limit_ms: u64,
    pub timeout: Duration,
    pub max_redirects: usize,
    pub max_body_bytes: u64,
    pub user_agent: String,
    pub allow_private_hosts: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self::from(&CrawlSection::default())
    }
}

impl From<&CrawlSection> for CrawlConfig {
    fn from(section: &CrawlSection) -> Self {
        Self {
            max_depth: section.max_depth.min(MAX_CRAWL_DEPTH),
            max_resources: section.max_resources.min(MAX_RESOURCES),
            concurrency: section.concurrency.max(1),
            rate_limit_ms: section.rate_limit_ms,
            timeout: Duration::from_secs(section.timeout_secs),
            max_redirects: section.max_redirects,
            max_body_bytes: section.max_body_bytes,
            user_agent: section.user_agent.clone(),
            allow_private_hosts: section.allow_private_hosts,
        }
    }
}

impl From<&AppConfig> for CrawlConfig {
    fn from(config: &AppConfig) -> Self {
        Self::from(&config.crawl)
    }
}

impl CrawlConfig {
    /// Same config with a different depth, clamped to the hard cap.
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth.min(MAX_CRAWL_DEPTH);
        self
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.sitetriage/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| TriageError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.sitetriage/sitetriage.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| TriageError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| TriageError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| TriageError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| TriageError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| TriageError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
