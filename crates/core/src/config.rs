//! Client configuration
//!
//! Endpoint and tuning knobs resolve in precedence order: explicit value,
//! then the `AIS_ENDPOINT` environment variable, then the TOML config file
//! under the user config directory, then built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Environment variable naming the cluster endpoint
pub const ENV_ENDPOINT: &str = "AIS_ENDPOINT";

/// Environment variable overriding the config directory
pub const ENV_CONFIG_DIR: &str = "AISC_CONFIG_DIR";

/// Endpoint used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

const CONFIG_FILE: &str = "config.toml";

/// Retry tuning for transient failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10_000,
        }
    }
}

/// Tuning for the xaction polling loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Delay before the second poll; doubles up to `max_interval_ms`
    pub initial_interval_ms: u64,
    pub max_interval_ms: u64,
    /// Consecutive transient transport failures tolerated while polling.
    /// Separate from the overall wait deadline.
    pub failure_budget: u32,
    /// Wait deadline applied when the caller does not pass one
    pub default_timeout_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: 200,
            max_interval_ms: 2_000,
            failure_budget: 5,
            default_timeout_secs: 300,
        }
    }
}

impl PollConfig {
    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }
}

/// Configuration for one cluster client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub retry: RetryConfig,
    pub poll: PollConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 60,
            retry: RetryConfig::default(),
            poll: PollConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Resolve configuration from the config file and environment.
    ///
    /// A missing config file is not an error; `AIS_ENDPOINT` wins over the
    /// file's endpoint when both are set.
    pub fn load() -> Result<Self> {
        let mut config = ConfigManager::new()?.load()?;
        if let Ok(endpoint) = std::env::var(ENV_ENDPOINT)
            && !endpoint.is_empty()
        {
            config.endpoint = endpoint;
        }
        Ok(config)
    }

    /// Validated endpoint URL
    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| Error::Config(format!("invalid endpoint '{}': {e}", self.endpoint)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "endpoint '{}' must be http or https",
                self.endpoint
            )));
        }
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Loads and saves the client config file
#[derive(Debug, Clone)]
pub struct ConfigManager {
    dir: PathBuf,
}

impl ConfigManager {
    /// Config directory: `$AISC_CONFIG_DIR`, else `<user config dir>/aisc`
    pub fn new() -> Result<Self> {
        if let Ok(dir) = std::env::var(ENV_CONFIG_DIR)
            && !dir.is_empty()
        {
            return Ok(Self { dir: dir.into() });
        }
        let base = dirs::config_dir()
            .ok_or_else(|| Error::Config("cannot determine config directory".to_string()))?;
        Ok(Self {
            dir: base.join("aisc"),
        })
    }

    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    /// Load the config file, falling back to defaults when it does not exist
    pub fn load(&self) -> Result<ClientConfig> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(ClientConfig::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("cannot parse {}: {e}", path.display())))
    }

    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let raw = toml::to_string_pretty(config)
            .map_err(|e| Error::Config(format!("cannot serialize config: {e}")))?;
        std::fs::write(self.config_path(), raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.poll.initial_interval(), Duration::from_millis(200));
        assert_eq!(config.poll.default_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_endpoint_url_validation() {
        assert!(ClientConfig::new("http://10.0.0.5:51080").endpoint_url().is_ok());
        assert!(ClientConfig::new("not a url").endpoint_url().is_err());
        assert!(matches!(
            ClientConfig::new("ftp://host:21").endpoint_url(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file_yields_default() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(dir.path());
        let config = manager.load().unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(dir.path());

        let mut config = ClientConfig::new("http://cluster:8080");
        config.poll.failure_budget = 9;
        manager.save(&config).unwrap();

        let loaded = manager.load().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "endpoint = \"http://cluster:8080\"\n",
        )
        .unwrap();

        let loaded = ConfigManager::with_dir(dir.path()).load().unwrap();
        assert_eq!(loaded.endpoint, "http://cluster:8080");
        assert_eq!(loaded.retry, RetryConfig::default());
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "endpoint = [1, 2]").unwrap();
        assert!(matches!(
            ConfigManager::with_dir(dir.path()).load(),
            Err(Error::Config(_))
        ));
    }
}
