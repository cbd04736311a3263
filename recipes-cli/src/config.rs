use anyhow::{Context, Result};
use fetch_engine::{CacheConfig, FetcherConfig, ProxyConfig, StoreKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::{Args, OutputFormat};

const APP_NAME: &str = "recipes-cli";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default output format
    pub default_output_format: OutputFormat,

    /// Default request timeout in seconds
    pub default_timeout: u64,

    /// Maximum concurrent photo loads
    pub max_concurrent: usize,

    /// Cache responses between runs
    pub cache_enabled: bool,

    /// Response store backing the cache
    pub store: StoreKind,

    /// Directory for the on-disk cache (system temp dir when unset)
    pub cache_dir: Option<PathBuf>,

    /// User agent string for requests
    pub user_agent: Option<String>,

    /// Enable colored output
    pub colored_output: bool,

    /// Default proxy URL (supports http, https, socks5)
    pub default_proxy: Option<String>,

    /// Default proxy username (if proxy requires authentication)
    pub default_proxy_username: Option<String>,

    /// Default proxy password (if proxy requires authentication)
    pub default_proxy_password: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_output_format: OutputFormat::Pretty,
            default_timeout: 30,
            max_concurrent: 8,
            cache_enabled: true,
            store: StoreKind::Disk,
            cache_dir: None,
            user_agent: None,
            colored_output: true,
            default_proxy: None,
            default_proxy_username: None,
            default_proxy_password: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        match config_path {
            Some(path) => {
                if path.exists() {
                    let content = std::fs::read_to_string(path)
                        .context("Failed to read configuration file")?;
                    toml::from_str(&content).context("Failed to parse configuration file")
                } else {
                    Ok(Self::default())
                }
            }
            None => confy::load(APP_NAME, None).context("Failed to load configuration"),
        }
    }

    /// Get default configuration file path
    pub fn default_config_path() -> Option<PathBuf> {
        confy::get_configuration_file_path(APP_NAME, None).ok()
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, toml_string).context("Failed to write configuration file")?;

        Ok(())
    }

    /// Reset configuration to defaults and save
    pub fn reset(config_path: Option<&Path>) -> Result<()> {
        let path = config_path
            .map(|p| p.to_path_buf())
            .or_else(Self::default_config_path)
            .context("No configuration path available")?;

        Self::default().save(&path)
    }

    /// Show current configuration as a formatted string
    pub fn show(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration for display")
    }

    /// Apply command-line flags on top of the file values
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(timeout) = args.timeout {
            self.default_timeout = timeout;
        }
        if let Some(proxy) = &args.proxy {
            self.default_proxy = Some(proxy.clone());
        }
        if let Some(username) = &args.proxy_username {
            self.default_proxy_username = Some(username.clone());
        }
        if let Some(password) = &args.proxy_password {
            self.default_proxy_password = Some(password.clone());
        }
        if let Some(store) = args.store {
            self.store = store;
        }
        if let Some(dir) = &args.cache_dir {
            self.cache_dir = Some(dir.clone());
        }
        if args.no_cache {
            self.cache_enabled = false;
        }
    }

    /// Cache settings, or `None` when caching is off
    pub fn cache_config(&self) -> Option<CacheConfig> {
        self.cache_enabled.then(|| CacheConfig {
            store: self.store,
            disk_cache_path: self.cache_dir.clone(),
        })
    }

    /// Translate into the fetch pipeline's configuration
    pub fn fetcher_config(&self) -> Result<FetcherConfig> {
        let mut builder = FetcherConfig::builder()
            .with_timeout(Duration::from_secs(self.default_timeout))
            .with_caching_enabled(false);

        if let Some(cache_config) = self.cache_config() {
            builder = builder.with_cache_config(cache_config);
        }

        if let Some(user_agent) = &self.user_agent {
            builder = builder.with_user_agent(user_agent);
        }

        if let Some(url) = &self.default_proxy {
            let mut proxy = ProxyConfig::parse(url).context("Invalid proxy setting")?;
            if let Some(username) = &self.default_proxy_username {
                let password = self.default_proxy_password.as_deref().unwrap_or_default();
                proxy = proxy.with_auth(username, password);
            }
            builder = builder.with_proxy(proxy);
        }

        let config = builder.build();
        config.validate().context("Invalid fetch configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = AppConfig {
            store: StoreKind::Tiered,
            max_concurrent: 3,
            default_output_format: OutputFormat::Table,
            ..AppConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(AppConfig::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "store = \"memory\"\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.default_timeout, 30);
    }

    #[test]
    fn test_flags_override_file_values() {
        let args = Args::try_parse_from([
            "recipes",
            "--timeout",
            "5",
            "--store",
            "memory",
            "--no-cache",
            "cache",
            "path",
        ])
        .unwrap();

        let mut config = AppConfig::default();
        config.apply_args(&args);

        assert_eq!(config.default_timeout, 5);
        assert_eq!(config.store, StoreKind::Memory);
        assert!(config.cache_config().is_none());
        assert!(config.fetcher_config().unwrap().cache_config.is_none());
    }

    #[test]
    fn test_fetcher_config_carries_proxy_and_cache() {
        let config = AppConfig {
            default_proxy: Some("socks5://127.0.0.1:1080".into()),
            default_proxy_username: Some("chef".into()),
            cache_dir: Some(PathBuf::from("/tmp/recipes-cache")),
            ..AppConfig::default()
        };

        let fetcher = config.fetcher_config().unwrap();
        let proxy = fetcher.proxy.unwrap();
        assert_eq!(proxy.url().scheme(), "socks5");
        assert_eq!(proxy.auth().unwrap().username, "chef");
        assert!(!fetcher.use_system_proxy);

        let cache = fetcher.cache_config.unwrap();
        assert_eq!(cache.store, StoreKind::Disk);
        assert_eq!(cache.disk_cache_path, Some(PathBuf::from("/tmp/recipes-cache")));
    }

    #[test]
    fn test_bad_proxy_setting_is_an_error() {
        let config = AppConfig {
            default_proxy: Some("gopher://127.0.0.1:70".into()),
            ..AppConfig::default()
        };

        let err = config.fetcher_config().unwrap_err();
        assert!(format!("{err:#}").contains("unsupported proxy scheme"));
    }
}
