//! # Fetcher configuration
//!
//! [`FetcherConfig`] carries everything [`crate::FetchPipeline::from_config`] needs:
//! the HTTP client settings and the optional cache. Build one with
//! [`FetcherConfig::builder`].
//!
//! ```
//! use std::time::Duration;
//! use fetch_engine::{FetcherConfig, ProxyConfig, StoreKind};
//!
//! let config = FetcherConfig::builder()
//!     .with_timeout(Duration::from_secs(60))
//!     .with_user_agent("MyApp/1.0")
//!     .with_store(StoreKind::Memory)
//!     .build();
//! assert!(config.validate().is_ok());
//!
//! let proxied = FetcherConfig::builder()
//!     .with_proxy(ProxyConfig::parse("http://proxy.example.com:8080").unwrap())
//!     .with_caching_enabled(false)
//!     .build();
//! assert!(proxied.cache_config.is_none());
//! ```

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONNECTION, HeaderMap, HeaderValue};

use crate::{CacheConfig, FetchError, StoreKind, proxy::ProxyConfig};

const DEFAULT_USER_AGENT: &str = concat!("fetch-engine/", env!("CARGO_PKG_VERSION"));

/// Configurable options for the fetch pipeline
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Cache configuration. `None` disables the caching layer.
    pub cache_config: Option<CacheConfig>,

    /// Overall timeout for the entire HTTP request, zero for none
    pub timeout: Duration,

    /// Time allowed to establish a connection, zero for none
    pub connect_timeout: Duration,

    /// Maximum time between received body chunks, zero for none
    pub read_timeout: Duration,

    /// Follow up to 10 redirects when set
    pub follow_redirects: bool,

    pub user_agent: String,

    /// Headers sent with every request
    pub headers: HeaderMap,

    /// Explicit proxy, takes precedence over the system proxy
    pub proxy: Option<ProxyConfig>,

    pub use_system_proxy: bool,

    pub danger_accept_invalid_certs: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            cache_config: Some(CacheConfig::default()),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            follow_redirects: true,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            headers: default_headers(),
            proxy: None,
            use_system_proxy: true,
            danger_accept_invalid_certs: false,
        }
    }
}

impl FetcherConfig {
    pub fn builder() -> FetcherConfigBuilder {
        FetcherConfigBuilder::default()
    }

    /// Check the settings the HTTP client would otherwise reject late
    pub fn validate(&self) -> Result<(), FetchError> {
        HeaderValue::from_str(&self.user_agent).map_err(|e| {
            FetchError::ClientError(format!("invalid user agent {:?}: {e}", self.user_agent))
        })?;

        if let Some(proxy) = &self.proxy {
            proxy.to_reqwest()?;
        }

        Ok(())
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/json, image/*;q=0.9, */*;q=0.8"),
    );
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers
}

/// Fluent construction of a [`FetcherConfig`] starting from the defaults
#[derive(Debug, Clone, Default)]
pub struct FetcherConfigBuilder {
    config: FetcherConfig,
}

impl FetcherConfigBuilder {
    pub fn with_cache_config(mut self, cache_config: CacheConfig) -> Self {
        self.config.cache_config = Some(cache_config);
        self
    }

    /// Turning caching back on restores the default cache settings
    pub fn with_caching_enabled(mut self, enabled: bool) -> Self {
        if !enabled {
            self.config.cache_config = None;
        } else if self.config.cache_config.is_none() {
            self.config.cache_config = Some(CacheConfig::default());
        }
        self
    }

    /// Select the response store, enabling caching if it was off
    pub fn with_store(mut self, store: StoreKind) -> Self {
        self.cache_config_mut().store = store;
        self
    }

    /// Directory for the disk store, enabling caching if it was off
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_config_mut().disk_cache_path = Some(dir.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Route requests through `proxy`, ignoring the system proxy
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.config.proxy = Some(proxy);
        self.config.use_system_proxy = false;
        self
    }

    /// Has no effect once an explicit proxy is set
    pub fn with_system_proxy(mut self, use_system_proxy: bool) -> Self {
        if self.config.proxy.is_none() {
            self.config.use_system_proxy = use_system_proxy;
        }
        self
    }

    /// Skip TLS certificate verification. Only for tests and controlled networks.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.danger_accept_invalid_certs = accept;
        self
    }

    pub fn build(self) -> FetcherConfig {
        self.config
    }

    fn cache_config_mut(&mut self) -> &mut CacheConfig {
        self.config
            .cache_config
            .get_or_insert_with(CacheConfig::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FetcherConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.follow_redirects);
        assert!(config.use_system_proxy);
        assert!(!config.danger_accept_invalid_certs);
        assert!(config.user_agent.starts_with("fetch-engine/"));
        assert_eq!(config.headers[CONNECTION], "keep-alive");

        let cache = config.cache_config.expect("caching on by default");
        assert_eq!(cache.store, StoreKind::Disk);
        assert!(cache.disk_cache_path.is_none());
    }

    #[test]
    fn test_caching_toggle() {
        assert!(
            FetcherConfig::builder()
                .with_caching_enabled(false)
                .build()
                .cache_config
                .is_none()
        );

        let reenabled = FetcherConfig::builder()
            .with_store(StoreKind::Memory)
            .with_caching_enabled(false)
            .with_caching_enabled(true)
            .build();
        assert_eq!(reenabled.cache_config.unwrap().store, StoreKind::Disk);
    }

    #[test]
    fn test_store_selection_enables_caching() {
        let config = FetcherConfig::builder()
            .with_caching_enabled(false)
            .with_store(StoreKind::Tiered)
            .with_cache_dir("/tmp/recipes-cache")
            .build();

        let cache = config.cache_config.unwrap();
        assert_eq!(cache.store, StoreKind::Tiered);
        assert_eq!(
            cache.disk_cache_path,
            Some(PathBuf::from("/tmp/recipes-cache"))
        );
    }

    #[test]
    fn test_explicit_proxy_wins_over_system_proxy() {
        let proxy = ProxyConfig::parse("http://proxy.example.com:8080")
            .unwrap()
            .with_auth("user", "pass");

        let config = FetcherConfig::builder()
            .with_proxy(proxy.clone())
            .with_system_proxy(true)
            .build();

        assert!(!config.use_system_proxy);
        assert_eq!(config.proxy, Some(proxy));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_user_agent_rejected() {
        let config = FetcherConfig::builder()
            .with_user_agent("recipes\n1.0")
            .build();
        assert!(matches!(config.validate(), Err(FetchError::ClientError(_))));
    }
}
