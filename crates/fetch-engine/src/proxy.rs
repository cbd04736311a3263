//! Outbound proxy settings for the transport.
//!
//! The proxy URL's scheme selects the protocol (`http`, `https`, `socks5` or
//! `socks5h`). A bare `host:port` is taken as an HTTP proxy.

use reqwest::Proxy;
use url::Url;

use crate::FetchError;

const SUPPORTED_SCHEMES: &[&str] = &["http", "https", "socks5", "socks5h"];

/// Basic-auth credentials sent to the proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyAuth {
    pub username: String,
    pub password: String,
}

/// A proxy that every request is routed through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    url: Url,
    auth: Option<ProxyAuth>,
}

impl ProxyConfig {
    /// Parse and validate a proxy URL
    pub fn parse(input: &str) -> Result<Self, FetchError> {
        let input = input.trim();
        let parsed = if input.contains("://") {
            Url::parse(input)
        } else {
            Url::parse(&format!("http://{input}"))
        };
        let url = parsed.map_err(|e| FetchError::ProxyError(format!("{input}: {e}")))?;

        if !SUPPORTED_SCHEMES.contains(&url.scheme()) {
            return Err(FetchError::ProxyError(format!(
                "unsupported proxy scheme `{}`",
                url.scheme()
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(FetchError::ProxyError(format!("{input}: missing host")));
        }

        Ok(Self { url, auth: None })
    }

    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(ProxyAuth {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn auth(&self) -> Option<&ProxyAuth> {
        self.auth.as_ref()
    }

    pub(crate) fn to_reqwest(&self) -> Result<Proxy, FetchError> {
        let mut proxy = Proxy::all(self.url.as_str())
            .map_err(|e| FetchError::ProxyError(format!("{}: {e}", self.url)))?;

        if let Some(auth) = &self.auth {
            proxy = proxy.basic_auth(&auth.username, &auth.password);
        }

        Ok(proxy)
    }
}
