use std::sync::Arc;

// Error type shared by every layer of the fetch pipeline.
//
// A coalesced fetch hands the same outcome to every waiter, so the error has to be
// `Clone`. Foreign errors that are not are kept behind an `Arc`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    HttpError(Arc<reqwest::Error>),

    #[error("Invalid URL: {0}")]
    UrlError(String),

    #[error("I/O error: {0}")]
    IoError(Arc<std::io::Error>),

    #[error("Invalid proxy configuration: {0}")]
    ProxyError(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientError(String),

    #[error("Fetch of {0} was cancelled before it completed")]
    Cancelled(String),

    #[error("Fetch task for {0} panicked")]
    TaskPanicked(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::HttpError(Arc::new(err))
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        FetchError::IoError(Arc::new(err))
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::UrlError(err.to_string())
    }
}

