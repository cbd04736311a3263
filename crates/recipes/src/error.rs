use fetch_engine::{FetchError, ResponseMeta, StatusCode};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to decode recipe list: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{url} responded with status {status}")]
    Status { url: Url, status: StatusCode },

    #[error("{url} is not a usable image: {reason}")]
    InvalidImage { url: Url, reason: String },
}

impl RecipeError {
    /// Reject responses whose status is not 2xx
    pub fn check_status(meta: &ResponseMeta) -> Result<(), RecipeError> {
        if meta.status.is_success() {
            Ok(())
        } else {
            Err(RecipeError::Status {
                url: meta.url.clone(),
                status: meta.status,
            })
        }
    }
}

impl From<url::ParseError> for RecipeError {
    fn from(err: url::ParseError) -> Self {
        RecipeError::Fetch(err.into())
    }
}
