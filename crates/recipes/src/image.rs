//! # Recipe Photos
//!
//! Loads photo bytes through a [`DataProvider`] and checks they decode as an
//! image by reading the dimensions from the header.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use fetch_engine::{DataProvider, FetchRequest};
use imagesize::{ImageError, ImageSize};
use tracing::debug;
use url::Url;

use crate::RecipeError;

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeImage {
    pub url: Url,
    pub data: Bytes,
    pub width: usize,
    pub height: usize,
    pub content_type: Option<String>,
}

#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn image(&self, url: &Url) -> Result<RecipeImage, RecipeError>;
}

pub struct RemoteImageProvider {
    data: Arc<dyn DataProvider>,
}

impl RemoteImageProvider {
    pub fn new(data: Arc<dyn DataProvider>) -> Self {
        Self { data }
    }

    fn image_size(url: &Url, data: &[u8]) -> Result<ImageSize, RecipeError> {
        let invalid = |reason: &str| RecipeError::InvalidImage {
            url: url.clone(),
            reason: reason.to_string(),
        };

        let size = match imagesize::blob_size(data) {
            Ok(size) => size,
            Err(ImageError::NotSupported) => return Err(invalid("unsupported format")),
            Err(ImageError::CorruptedImage) => return Err(invalid("corrupted image")),
            Err(ImageError::IoError(err)) => return Err(invalid(&err.to_string())),
        };

        if size.width == 0 || size.height == 0 {
            return Err(invalid("zero-sized image"));
        }
        Ok(size)
    }
}

#[async_trait]
impl ImageProvider for RemoteImageProvider {
    async fn image(&self, url: &Url) -> Result<RecipeImage, RecipeError> {
        let request = FetchRequest::get(url.clone());
        let (data, meta) = self.data.fetch(&request).await?;
        RecipeError::check_status(&meta)?;

        let size = Self::image_size(url, &data)?;
        debug!(
            url = %url,
            width = size.width,
            height = size.height,
            bytes = data.len(),
            "Loaded image"
        );

        Ok(RecipeImage {
            url: url.clone(),
            content_type: meta.content_type().map(str::to_owned),
            data,
            width: size.width,
            height: size.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubProvider, png_header};
    use fetch_engine::StatusCode;

    const PHOTO: &str =
        "https://d3jbb8n5wk0qxi.cloudfront.net/photos/535dfe4e-5d61-4db6-ba8f-7a27b1214f5d/small.jpg";

    fn url() -> Url {
        Url::parse(PHOTO).unwrap()
    }

    #[tokio::test]
    async fn test_image_dimensions_are_read() {
        let data = Arc::new(StubProvider::new().route(
            PHOTO,
            StatusCode::OK,
            "image/png",
            png_header(150, 120),
        ));
        let provider = RemoteImageProvider::new(data);

        let image = provider.image(&url()).await.unwrap();

        assert_eq!((image.width, image.height), (150, 120));
        assert_eq!(image.content_type.as_deref(), Some("image/png"));
        assert_eq!(image.url, url());
    }

    #[tokio::test]
    async fn test_non_image_body_is_rejected() {
        let data = Arc::new(StubProvider::new().route(
            PHOTO,
            StatusCode::OK,
            "text/html",
            "<html>not a photo</html>",
        ));
        let provider = RemoteImageProvider::new(data);

        let result = provider.image(&url()).await;
        assert!(matches!(result, Err(RecipeError::InvalidImage { .. })));
    }

    #[tokio::test]
    async fn test_missing_photo_status_is_rejected() {
        let data = Arc::new(StubProvider::new().route(
            PHOTO,
            StatusCode::NOT_FOUND,
            "text/plain",
            "missing",
        ));
        let provider = RemoteImageProvider::new(data);

        let result = provider.image(&url()).await;
        assert!(matches!(result, Err(RecipeError::Status { .. })));
    }

    #[tokio::test]
    async fn test_transport_error_is_forwarded() {
        let provider = RemoteImageProvider::new(Arc::new(StubProvider::new()));
        let result = provider.image(&url()).await;
        assert!(matches!(result, Err(RecipeError::Fetch(_))));
    }
}
