//! # Recipe List Providers
//!
//! [`RemoteRecipeListProvider`] loads the list through any [`DataProvider`],
//! normally a [`FetchPipeline`](fetch_engine::FetchPipeline).
//! [`StaticRecipeListProvider`] serves a bundled list without touching the network.

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use fetch_engine::{DataProvider, FetchRequest};
use tracing::debug;
use url::Url;

use crate::endpoint::RecipeListEndpoint;
use crate::model::{Recipe, RecipeList};
use crate::RecipeError;

const SAMPLE_LIST: &str = include_str!("../fixtures/recipes.json");

#[async_trait]
pub trait RecipeListProvider: Send + Sync {
    async fn recipe_list(&self) -> Result<Vec<Recipe>, RecipeError>;
}

pub struct RemoteRecipeListProvider {
    data: Arc<dyn DataProvider>,
    url: Url,
}

impl RemoteRecipeListProvider {
    pub fn new(data: Arc<dyn DataProvider>, url: Url) -> Self {
        Self { data, url }
    }

    pub fn for_endpoint(
        data: Arc<dyn DataProvider>,
        endpoint: RecipeListEndpoint,
    ) -> Result<Self, RecipeError> {
        Ok(Self::new(data, endpoint.url()?))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl RecipeListProvider for RemoteRecipeListProvider {
    async fn recipe_list(&self) -> Result<Vec<Recipe>, RecipeError> {
        let request = FetchRequest::get(self.url.clone());
        let (body, meta) = self.data.fetch(&request).await?;
        RecipeError::check_status(&meta)?;

        let list = RecipeList::from_json(&body)?;
        debug!(url = %self.url, count = list.recipes.len(), "Decoded recipe list");
        Ok(list.recipes)
    }
}

/// Serves a recipe list held in memory as JSON
pub struct StaticRecipeListProvider {
    json: Cow<'static, str>,
}

impl StaticRecipeListProvider {
    pub fn new(json: impl Into<Cow<'static, str>>) -> Self {
        Self { json: json.into() }
    }

    /// The bundled sample list
    pub fn sample() -> Self {
        Self::new(SAMPLE_LIST)
    }
}

#[async_trait]
impl RecipeListProvider for StaticRecipeListProvider {
    async fn recipe_list(&self) -> Result<Vec<Recipe>, RecipeError> {
        Ok(RecipeList::from_json(self.json.as_bytes())?.recipes)
    }
}
