//! # Recipes
//!
//! Consumers of the fetch pipeline: the recipe list loader and the recipe
//! photo loader. Both issue plain `GET` requests through a
//! [`DataProvider`](fetch_engine::DataProvider) and interpret the bytes that
//! come back.

pub mod endpoint;
pub mod error;
pub mod image;
pub mod model;
pub mod provider;

#[cfg(test)]
mod test_support;

pub use endpoint::RecipeListEndpoint;
pub use error::RecipeError;
pub use image::{ImageProvider, RecipeImage, RemoteImageProvider};
pub use model::{Cuisine, KnownCuisine, PhotoSize, Recipe, RecipeList};
pub use provider::{RecipeListProvider, RemoteRecipeListProvider, StaticRecipeListProvider};
