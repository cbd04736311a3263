use crate::{
    cli::OutputFormat,
    config::AppConfig,
    output::{OutputManager, write_output},
};
use anyhow::{Context, Result, bail};
use fetch_engine::{FetchPipeline, FetchRequest, StoreKind};
use indicatif::{ProgressBar, ProgressStyle};
use recipes::{
    ImageProvider, PhotoSize, Recipe, RecipeListEndpoint, RecipeListProvider,
    RemoteImageProvider, RemoteRecipeListProvider, StaticRecipeListProvider,
};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use url::Url;

/// Where `list` takes its recipes from
pub enum ListSource {
    Endpoint(RecipeListEndpoint),
    Url(Url),
    Sample,
}

type ImageOutcome = (Url, Result<usize, recipes::RecipeError>);

pub struct CommandExecutor {
    config: AppConfig,
    pipeline: Arc<FetchPipeline>,
    output: OutputManager,
}

impl CommandExecutor {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let pipeline = FetchPipeline::from_config(&config.fetcher_config()?)
            .await
            .context("Failed to set up the fetch pipeline")?;
        let output = OutputManager::new(config.colored_output);

        Ok(Self {
            config,
            pipeline: Arc::new(pipeline),
            output,
        })
    }

    async fn recipe_list(&self, source: ListSource) -> Result<Vec<Recipe>> {
        let provider: Box<dyn RecipeListProvider> = match source {
            ListSource::Endpoint(endpoint) => Box::new(RemoteRecipeListProvider::for_endpoint(
                self.pipeline.clone(),
                endpoint,
            )?),
            ListSource::Url(url) => Box::new(RemoteRecipeListProvider::new(
                self.pipeline.clone(),
                url,
            )),
            ListSource::Sample => Box::new(StaticRecipeListProvider::sample()),
        };

        provider
            .recipe_list()
            .await
            .context("Failed to load the recipe list")
    }

    pub async fn list_recipes(
        &self,
        source: ListSource,
        cuisine: Option<&str>,
        format: Option<OutputFormat>,
    ) -> Result<()> {
        let mut recipes = self.recipe_list(source).await?;

        if let Some(cuisine) = cuisine {
            recipes.retain(|r| r.cuisine.demonym().eq_ignore_ascii_case(cuisine));
            debug!(cuisine, matched = recipes.len(), "Filtered recipes by cuisine");
        }

        let format = format.unwrap_or_else(|| self.config.default_output_format.clone());
        let content = self.output.format_recipes(&recipes, &format)?;
        write_output(&content)
    }

    pub async fn load_images(
        &self,
        endpoint: RecipeListEndpoint,
        size: PhotoSize,
        max_concurrent: Option<usize>,
        limit: Option<usize>,
    ) -> Result<()> {
        let recipes = self.recipe_list(ListSource::Endpoint(endpoint)).await?;

        let mut urls: Vec<Url> = recipes
            .iter()
            .filter_map(|r| r.photo(size).cloned())
            .collect();
        if let Some(limit) = limit {
            urls.truncate(limit);
        }

        if urls.is_empty() {
            println!("{}", self.output.warning("No photos to load"));
            return Ok(());
        }

        let concurrency = max_concurrent.unwrap_or(self.config.max_concurrent);
        if concurrency == 0 {
            bail!("--max-concurrent must be at least 1");
        }

        let pb = Arc::new(ProgressBar::new(urls.len() as u64));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .context("Invalid progress bar template")?
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );

        let images: Arc<dyn ImageProvider> =
            Arc::new(RemoteImageProvider::new(self.pipeline.clone()));
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut tasks = Vec::with_capacity(urls.len());

        for url in urls {
            let pb = Arc::clone(&pb);
            let images = Arc::clone(&images);
            let permit = semaphore.clone().acquire_owned().await?;

            tasks.push(tokio::spawn(async move {
                let _permit = permit;

                pb.set_message(format!("Loading: {url}"));
                let result = images.image(&url).await.map(|image| image.data.len());

                pb.inc(1);
                (url, result)
            }));
        }

        let mut results: Vec<ImageOutcome> = Vec::with_capacity(tasks.len());
        for task in tasks {
            results.push(task.await.context("Image task failed")?);
        }

        pb.finish_with_message("Photos loaded");
        self.print_image_summary(&results);
        Ok(())
    }

    fn print_image_summary(&self, results: &[ImageOutcome]) {
        let loaded: usize = results.iter().filter(|(_, r)| r.is_ok()).count();
        let bytes: usize = results
            .iter()
            .filter_map(|(_, r)| r.as_ref().ok())
            .sum();

        println!(
            "{} {} of {} photos ({} bytes)",
            self.output.heading("Loaded"),
            self.output.highlight(&loaded.to_string()),
            results.len(),
            bytes
        );

        for (url, result) in results {
            if let Err(e) = result {
                warn!(url = %url, error = %e, "Photo failed to load");
                println!("  {} {url}: {e}", self.output.warning("✗"));
            }
        }
    }

    pub async fn clear_cache(&self) -> Result<()> {
        if self.pipeline.store().is_none() {
            println!("Caching is disabled; nothing to clear");
            return Ok(());
        }

        self.pipeline.evict_all().await;
        println!("✓ Response cache cleared");
        Ok(())
    }

    pub async fn evict(&self, url: Url) -> Result<()> {
        if self.pipeline.store().is_none() {
            println!("Caching is disabled; nothing to evict");
            return Ok(());
        }

        self.pipeline.evict(&FetchRequest::get(url.clone())).await;
        println!("✓ Evicted {url}");
        Ok(())
    }

    pub fn show_cache_path(&self) {
        match self.config.cache_config() {
            None => println!("Caching is disabled"),
            Some(cache) if cache.store == StoreKind::Memory => {
                println!("Responses are kept in memory for the current run only")
            }
            Some(cache) => println!("{}", cache.resolved_disk_path().display()),
        }
    }
}
