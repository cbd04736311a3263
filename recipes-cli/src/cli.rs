use clap::{Parser, Subcommand, ValueEnum};
use fetch_engine::StoreKind;
use recipes::{PhotoSize, RecipeListEndpoint};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "recipes",
    about = "Recipes - browse the recipe list and prefetch photos through a caching fetch pipeline",
    version,
    author
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Proxy URL (supports http, https, socks5)
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    /// Proxy username (if proxy requires authentication)
    #[arg(long, global = true)]
    pub proxy_username: Option<String>,

    /// Proxy password (if proxy requires authentication)
    #[arg(long, global = true, env = "RECIPES_PROXY_PASSWORD")]
    pub proxy_password: Option<String>,

    /// Response store backing the cache
    #[arg(long, global = true, value_enum)]
    pub store: Option<StoreKind>,

    /// Directory for the on-disk response cache
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Bypass the response cache entirely
    #[arg(long, global = true)]
    pub no_cache: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch and print the recipe list
    List {
        /// Which hosted list to load
        #[arg(short, long, value_enum, default_value_t = Endpoint::Full)]
        endpoint: Endpoint,

        /// Load the list from a custom URL instead
        #[arg(long)]
        url: Option<Url>,

        /// Print the bundled sample list without touching the network
        #[arg(long, conflicts_with = "url")]
        sample: bool,

        /// Only show recipes of this cuisine (case-insensitive demonym)
        #[arg(long)]
        cuisine: Option<String>,

        /// Output format
        #[arg(short, long)]
        output: Option<OutputFormat>,
    },

    /// Load every recipe photo through the pipeline
    Images {
        /// Which hosted list to take photos from
        #[arg(short, long, value_enum, default_value_t = Endpoint::Full)]
        endpoint: Endpoint,

        /// Photo size to load
        #[arg(short, long, value_enum, default_value_t = Size::Small)]
        size: Size,

        /// Maximum concurrent photo loads
        #[arg(long)]
        max_concurrent: Option<usize>,

        /// Only load the first N photos
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Inspect or empty the response cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Show configuration information
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Remove every cached response
    Clear,

    /// Remove the cached response for one URL
    Evict {
        /// URL whose response should be dropped
        url: Url,
    },

    /// Print where responses are cached
    Path,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Full,
    Empty,
    Malformed,
}

impl From<Endpoint> for RecipeListEndpoint {
    fn from(value: Endpoint) -> Self {
        match value {
            Endpoint::Full => RecipeListEndpoint::Full,
            Endpoint::Empty => RecipeListEndpoint::Empty,
            Endpoint::Malformed => RecipeListEndpoint::Malformed,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Size {
    Small,
    Large,
}

impl From<Size> for PhotoSize {
    fn from(value: Size) -> Self {
        match value {
            Size::Small => PhotoSize::Small,
            Size::Large => PhotoSize::Large,
        }
    }
}

#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Pretty-printed human-readable output
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// Compact JSON output
    JsonCompact,
    /// Table format
    Table,
    /// CSV format
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::JsonCompact => write!(f, "json-compact"),
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
