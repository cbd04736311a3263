mod cli;
mod commands;
mod config;
mod output;

use crate::{
    cli::{Args, CacheAction, Commands},
    commands::{CommandExecutor, ListSource},
    config::AppConfig,
};
use anyhow::Result;
use clap::Parser;
#[cfg(feature = "colored-output")]
use colored::*;
use std::process;
use tracing::{Level, debug, error};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        error!("Application error: {:#}", e);
        #[cfg(feature = "colored-output")]
        {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
        }
        #[cfg(not(feature = "colored-output"))]
        {
            eprintln!("Error: {:#}", e);
        }
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    // Config subcommands work on the file itself, before any flag is applied
    if let Commands::Config { show, reset } = &args.command {
        if *reset {
            AppConfig::reset(args.config.as_deref())?;
            println!("✓ Configuration reset to defaults");
        } else if *show {
            let config = AppConfig::load(args.config.as_deref())?;
            println!("{}", config.show()?);
        } else {
            println!("Use --show to display current configuration or --reset to reset to defaults");
        }
        return Ok(());
    }

    if let Commands::Completions { shell } = &args.command {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Args::command();
        let bin_name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
        return Ok(());
    }

    let mut config = AppConfig::load(args.config.as_deref())?;
    config.apply_args(&args);
    debug!(?config, "Effective configuration");

    let executor = CommandExecutor::new(config).await?;

    match args.command {
        Commands::List {
            endpoint,
            url,
            sample,
            cuisine,
            output,
        } => {
            let source = if sample {
                ListSource::Sample
            } else if let Some(url) = url {
                ListSource::Url(url)
            } else {
                ListSource::Endpoint(endpoint.into())
            };
            executor
                .list_recipes(source, cuisine.as_deref(), output)
                .await?;
        }

        Commands::Images {
            endpoint,
            size,
            max_concurrent,
            limit,
        } => {
            executor
                .load_images(endpoint.into(), size.into(), max_concurrent, limit)
                .await?;
        }

        Commands::Cache { action } => match action {
            CacheAction::Clear => executor.clear_cache().await?,
            CacheAction::Evict { url } => executor.evict(url).await?,
            CacheAction::Path => executor.show_cache_path(),
        },

        Commands::Completions { .. } | Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_level(verbose).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
