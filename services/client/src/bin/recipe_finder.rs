//! services/client/src/bin/recipe_finder.rs

use clap::{Parser, Subcommand};
use client_lib::{
    adapters::{FixedReachability, HttpRecipeBackend, TcpReachability},
    config::Config,
    error::ClientError,
};
use recipe_finder_core::{
    HistoryKind, ImageRef, MenuCatalog, OfflineCatalog, ReachabilityProbe, RecipeShim,
    SavedRecipes,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "recipe-finder", version, about = "Search recipes and detect ingredients from photos")]
struct Cli {
    /// Skip the reachability probe and use the bundled offline dataset.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search recipes by free text.
    Search {
        query: String,
        /// Record the query in the history and include the latest history in the output.
        #[arg(long)]
        record: bool,
    },
    /// Detect ingredients in photos and recommend recipes for them.
    Recommend {
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Read or append the search history.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Browse the curated menus.
    Menu {
        /// Show a single category instead of the whole catalog.
        category: Option<String>,
    },
    /// Toggle bookmarks on menu items, in order, and print the saved list.
    /// Bookmarks last for this invocation only.
    Saved {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// The most recent entries.
    Latest,
    /// Every entry.
    All,
    /// Append an entry.
    Add {
        recipe_name: String,
        #[arg(long, default_value = "search")]
        kind: HistoryKind,
    },
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    let cli = Cli::parse();

    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!(api_url = %config.api_url, "Configuration loaded.");

    // --- 2. Load the Bundled Datasets ---
    let offline = match &config.offline_recipes_path {
        Some(path) => {
            info!(path = %path.display(), "Loading offline dataset from file...");
            OfflineCatalog::from_json(&std::fs::read_to_string(path)?)?
        }
        None => OfflineCatalog::bundled()?,
    };
    info!(recipes = offline.len(), "Offline dataset ready.");

    // --- 3. Initialize Service Adapters ---
    let http_client = reqwest::Client::builder().build()?;
    let backend = Arc::new(HttpRecipeBackend::new(http_client, &config.api_url));
    let reachability: Arc<dyn ReachabilityProbe> = if cli.offline {
        Arc::new(FixedReachability(false))
    } else if let Some((host, port)) = &config.reachability_addr {
        Arc::new(TcpReachability::new(
            host.as_str(),
            *port,
            config.reachability_timeout,
        ))
    } else {
        Arc::new(TcpReachability::for_url(
            &config.api_url,
            config.reachability_timeout,
        )?)
    };
    let shim = RecipeShim::new(backend, reachability, offline);

    // --- 4. Run the Command ---
    match cli.command {
        Command::Search { query, record } => {
            if record {
                print_json(&shim.search_and_record(&query).await)
            } else {
                print_json(&shim.search_recipes(&query).await)
            }
        }
        Command::Recommend { images } => {
            let images: Vec<ImageRef> = images.into_iter().map(ImageRef::new).collect();
            print_json(&shim.recommend_from_photos(&images).await)
        }
        Command::History { action } => match action {
            HistoryAction::Latest => print_json(&shim.latest_history().await),
            HistoryAction::All => print_json(&shim.all_history().await),
            HistoryAction::Add { recipe_name, kind } => {
                shim.add_history(&recipe_name, kind).await;
                Ok(())
            }
        },
        Command::Menu { category } => {
            let menus = MenuCatalog::bundled()?;
            match category {
                Some(id) => {
                    let category = menus.category(&id).ok_or_else(|| {
                        ClientError::Internal(format!("Unknown menu category '{}'", id))
                    })?;
                    print_json(category)
                }
                None => print_json(&menus.categories),
            }
        }
        Command::Saved { ids } => {
            let menus = MenuCatalog::bundled()?;
            let mut saved = SavedRecipes::new();
            for id in &ids {
                menus.toggle_saved(&mut saved, id).ok_or_else(|| {
                    ClientError::Internal(format!("Unknown menu item '{}'", id))
                })?;
            }
            print_json(saved.list())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), ClientError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
