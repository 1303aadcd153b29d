//! guide-images - image discovery for the neighborhood guide
//!
//! Subcommands:
//! - `search <NAME>`: run one discovery and print the results as JSON
//! - `serve`: expose discovery over HTTP (default port 5731)

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::{info, warn};

use guide_images::config::{discovery_config_path, read_discovery_config};
use guide_images::{build_router, AppState, FindImagesOptions, ImageSourceManager, PlaceForSearch};

/// Command-line arguments for guide-images
#[derive(Parser, Debug)]
#[command(name = "guide-images")]
#[command(about = "Find photos for neighborhood guide places")]
#[command(version)]
struct Args {
    /// Config file (default: $GUIDE_CONFIG, then <config dir>/neighborhood-guide/guide-images.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search images for one place and print JSON
    Search(SearchArgs),
    /// Run the HTTP API
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = guide_images::DEFAULT_PORT, env = "GUIDE_IMAGES_PORT")]
        port: u16,
    },
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    /// Place name
    name: String,

    /// Brand name (e.g. "Corner House")
    #[arg(long)]
    brand: Option<String>,

    /// Establishment type (e.g. "metro-station")
    #[arg(long)]
    establishment_type: Option<String>,

    /// Free-text category (e.g. "Food & Dining")
    #[arg(long)]
    category: Option<String>,

    /// Extra search keyword (repeatable)
    #[arg(long = "keyword")]
    keywords: Vec<String>,

    /// JSON file with a full place description; flags above override its fields
    #[arg(long, value_name = "FILE")]
    place_file: Option<PathBuf>,

    /// City override
    #[arg(long)]
    location: Option<String>,

    /// Maximum results
    #[arg(short, long)]
    limit: Option<usize>,

    /// Per-source timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl SearchArgs {
    fn place(&self) -> Result<Option<PlaceForSearch>> {
        let mut place = match &self.place_file {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read place file {}", path.display()))?;
                serde_json::from_str::<PlaceForSearch>(&content)
                    .with_context(|| format!("Failed to parse place file {}", path.display()))?
            }
            None => PlaceForSearch::default(),
        };

        if place.name.trim().is_empty() {
            place.name = self.name.clone();
        }
        if let Some(brand) = &self.brand {
            place.brand_name = Some(brand.clone());
        }
        if let Some(kind) = &self.establishment_type {
            place.establishment_type = Some(kind.clone());
        }
        if let Some(category) = &self.category {
            place.category = Some(category.clone());
        }
        if !self.keywords.is_empty() {
            place.search_keywords = self.keywords.clone();
        }

        let described = self.place_file.is_some()
            || place.brand().is_some()
            || place.establishment_type().is_some()
            || place.category().is_some()
            || !place.search_keywords.is_empty();
        Ok(described.then_some(place))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = discovery_config_path(args.config.as_deref()).context("Failed to locate configuration")?;
    let mut config = read_discovery_config(&config_path).context("Failed to load configuration")?;

    // Key resolution logs; it must run after the subscriber is installed
    guide_common::logging::init_tracing(&config.log_directives());
    if config_path.exists() {
        info!("Loaded config from {}", config_path.display());
    } else {
        info!("No config file at {}, using defaults", config_path.display());
    }
    config.resolve_credentials();

    let manager = ImageSourceManager::from_config(&config);
    if manager.available_source_count() == 0 {
        warn!("No image sources available; searches will return no results");
    }

    match args.command {
        Command::Search(search) => run_search(manager, search).await,
        Command::Serve { port } => serve(manager, port).await,
    }
}

async fn run_search(manager: ImageSourceManager, args: SearchArgs) -> Result<()> {
    let options = FindImagesOptions {
        place: args.place()?,
        location: args.location.clone(),
        limit: args.limit,
        timeout: args.timeout_ms.map(Duration::from_millis),
    };

    let images = manager.find_images(&args.name, options).await;
    info!(count = images.len(), "Search complete");

    let output = serde_json::to_string_pretty(&images).context("Failed to serialize results")?;
    println!("{}", output);
    Ok(())
}

async fn serve(manager: ImageSourceManager, port: u16) -> Result<()> {
    info!("Starting guide-images on port {}", port);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let app = build_router(AppState::new(manager));
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
