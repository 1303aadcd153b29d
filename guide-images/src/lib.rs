//! guide-images library interface
//!
//! Image discovery for the neighborhood guide: finds a photo for a place by
//! querying external image-search providers through a set of query strategies,
//! validating and ranking the results, and falling back to bundled assets.
//!
//! Entry point: [`ImageSourceManager::find_images`]. The same pipeline is
//! exposed over HTTP by [`build_router`].

pub mod api;
pub mod config;
pub mod error;
pub mod fallback;
pub mod manager;
pub mod ranking;
pub mod sources;
pub mod strategies;
pub mod text;
pub mod types;
pub mod validator;

pub use crate::config::DiscoveryConfig;
pub use crate::error::{ApiError, ApiResult};
pub use crate::manager::{FindImagesOptions, ImageSourceManager};
pub use crate::types::{Attribution, ImageResult, PlaceForSearch};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Default HTTP port for `guide-images serve`
pub const DEFAULT_PORT: u16 = 5731;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<ImageSourceManager>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(manager: ImageSourceManager) -> Self {
        Self {
            manager: Arc::new(manager),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::image_routes())
        .merge(api::health_routes())
        .with_state(state)
}
