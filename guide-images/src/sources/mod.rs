//! Image source adapters
//!
//! Each adapter wraps one external image-search provider behind [`ImageSource`].
//! Adapters never fail past their boundary: HTTP and parse errors are logged
//! and turn into an empty result list.
//!
//! [`search_all`] fans a query out to every source at once. Each call races a
//! timeout; a slow or failing source contributes nothing and does not affect
//! its siblings.

pub mod unsplash;

use crate::types::ImageResult;
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub use unsplash::UnsplashSource;

/// Options for a single source search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of results requested from the provider
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

/// Uniform interface over one image-search provider
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Source name for logging and attribution (e.g. "Unsplash")
    fn name(&self) -> &'static str;

    /// Whether the source can be used (credentials configured etc.)
    ///
    /// Checked once when the manager is built; unavailable sources are dropped.
    fn is_available(&self) -> bool {
        true
    }

    /// Search for images matching `query`
    ///
    /// Returns an empty list on any failure.
    async fn search(&self, query: &str, options: SearchOptions) -> Vec<ImageResult>;
}

/// Source adapter error (never escapes [`ImageSource::search`])
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Provider returned a non-success status
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Failed to parse provider response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Source has no credentials
    #[error("Source not available: {0}")]
    NotAvailable(String),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Query every source concurrently and merge the results in source order
pub async fn search_all(
    sources: &[Arc<dyn ImageSource>],
    query: &str,
    limit: usize,
    timeout: Duration,
) -> Vec<ImageResult> {
    let options = SearchOptions { limit };
    let futures = sources.iter().map(|source| {
        let source = Arc::clone(source);
        async move {
            let name = source.name();
            match tokio::time::timeout(timeout, source.search(query, options)).await {
                Ok(results) => {
                    debug!(source = name, query, count = results.len(), "Source search complete");
                    results
                }
                Err(_) => {
                    warn!(
                        source = name,
                        query,
                        timeout_ms = timeout.as_millis() as u64,
                        "Source search timed out"
                    );
                    Vec::new()
                }
            }
        }
    });

    join_all(futures).await.into_iter().flatten().collect()
}

// ============================================================================
// Mock Source for Testing
// ============================================================================
