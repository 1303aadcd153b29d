//! Unsplash Source Adapter
//!
//! Queries the Unsplash photo search API and maps photos to [`ImageResult`]s.
//!
//! # API Reference
//! - Endpoint: https://api.unsplash.com/search/photos
//! - Auth: `Authorization: Client-ID <access key>`
//! - Documentation: https://unsplash.com/documentation#search-photos
//!
//! # Initial Relevance
//! Base 0.5, then substring containment of the query in the photo text:
//! - description contains query → +0.3
//! - alt text contains query → +0.2
//! - each tag overlapping the query → +0.1 (capped at +0.3)
//!
//! Clamped to 1.0.

use super::{ImageSource, SearchOptions, SourceError};
use crate::config::{DiscoveryConfig, UnsplashSettings};
use crate::text::contains_term;
use crate::types::{clamp_score, Attribution, ImageResult, Score};
use async_trait::async_trait;
use guide_common::config::is_valid_key;
use reqwest::{header, Client};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

/// Upper bound on the HTTP request itself; the manager's timeout race is usually shorter
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Unsplash caps `per_page` at 30
const MAX_PER_PAGE: usize = 30;

const SOURCE_NAME: &str = "Unsplash";
const LICENSE: &str = "Unsplash License";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<UnsplashPhoto>,
}

#[derive(Debug, Deserialize)]
struct UnsplashPhoto {
    id: String,
    width: Option<u32>,
    height: Option<u32>,
    description: Option<String>,
    alt_description: Option<String>,
    urls: PhotoUrls,
    links: Option<PhotoLinks>,
    user: Option<PhotoUser>,
    #[serde(default)]
    tags: Vec<PhotoTag>,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: Option<String>,
    full: Option<String>,
    small: Option<String>,
    thumb: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhotoLinks {
    html: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhotoUser {
    name: Option<String>,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhotoTag {
    title: String,
}

/// Unsplash photo search adapter
///
/// Available only when an access key is configured.
pub struct UnsplashSource {
    http_client: Client,
    access_key: Option<String>,
    base_url: String,
    /// Appended to each query (e.g. "Bangalore India")
    geography_terms: Vec<String>,
}

impl UnsplashSource {
    pub fn new(access_key: Option<String>, settings: &UnsplashSettings) -> Result<Self, SourceError> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            access_key: access_key.filter(|k| is_valid_key(k)),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            geography_terms: settings.geography_terms.clone(),
        })
    }

    pub fn from_config(config: &DiscoveryConfig) -> Result<Self, SourceError> {
        Self::new(config.unsplash_access_key.clone(), &config.unsplash)
    }

    /// Query with any missing geography terms appended
    fn qualified_query(&self, query: &str) -> String {
        let mut qualified = query.trim().to_string();
        for term in &self.geography_terms {
            if !contains_term(&qualified, term) {
                qualified.push(' ');
                qualified.push_str(term);
            }
        }
        qualified
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<ImageResult>, SourceError> {
        let access_key = self
            .access_key
            .as_deref()
            .ok_or_else(|| SourceError::NotAvailable("Unsplash access key not configured".to_string()))?;

        let qualified = self.qualified_query(query);
        let per_page = limit.clamp(1, MAX_PER_PAGE).to_string();
        let url = format!("{}/search/photos", self.base_url);

        debug!(query = %qualified, per_page = %per_page, "Querying Unsplash");

        let response = self
            .http_client
            .get(&url)
            .header(header::AUTHORIZATION, format!("Client-ID {}", access_key))
            .header("Accept-Version", "v1")
            .query(&[("query", qualified.as_str()), ("per_page", per_page.as_str())])
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Unsplash request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(format!("Failed to parse Unsplash response: {}", e)))?;

        Ok(parsed
            .results
            .into_iter()
            .filter_map(|photo| to_image_result(photo, query))
            .collect())
    }
}

#[async_trait]
impl ImageSource for UnsplashSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn is_available(&self) -> bool {
        self.access_key.is_some()
    }

    async fn search(&self, query: &str, options: SearchOptions) -> Vec<ImageResult> {
        match self.fetch(query, options.limit).await {
            Ok(results) => results,
            Err(e) => {
                error!(source = SOURCE_NAME, query, error = %e, "Image search failed");
                Vec::new()
            }
        }
    }
}

/// Map a provider photo; photos without any usable URL are skipped
fn to_image_result(photo: UnsplashPhoto, query: &str) -> Option<ImageResult> {
    let UnsplashPhoto {
        id,
        width,
        height,
        description,
        alt_description,
        urls,
        links,
        user,
        tags,
    } = photo;

    let url = urls.regular.or(urls.full)?;
    let tags: Vec<String> = tags.into_iter().map(|t| t.title).collect();
    let score = initial_relevance(
        query,
        description.as_deref(),
        alt_description.as_deref(),
        &tags,
    );

    let author = user
        .and_then(|u| u.name.or(u.username))
        .unwrap_or_else(|| "Unknown".to_string());

    debug!(photo_id = %id, score, "Mapped Unsplash photo");

    Some(ImageResult {
        url,
        thumbnail_url: urls.thumb.or(urls.small),
        width,
        height,
        attribution: Attribution {
            author,
            source: SOURCE_NAME.to_string(),
            license: Some(LICENSE.to_string()),
            source_url: links.and_then(|l| l.html),
        },
        relevance_score: score,
        tags,
        metadata: None,
    })
}

/// Initial relevance from query containment in the photo's text
pub fn initial_relevance(
    query: &str,
    description: Option<&str>,
    alt_description: Option<&str>,
    tags: &[String],
) -> Score {
    let query = query.trim().to_lowercase();
    let mut score = 0.5;

    if query.is_empty() {
        return score;
    }

    if description.is_some_and(|d| d.to_lowercase().contains(&query)) {
        score += 0.3;
    }
    if alt_description.is_some_and(|a| a.to_lowercase().contains(&query)) {
        score += 0.2;
    }

    let tag_boost: f64 = tags
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty() && (query.contains(t.as_str()) || t.contains(&query)))
        .map(|_| 0.1)
        .sum();
    score += tag_boost.min(0.3);

    clamp_score(score)
}
