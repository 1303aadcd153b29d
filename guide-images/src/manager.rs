//! Image Source Manager
//!
//! Entry point for image discovery. Chooses between:
//!
//! - **Strategy path** (place carries brand, type, keywords or metadata):
//!   strategies → validation → quality weighting → re-rank. Empty output falls
//!   through to a legacy search on the name, then to the bundled fallback image.
//! - **Legacy path** (name only): the literal name fanned out to all sources,
//!   de-duplicated and ranked. May return an empty list.
//!
//! With no available sources at all, both paths return empty.

use crate::config::DiscoveryConfig;
use crate::fallback::FallbackProvider;
use crate::ranking::rank_and_dedupe;
use crate::sources::{search_all, ImageSource, UnsplashSource};
use crate::strategies::{StrategyContext, StrategyManager, StrategySettings};
use crate::types::{ImageResult, ImageSearchMetadata, PlaceForSearch};
use crate::validator::{score_image_quality, ImageValidator};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Per-call options for [`ImageSourceManager::find_images`]
#[derive(Debug, Clone, Default)]
pub struct FindImagesOptions {
    /// Structured place description; enables the strategy path
    pub place: Option<PlaceForSearch>,
    /// City override for query qualification
    pub location: Option<String>,
    /// Maximum results (config default when unset)
    pub limit: Option<usize>,
    /// Per-source timeout (config default when unset)
    pub timeout: Option<Duration>,
}

/// Facade over sources, strategies, validator and fallback
pub struct ImageSourceManager {
    sources: Vec<Arc<dyn ImageSource>>,
    strategies: StrategyManager,
    validator: ImageValidator,
    fallback: FallbackProvider,
    context: StrategyContext,
    default_limit: usize,
    default_timeout: Duration,
}

impl ImageSourceManager {
    /// Build with the configured sources (currently Unsplash)
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        let mut sources: Vec<Arc<dyn ImageSource>> = Vec::new();
        match UnsplashSource::from_config(config) {
            Ok(source) => sources.push(Arc::new(source)),
            Err(e) => warn!(error = %e, "Failed to initialize Unsplash source"),
        }
        Self::with_sources(config, sources)
    }

    /// Build with explicit sources; unavailable ones are dropped here, once
    pub fn with_sources(config: &DiscoveryConfig, sources: Vec<Arc<dyn ImageSource>>) -> Self {
        let sources: Vec<Arc<dyn ImageSource>> = sources
            .into_iter()
            .filter(|source| {
                let available = source.is_available();
                if !available {
                    info!(source = source.name(), "Image source unavailable, excluded");
                }
                available
            })
            .collect();

        info!(count = sources.len(), "Image sources initialized");

        Self {
            sources,
            strategies: StrategyManager::new(StrategySettings::from_config(config)),
            validator: ImageValidator::from_config(config),
            fallback: FallbackProvider::new(),
            context: StrategyContext::from_config(config),
            default_limit: config.default_limit.max(1),
            default_timeout: config.timeout(),
        }
    }

    pub fn available_source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Find up to `limit` images for a place
    pub async fn find_images(&self, place_name: &str, options: FindImagesOptions) -> Vec<ImageResult> {
        if self.sources.is_empty() {
            warn!(place = place_name, "No image sources available");
            return Vec::new();
        }

        let limit = options.limit.filter(|&l| l > 0).unwrap_or(self.default_limit);
        let timeout = options.timeout.unwrap_or(self.default_timeout);

        match options.place.filter(PlaceForSearch::has_enhanced_metadata) {
            Some(place) => {
                let ctx = match options.location.as_deref().map(str::trim) {
                    Some(city) if !city.is_empty() => self.context.clone().with_city(city),
                    _ => self.context.clone(),
                };
                self.find_with_strategies(place_name, &place, &ctx, limit, timeout)
                    .await
            }
            None => self.legacy_search(place_name, limit, timeout).await,
        }
    }

    async fn find_with_strategies(
        &self,
        place_name: &str,
        place: &PlaceForSearch,
        ctx: &StrategyContext,
        limit: usize,
        timeout: Duration,
    ) -> Vec<ImageResult> {
        let candidates = self
            .strategies
            .search(place, &self.sources, ctx, limit, timeout)
            .await;
        let found = candidates.len();

        let validated = self.validate_and_weight(candidates, place);
        debug!(place = %place.name, found, validated = validated.len(), "Strategy search complete");

        let ranked = rank_and_dedupe(validated, limit, self.strategies.settings().tie_break_window);
        if !ranked.is_empty() {
            return ranked;
        }

        info!(place = %place.name, "Strategy search empty, trying legacy search");
        let legacy = self.legacy_search(place_name, limit, timeout).await;
        let legacy = self.validate_and_weight(legacy, place);
        if !legacy.is_empty() {
            return rank_and_dedupe(legacy, limit, self.strategies.settings().tie_break_window);
        }

        info!(place = %place.name, "No images found, using fallback");
        vec![self.fallback.get_fallback_image(place)]
    }

    /// Drop rejected images and scale relevance by technical quality
    fn validate_and_weight(&self, images: Vec<ImageResult>, place: &PlaceForSearch) -> Vec<ImageResult> {
        images
            .into_iter()
            .filter(|image| self.validator.validate_image(image, place))
            .map(|image| {
                let weighted = image.relevance_score * score_image_quality(&image);
                image.with_relevance(weighted)
            })
            .collect()
    }

    /// Literal-name search across all sources
    async fn legacy_search(&self, place_name: &str, limit: usize, timeout: Duration) -> Vec<ImageResult> {
        let query = place_name.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let results = search_all(&self.sources, query, limit, timeout)
            .await
            .into_iter()
            .map(|image| {
                image.with_search_metadata(ImageSearchMetadata {
                    strategy: "legacy".to_string(),
                    query: Some(query.to_string()),
                    matched_terms: Vec::new(),
                })
            })
            .collect();

        rank_and_dedupe(results, limit, self.strategies.settings().tie_break_window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::FALLBACK_SCORE;
    use crate::sources::mock::{image, MockSource};

    fn manager(sources: Vec<Arc<dyn ImageSource>>) -> ImageSourceManager {
        ImageSourceManager::with_sources(&DiscoveryConfig::default(), sources)
    }

    fn metro_place() -> PlaceForSearch {
        PlaceForSearch::new("Indiranagar Metro Station").with_establishment_type("metro-station")
    }

    fn options_for(place: PlaceForSearch) -> FindImagesOptions {
        FindImagesOptions {
            place: Some(place),
            timeout: Some(Duration::from_millis(500)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_no_sources_returns_empty_without_fallback() {
        let mgr = manager(vec![Arc::new(MockSource::new("Off").unavailable())]);
        assert_eq!(mgr.available_source_count(), 0);

        let results = mgr
            .find_images("Indiranagar Metro Station", options_for(metro_place()))
            .await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_exhausted_search_returns_single_fallback() {
        let mgr = manager(vec![Arc::new(MockSource::new("Empty"))]);

        let results = mgr
            .find_images("Indiranagar Metro Station", options_for(metro_place()))
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0], FallbackProvider::new().get_fallback_image(&metro_place()));
        assert_eq!(results[0].relevance_score, FALLBACK_SCORE);
    }

    #[tokio::test]
    async fn test_strategy_path_validates_and_weights() {
        let good = image("https://x/good.jpg", 0.5, 1920, &["metro station", "bangalore"])
            .with_dimensions(1920, 1080);
        let tiny = image("https://x/tiny.jpg", 0.9, 200, &["metro station"]);
        let mgr = manager(vec![Arc::new(MockSource::new("Mock").returning(vec![good, tiny]))]);

        let results = mgr
            .find_images("Indiranagar Metro Station", options_for(metro_place()))
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://x/good.jpg");
        // Strategy score scaled by quality (< 1.0), so strictly below the raw strategy score
        assert!(results[0].relevance_score < 1.0);
        assert!(results[0].relevance_score > FALLBACK_SCORE);
    }

    #[tokio::test]
    async fn test_falls_through_to_legacy_before_fallback() {
        let mgr = manager(vec![Arc::new(MockSource::new("Mock").for_query(
            "Indiranagar Metro Station",
            vec![image("https://x/legacy.jpg", 0.6, 1600, &["station"])],
        ))]);

        let results = mgr
            .find_images("Indiranagar Metro Station", options_for(metro_place()))
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://x/legacy.jpg");
        assert_eq!(results[0].metadata.as_ref().unwrap().strategy, "legacy");
    }

    #[tokio::test]
    async fn test_legacy_path_for_name_only() {
        let mock = Arc::new(MockSource::new("Mock").returning(vec![
            image("http://x/a.jpg", 0.4, 1600, &[]),
            image("https://x/a.jpg", 0.7, 1600, &[]),
            image("https://x/b.jpg", 0.5, 1600, &[]),
        ]));
        let mgr = manager(vec![mock.clone()]);

        let results = mgr.find_images("Toit", FindImagesOptions::default()).await;

        assert_eq!(mock.calls(), vec!["Toit"]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://x/a.jpg");
    }

    #[tokio::test]
    async fn test_legacy_path_has_no_fallback() {
        let mgr = manager(vec![Arc::new(MockSource::new("Empty"))]);
        let place = PlaceForSearch::new("Toit").with_category("Nightlife");

        let results = mgr.find_images("Toit", options_for(place)).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_location_override_reaches_queries() {
        let mock = Arc::new(MockSource::new("Mock"));
        let mgr = manager(vec![mock.clone()]);
        let mut options = options_for(metro_place());
        options.location = Some("Bengaluru".to_string());

        mgr.find_images("Indiranagar Metro Station", options).await;

        let calls = mock.calls();
        assert_eq!(calls[0], "Indiranagar Metro Station Namma Metro Bengaluru");
    }

    #[tokio::test]
    async fn test_limit_respected() {
        let many = (0..10)
            .map(|i| image(&format!("https://x/{i}.jpg"), 0.5, 1600, &[]))
            .collect();
        let mgr = manager(vec![Arc::new(MockSource::new("Mock").returning(many))]);
        let options = FindImagesOptions {
            limit: Some(3),
            ..Default::default()
        };

        assert_eq!(mgr.find_images("Toit", options).await.len(), 3);
    }
}
