//! Strategy-driven search
//!
//! Runs every applicable strategy in priority order. For each generated query
//! the enhanced search string is fanned out to all sources and each result is
//! re-scored by the strategy. Two stop rules bound the work:
//!
//! - within a strategy, stop issuing queries once the number of results
//!   scoring above `high_quality_threshold` reaches the limit
//! - across strategies, stop once `limit * stop_multiplier` results are collected
//!
//! The collected set is then de-duplicated, ranked and truncated.

use super::{applicable_strategies, StrategyContext};
use crate::config::DiscoveryConfig;
use crate::ranking::rank_and_dedupe;
use crate::sources::{search_all, ImageSource};
use crate::types::{ImageResult, PlaceForSearch};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Stop-early and ranking tunables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategySettings {
    pub high_quality_threshold: f64,
    pub stop_multiplier: usize,
    pub tie_break_window: f64,
}

impl StrategySettings {
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self {
            high_quality_threshold: config.high_quality_threshold,
            stop_multiplier: config.strategy_stop_multiplier.max(1),
            tie_break_window: config.tie_break_window,
        }
    }
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self::from_config(&DiscoveryConfig::default())
    }
}

/// Executes the strategy pipeline against a set of sources
#[derive(Debug, Clone, Default)]
pub struct StrategyManager {
    settings: StrategySettings,
}

impl StrategyManager {
    pub fn new(settings: StrategySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &StrategySettings {
        &self.settings
    }

    /// Search for up to `limit` images of `place`
    pub async fn search(
        &self,
        place: &PlaceForSearch,
        sources: &[Arc<dyn ImageSource>],
        ctx: &StrategyContext,
        limit: usize,
        timeout: Duration,
    ) -> Vec<ImageResult> {
        let mut collected: Vec<ImageResult> = Vec::new();
        let enough = limit.saturating_mul(self.settings.stop_multiplier);

        for strategy in applicable_strategies(place) {
            let queries = strategy.generate_queries(place, ctx);
            if queries.is_empty() {
                debug!(strategy = strategy.name(), place = %place.name, "Strategy produced no queries");
                continue;
            }

            for query in &queries {
                let search_query = strategy.enhance_query(query, place, ctx);
                let raw = search_all(sources, &search_query, limit, timeout).await;
                debug!(
                    strategy = strategy.name(),
                    query = %search_query,
                    count = raw.len(),
                    "Strategy query complete"
                );

                collected.extend(
                    raw.into_iter()
                        .map(|image| strategy.score_result(image, place, ctx, &search_query)),
                );

                let high_quality = collected
                    .iter()
                    .filter(|i| i.relevance_score > self.settings.high_quality_threshold)
                    .count();
                if high_quality >= limit {
                    debug!(strategy = strategy.name(), high_quality, "Enough high-quality results");
                    break;
                }
            }

            if collected.len() >= enough {
                debug!(collected = collected.len(), "Skipping remaining strategies");
                break;
            }
        }

        rank_and_dedupe(collected, limit, self.settings.tie_break_window)
    }
}
