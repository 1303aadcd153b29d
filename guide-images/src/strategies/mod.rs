//! Query strategies
//!
//! A strategy turns a place into an ordered list of search queries and knows
//! how to score a returned image against that place. The set is closed and
//! tried in fixed priority order:
//!
//! 1. [`QueryStrategy::BrandedEstablishment`] - brand / chain places
//! 2. [`QueryStrategy::LocalLandmark`] - stations, temples, parks, lakes, markets
//! 3. [`QueryStrategy::GenericPlace`] - always applicable
//!
//! Every applicable strategy is tried, not just the first match.

mod branded;
mod generic;
mod landmark;
pub mod manager;

pub use manager::{StrategyManager, StrategySettings};

use crate::config::{BrandRule, DiscoveryConfig, LocationContext};
use crate::text::contains_term;
use crate::types::{ImageResult, ImageSearchMetadata, PlaceForSearch};
use serde::Serialize;

/// Per-call context shared by all strategies
#[derive(Debug, Clone)]
pub struct StrategyContext {
    pub location: LocationContext,
    pub brand_rules: Vec<BrandRule>,
}

impl StrategyContext {
    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self {
            location: config.location.clone(),
            brand_rules: config.brand_rules.clone(),
        }
    }

    /// Override the city used to qualify queries
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.location.city = city.into();
        self
    }
}

impl Default for StrategyContext {
    fn default() -> Self {
        Self::from_config(&DiscoveryConfig::default())
    }
}

/// Closed set of query strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStrategy {
    BrandedEstablishment,
    LocalLandmark,
    GenericPlace,
}

impl QueryStrategy {
    /// All strategies in priority order
    pub const ALL: [QueryStrategy; 3] = [
        QueryStrategy::BrandedEstablishment,
        QueryStrategy::LocalLandmark,
        QueryStrategy::GenericPlace,
    ];

    /// Lower runs first
    pub fn priority(self) -> u8 {
        match self {
            QueryStrategy::BrandedEstablishment => 1,
            QueryStrategy::LocalLandmark => 2,
            QueryStrategy::GenericPlace => 3,
        }
    }

    /// Name recorded in result metadata
    pub fn name(self) -> &'static str {
        match self {
            QueryStrategy::BrandedEstablishment => "branded",
            QueryStrategy::LocalLandmark => "landmark",
            QueryStrategy::GenericPlace => "generic",
        }
    }

    pub fn is_applicable(self, place: &PlaceForSearch) -> bool {
        match self {
            QueryStrategy::BrandedEstablishment => branded::is_applicable(place),
            QueryStrategy::LocalLandmark => landmark::is_applicable(place),
            QueryStrategy::GenericPlace => true,
        }
    }

    /// Ordered, de-duplicated candidate queries
    pub fn generate_queries(self, place: &PlaceForSearch, ctx: &StrategyContext) -> Vec<String> {
        match self {
            QueryStrategy::BrandedEstablishment => branded::generate_queries(place, ctx),
            QueryStrategy::LocalLandmark => landmark::generate_queries(place, ctx),
            QueryStrategy::GenericPlace => generic::generate_queries(place, ctx),
        }
    }

    /// Final search string for `query`
    pub fn enhance_query(self, query: &str, place: &PlaceForSearch, ctx: &StrategyContext) -> String {
        match self {
            QueryStrategy::LocalLandmark => landmark::enhance_query(query, place, ctx),
            QueryStrategy::BrandedEstablishment | QueryStrategy::GenericPlace => {
                default_enhance_query(query, place, ctx)
            }
        }
    }

    /// Re-score `image` for this place; returns a new value with strategy metadata
    pub fn score_result(
        self,
        image: ImageResult,
        place: &PlaceForSearch,
        ctx: &StrategyContext,
        query: &str,
    ) -> ImageResult {
        let mut scorer = TermScorer::new(&image);
        match self {
            QueryStrategy::BrandedEstablishment => branded::score(&mut scorer, place, ctx),
            QueryStrategy::LocalLandmark => landmark::score(&mut scorer, place, ctx),
            QueryStrategy::GenericPlace => generic::score(&mut scorer, place, ctx),
        }
        scorer.apply_search_hints(place);
        let (score, matched_terms) = scorer.finish();

        image
            .with_relevance(score)
            .with_search_metadata(ImageSearchMetadata {
                strategy: self.name().to_string(),
                query: Some(query.to_string()),
                matched_terms,
            })
    }
}

/// Strategies applicable to `place`, in priority order
pub fn applicable_strategies(place: &PlaceForSearch) -> Vec<QueryStrategy> {
    QueryStrategy::ALL
        .into_iter()
        .filter(|s| s.is_applicable(place))
        .collect()
}

/// Append the place's location qualifiers, or the city when it has none
pub fn default_enhance_query(query: &str, place: &PlaceForSearch, ctx: &StrategyContext) -> String {
    let qualifiers = place.location_qualifiers();
    if qualifiers.is_empty() {
        return append_missing(query, [ctx.location.city.as_str()]);
    }
    append_missing(query, qualifiers.iter().map(String::as_str))
}

/// Append each term not already contained in `query`
pub(crate) fn append_missing<'a>(query: &str, terms: impl IntoIterator<Item = &'a str>) -> String {
    let mut enhanced = query.trim().to_string();
    for term in terms {
        let term = term.trim();
        if !term.is_empty() && !contains_term(&enhanced, term) {
            enhanced.push(' ');
            enhanced.push_str(term);
        }
    }
    enhanced
}

// ============================================================================
// Tag scoring
// ============================================================================

/// Accumulates tag-match adjustments on top of the source's base score
pub(crate) struct TermScorer<'a> {
    image: &'a ImageResult,
    score: f64,
    matched: Vec<String>,
}

/// Boost per must-include term, and the cap on their total
const MUST_INCLUDE_BOOST: f64 = 0.05;
const MUST_INCLUDE_CAP: f64 = 0.15;
/// Penalty per avoid term found in the tags
const AVOID_PENALTY: f64 = 0.3;

impl<'a> TermScorer<'a> {
    fn new(image: &'a ImageResult) -> Self {
        Self {
            image,
            score: image.relevance_score,
            matched: Vec::new(),
        }
    }

    /// Add `amount` if the tags mention `term`
    pub(crate) fn boost(&mut self, term: &str, amount: f64) -> bool {
        if self.image.tags_mention(term) {
            self.score += amount;
            self.matched.push(term.to_string());
            true
        } else {
            false
        }
    }

    /// `each` per matching term, total capped at `cap`
    pub(crate) fn boost_each<'t>(
        &mut self,
        terms: impl IntoIterator<Item = &'t str>,
        each: f64,
        cap: f64,
    ) {
        let mut total = 0.0;
        for term in terms {
            if total + each > cap + f64::EPSILON {
                break;
            }
            if self.boost(term, each) {
                total += each;
            }
        }
    }

    /// Boost once if any of `terms` matches
    pub(crate) fn boost_any<'t>(&mut self, terms: impl IntoIterator<Item = &'t str>, amount: f64) {
        for term in terms {
            if self.boost(term, amount) {
                return;
            }
        }
    }

    fn apply_search_hints(&mut self, place: &PlaceForSearch) {
        self.boost_each(
            place.must_include().iter().map(String::as_str),
            MUST_INCLUDE_BOOST,
            MUST_INCLUDE_CAP,
        );
        for term in place.avoid_terms() {
            if self.image.tags_mention(term) {
                self.score -= AVOID_PENALTY;
            }
        }
    }

    fn finish(self) -> (f64, Vec<String>) {
        (self.score, self.matched)
    }
}

/// Words of `text` long enough to be distinctive (>= 4 chars)
pub(crate) fn significant_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 4)
        .map(str::to_lowercase)
        .collect()
}
