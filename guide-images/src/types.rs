//! Core types for image discovery
//!
//! - [`PlaceForSearch`]: the projection of a point of interest used to drive queries
//! - [`ImageResult`]: one candidate photo with attribution and a relevance score
//!
//! Scores are plain values. Each pipeline stage derives a new [`ImageResult`]
//! (`with_relevance`) instead of mutating a shared one.

use serde::{Deserialize, Serialize};

use crate::text::{contains_term, non_blank};

/// Relevance / quality score (0.0-1.0)
pub type Score = f64;

/// Clamp a score to the unit interval (NaN collapses to 0.0)
pub fn clamp_score(score: f64) -> Score {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

// ============================================================================
// Place input
// ============================================================================

/// Place description used to search for photos
///
/// Everything except `name` is optional. A place carrying none of the
/// optional fields is only handled by the generic strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceForSearch {
    /// Display name (e.g. "Corner House Ice Cream")
    pub name: String,
    /// Brand name for branded establishments (e.g. "Corner House")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    /// Establishment type tag (e.g. "metro-station", "ice-cream-parlor")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub establishment_type: Option<String>,
    /// Free-text category (e.g. "Food & Dining")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Extra search keywords
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub search_keywords: Vec<String>,
    /// Structured business info and search hints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PlaceMetadata>,
}

/// Structured place metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_info: Option<BusinessInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_hints: Option<SearchHints>,
}

impl PlaceMetadata {
    /// True when neither section carries any information
    pub fn is_empty(&self) -> bool {
        let business_empty = self
            .business_info
            .as_ref()
            .map_or(true, |b| !b.is_chain && non_blank(b.parent_brand.as_deref()).is_none());
        let hints_empty = self.search_hints.as_ref().map_or(true, SearchHints::is_empty);
        business_empty && hints_empty
    }
}

/// Business info for chains and franchises
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessInfo {
    pub is_chain: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_brand: Option<String>,
}

/// Curator-supplied hints for query generation and filtering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchHints {
    /// Terms a good photo should mention
    pub must_include: Vec<String>,
    /// Terms that disqualify a photo
    pub avoid_terms: Vec<String>,
    /// Location qualifiers appended to queries (e.g. "Indiranagar", "100 Feet Road")
    pub location_qualifiers: Vec<String>,
}

impl SearchHints {
    pub fn is_empty(&self) -> bool {
        self.must_include.is_empty()
            && self.avoid_terms.is_empty()
            && self.location_qualifiers.is_empty()
    }
}

impl PlaceForSearch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand_name = Some(brand.into());
        self
    }

    pub fn with_establishment_type(mut self, establishment_type: impl Into<String>) -> Self {
        self.establishment_type = Some(establishment_type.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_metadata(mut self, metadata: PlaceMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Brand name, ignoring blank values
    pub fn brand(&self) -> Option<&str> {
        non_blank(self.brand_name.as_deref())
    }

    pub fn establishment_type(&self) -> Option<&str> {
        non_blank(self.establishment_type.as_deref())
    }

    pub fn category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> + '_ {
        self.search_keywords
            .iter()
            .map(String::as_str)
            .filter(|k| !k.trim().is_empty())
    }

    pub fn parent_brand(&self) -> Option<&str> {
        self.business_info()
            .and_then(|b| non_blank(b.parent_brand.as_deref()))
    }

    pub fn is_chain(&self) -> bool {
        self.business_info().is_some_and(|b| b.is_chain)
    }

    pub fn must_include(&self) -> &[String] {
        self.search_hints()
            .map(|h| h.must_include.as_slice())
            .unwrap_or_default()
    }

    pub fn avoid_terms(&self) -> &[String] {
        self.search_hints()
            .map(|h| h.avoid_terms.as_slice())
            .unwrap_or_default()
    }

    pub fn location_qualifiers(&self) -> &[String] {
        self.search_hints()
            .map(|h| h.location_qualifiers.as_slice())
            .unwrap_or_default()
    }

    /// Whether the place carries anything beyond its name
    ///
    /// Decides between the strategy pipeline and the plain legacy search.
    pub fn has_enhanced_metadata(&self) -> bool {
        self.brand().is_some()
            || self.establishment_type().is_some()
            || self.metadata.as_ref().is_some_and(|m| !m.is_empty())
            || self.keywords().next().is_some()
    }

    fn business_info(&self) -> Option<&BusinessInfo> {
        self.metadata.as_ref().and_then(|m| m.business_info.as_ref())
    }

    fn search_hints(&self) -> Option<&SearchHints> {
        self.metadata.as_ref().and_then(|m| m.search_hints.as_ref())
    }
}

// ============================================================================
// Image results
// ============================================================================

/// Photo attribution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    /// Photographer / author name
    pub author: String,
    /// Provider name (e.g. "Unsplash")
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Page on the provider's site for the photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// Provenance of a scored result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSearchMetadata {
    /// Strategy that produced the result ("branded", "landmark", "generic", "legacy", "fallback")
    pub strategy: String,
    /// Final search string sent to the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Place terms found in the image tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_terms: Vec<String>,
}

/// Candidate image for a place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub attribution: Attribution,
    /// Relevance to the place (0.0-1.0)
    pub relevance_score: Score,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ImageSearchMetadata>,
}

impl ImageResult {
    /// Create a result with the given URL and score (clamped)
    pub fn new(url: impl Into<String>, attribution: Attribution, relevance_score: Score) -> Self {
        Self {
            url: url.into(),
            thumbnail_url: None,
            width: None,
            height: None,
            attribution,
            relevance_score: clamp_score(relevance_score),
            tags: Vec::new(),
            metadata: None,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Same image with a re-derived relevance score (clamped)
    pub fn with_relevance(mut self, score: Score) -> Self {
        self.relevance_score = clamp_score(score);
        self
    }

    pub fn with_search_metadata(mut self, metadata: ImageSearchMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Whether any tag mentions `term` (case-insensitive, hyphens as spaces)
    pub fn tags_mention(&self, term: &str) -> bool {
        self.tags.iter().any(|tag| contains_term(tag, term))
    }

    /// Tags plus attribution, lowercased, for content screening
    pub fn descriptive_text(&self) -> String {
        let mut parts: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        parts.push(&self.attribution.author);
        parts.push(&self.attribution.source);
        parts.join(" ").to_lowercase()
    }

    /// width / height, when both are known and height is non-zero
    pub fn aspect_ratio(&self) -> Option<f64> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if h > 0 => Some(f64::from(w) / f64::from(h)),
            _ => None,
        }
    }
}
