//! Bundled placeholder images
//!
//! Used only when every real search path has come back empty. The assets live
//! in the web bundle under `/images/fallbacks/`; this module just names them.
//!
//! Lookup: establishment type, then category, then the neighborhood default.

use crate::text::normalize;
use crate::types::{Attribution, ImageResult, ImageSearchMetadata, PlaceForSearch, Score};

/// Fixed relevance of a fallback; below any validated real photo
pub const FALLBACK_SCORE: Score = 0.3;

const FALLBACK_AUTHOR: &str = "Neighborhood Guide";
const FALLBACK_SOURCE: &str = "Local Asset";

/// One bundled placeholder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackEntry {
    pub path: &'static str,
    pub caption: &'static str,
    pub categories: &'static [&'static str],
    pub establishment_types: &'static [&'static str],
}

const FALLBACK_TABLE: &[FallbackEntry] = &[
    FallbackEntry {
        path: "/images/fallbacks/metro-station.jpg",
        caption: "Namma Metro station",
        categories: &["Transit"],
        establishment_types: &["metro-station", "railway-station", "bus-station"],
    },
    FallbackEntry {
        path: "/images/fallbacks/ice-cream.jpg",
        caption: "Ice cream and desserts",
        categories: &["Desserts"],
        establishment_types: &["ice-cream-parlor", "dessert-shop", "bakery"],
    },
    FallbackEntry {
        path: "/images/fallbacks/restaurant.jpg",
        caption: "Restaurant table",
        categories: &["Food & Dining"],
        establishment_types: &[
            "restaurant",
            "south-indian-restaurant",
            "north-indian-restaurant",
            "fine-dining",
        ],
    },
    FallbackEntry {
        path: "/images/fallbacks/cafe.jpg",
        caption: "Coffee and conversation",
        categories: &["Cafes"],
        establishment_types: &["cafe", "coffee-shop"],
    },
    FallbackEntry {
        path: "/images/fallbacks/nightlife.jpg",
        caption: "Evening out",
        categories: &["Nightlife"],
        establishment_types: &["pub", "brewery", "bar", "cafe-bar"],
    },
    FallbackEntry {
        path: "/images/fallbacks/park.jpg",
        caption: "Green space",
        categories: &["Parks & Nature"],
        establishment_types: &["park", "lake", "garden"],
    },
    FallbackEntry {
        path: "/images/fallbacks/temple.jpg",
        caption: "Place of worship",
        categories: &["Heritage"],
        establishment_types: &["temple", "church", "mosque", "place-of-worship", "monument"],
    },
    FallbackEntry {
        path: "/images/fallbacks/market.jpg",
        caption: "Market street",
        categories: &["Shopping"],
        establishment_types: &["market", "mall", "boutique"],
    },
    FallbackEntry {
        path: "/images/fallbacks/gallery.jpg",
        caption: "Gallery wall",
        categories: &["Arts & Culture", "Creative Spaces"],
        establishment_types: &["art-gallery", "museum", "creative-space", "studio"],
    },
];

const DEFAULT_ENTRY: FallbackEntry = FallbackEntry {
    path: "/images/fallbacks/indiranagar-default.jpg",
    caption: "Indiranagar",
    categories: &[],
    establishment_types: &[],
};

/// Supplies a placeholder image for any place
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackProvider;

impl FallbackProvider {
    pub fn new() -> Self {
        Self
    }

    /// Table entry for `place`: by type, then category, then default
    pub fn entry_for(&self, place: &PlaceForSearch) -> &'static FallbackEntry {
        let by_type = place.establishment_type().map(normalize).and_then(|kind| {
            FALLBACK_TABLE
                .iter()
                .find(|e| e.establishment_types.iter().any(|t| normalize(t) == kind))
        });
        let by_category = || {
            place.category().map(normalize).and_then(|category| {
                FALLBACK_TABLE
                    .iter()
                    .find(|e| e.categories.iter().any(|c| normalize(c) == category))
            })
        };

        by_type.or_else(by_category).unwrap_or(&DEFAULT_ENTRY)
    }

    /// Placeholder image for `place`; never fails
    pub fn get_fallback_image(&self, place: &PlaceForSearch) -> ImageResult {
        let entry = self.entry_for(place);
        let tags = [
            "fallback",
            place.category().unwrap_or("place"),
            place.establishment_type().unwrap_or("general"),
        ];

        ImageResult::new(
            entry.path,
            Attribution {
                author: FALLBACK_AUTHOR.to_string(),
                source: FALLBACK_SOURCE.to_string(),
                license: None,
                source_url: None,
            },
            FALLBACK_SCORE,
        )
        .with_tags(tags)
        .with_search_metadata(ImageSearchMetadata {
            strategy: "fallback".to_string(),
            query: None,
            matched_terms: vec![entry.caption.to_string()],
        })
    }
}
