//! Image validation and quality scoring
//!
//! [`ImageValidator::validate_image`] is a short-circuit AND of four checks:
//! 1. content: no banned terms in tags or attribution
//! 2. visual style: no illustration / render / clipart tags, except for artistic venues
//! 3. dimensions: at least 400x300, aspect ratio within [0.333, 3.0]
//! 4. relevance: no avoid terms, no competitor brands without the place's own brand
//!
//! Rejections are silent (logged at debug); nothing is retried with a relaxed policy.

use crate::config::{brand_rule_for, BrandRule, DiscoveryConfig};
use crate::text::{contains_word, normalize};
use crate::types::{clamp_score, ImageResult, PlaceForSearch, Score};
use tracing::debug;

/// Terms that disqualify an image outright
const BANNED_TERMS: &[&str] = &[
    "nsfw", "nude", "naked", "explicit", "gore", "violence", "weapon", "drugs", "blood", "sexy",
];

/// Tags marking an image as non-photographic
const NON_PHOTO_TERMS: &[&str] = &[
    "illustration",
    "cartoon",
    "render",
    "3d render",
    "clipart",
    "clip art",
    "vector",
    "drawing",
    "stock photo",
    "painting",
    "sketch",
    "digital art",
    "anime",
];

/// Establishment types allowed non-photographic images
const ARTISTIC_TYPES: &[&str] = &["art-gallery", "museum", "creative-space", "studio"];
const ARTISTIC_CATEGORIES: &[&str] = &["arts & culture", "creative spaces"];

pub const MIN_WIDTH: u32 = 400;
pub const MIN_HEIGHT: u32 = 300;
pub const MIN_ASPECT_RATIO: f64 = 0.333;
pub const MAX_ASPECT_RATIO: f64 = 3.0;

/// Sources whose photos get a reputation bonus
const PROFESSIONAL_SOURCES: &[&str] = &["unsplash", "pexels", "pixabay", "flickr", "getty images"];

/// Tag counts considered informative but not noisy
const GOOD_TAG_RANGE: std::ops::RangeInclusive<usize> = 4..=9;

/// Validates candidate images and scores their technical quality
#[derive(Debug, Clone)]
pub struct ImageValidator {
    brand_rules: Vec<BrandRule>,
}

impl Default for ImageValidator {
    fn default() -> Self {
        Self::from_config(&DiscoveryConfig::default())
    }
}

impl ImageValidator {
    pub fn new(brand_rules: Vec<BrandRule>) -> Self {
        Self { brand_rules }
    }

    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self::new(config.brand_rules.clone())
    }

    /// Whether `image` is acceptable for `place`
    pub fn validate_image(&self, image: &ImageResult, place: &PlaceForSearch) -> bool {
        let verdict = if !is_appropriate(image) {
            Err("inappropriate content")
        } else if !passes_visual_style(image, place) {
            Err("non-photographic style")
        } else if !has_valid_dimensions(image) {
            Err("dimensions out of range")
        } else if !self.is_relevant(image, place) {
            Err("conflicting tags")
        } else {
            Ok(())
        };

        match verdict {
            Ok(()) => true,
            Err(reason) => {
                debug!(url = %image.url, place = %place.name, reason, "Image rejected");
                false
            }
        }
    }

    /// Avoid terms and competitor brands
    ///
    /// A competitor tag is tolerated when the place's own brand or name is also tagged
    /// (e.g. a street shot showing both storefronts).
    pub fn is_relevant(&self, image: &ImageResult, place: &PlaceForSearch) -> bool {
        if place.avoid_terms().iter().any(|term| image.tags_mention(term)) {
            return false;
        }

        let Some(rule) = brand_rule_for(&self.brand_rules, place) else {
            return true;
        };
        let mentions_competitor = rule.competitors.iter().any(|c| image.tags_mention(c));
        if !mentions_competitor {
            return true;
        }

        place
            .brand()
            .into_iter()
            .chain(place.parent_brand())
            .chain(std::iter::once(place.name.trim()))
            .any(|own| image.tags_mention(own))
    }
}

/// No banned term in tags or attribution
pub fn is_appropriate(image: &ImageResult) -> bool {
    let text = image.descriptive_text();
    !BANNED_TERMS.iter().any(|term| contains_word(&text, term))
}

/// Artistic venues accept illustrations and renders
pub fn is_artistic_place(place: &PlaceForSearch) -> bool {
    let type_match = place
        .establishment_type()
        .is_some_and(|t| ARTISTIC_TYPES.iter().any(|a| normalize(a) == normalize(t)));
    let category_match = place
        .category()
        .is_some_and(|c| ARTISTIC_CATEGORIES.contains(&normalize(c).as_str()));
    type_match || category_match
}

pub fn passes_visual_style(image: &ImageResult, place: &PlaceForSearch) -> bool {
    if is_artistic_place(place) {
        return true;
    }
    !image
        .tags
        .iter()
        .any(|tag| NON_PHOTO_TERMS.iter().any(|term| contains_word(tag, term)))
}

/// Size floor and aspect band; images without dimensions pass
pub fn has_valid_dimensions(image: &ImageResult) -> bool {
    let (Some(width), Some(height)) = (image.width, image.height) else {
        return true;
    };
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        return false;
    }
    image
        .aspect_ratio()
        .is_some_and(|ratio| (MIN_ASPECT_RATIO..=MAX_ASPECT_RATIO).contains(&ratio))
}

/// Technical quality in [0, 1], independent of the place
///
/// # Algorithm
/// - base 0.5
/// - +0.2 at full HD (1920x1080) or above, +0.1 at HD (1280x720)
/// - +0.1 for a professional stock source
/// - +0.1 when the tag count is within 4..=9
pub fn score_image_quality(image: &ImageResult) -> Score {
    let mut score = 0.5;

    if let (Some(width), Some(height)) = (image.width, image.height) {
        if width >= 1920 && height >= 1080 {
            score += 0.2;
        } else if width >= 1280 && height >= 720 {
            score += 0.1;
        }
    }

    let source = image.attribution.source.trim().to_lowercase();
    if PROFESSIONAL_SOURCES.contains(&source.as_str()) {
        score += 0.1;
    }

    if GOOD_TAG_RANGE.contains(&image.tags.len()) {
        score += 0.1;
    }

    clamp_score(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::image;
    use crate::types::{PlaceMetadata, SearchHints};

    fn sized(width: u32, height: u32) -> ImageResult {
        image("https://x/a.jpg", 0.5, 1600, &[]).with_dimensions(width, height)
    }

    #[test]
    fn test_dimension_property() {
        let place = PlaceForSearch::new("Ulsoor Lake");
        let validator = ImageValidator::default();
        let widths = [100, 399, 400, 800, 1200, 1600, 3000, 6000];
        let heights = [100, 299, 300, 600, 1000, 2000, 4000];

        for &w in &widths {
            for &h in &heights {
                let ratio = f64::from(w) / f64::from(h);
                let expected = w >= 400 && h >= 300 && (0.333..=3.0).contains(&ratio);
                assert_eq!(
                    validator.validate_image(&sized(w, h), &place),
                    expected,
                    "{}x{}",
                    w,
                    h
                );
            }
        }
    }

    #[test]
    fn test_missing_dimensions_pass() {
        let mut img = image("https://x/a.jpg", 0.5, 1600, &[]);
        img.width = None;
        img.height = None;
        assert!(has_valid_dimensions(&img));
    }

    #[test]
    fn test_banned_terms_rejected() {
        let place = PlaceForSearch::new("Toit");
        let validator = ImageValidator::default();
        assert!(!validator.validate_image(&image("u", 0.5, 1600, &["bar", "NSFW"]), &place));
        assert!(validator.validate_image(&image("u", 0.5, 1600, &["gorewada", "lake"]), &place));
    }

    #[test]
    fn test_illustrations_rejected_except_for_artistic_places() {
        let validator = ImageValidator::default();
        let drawing = image("u", 0.5, 1600, &["gallery", "illustration"]);

        assert!(!validator.validate_image(&drawing, &PlaceForSearch::new("Toit")));
        assert!(validator.validate_image(
            &drawing,
            &PlaceForSearch::new("Gallery G").with_establishment_type("art-gallery")
        ));
        assert!(validator.validate_image(
            &drawing,
            &PlaceForSearch::new("Rangoli").with_category("Arts & Culture")
        ));
    }

    #[test]
    fn test_competitor_property() {
        let validator = ImageValidator::default();
        let place = PlaceForSearch::new("Corner House Ice Cream").with_brand("Corner House");

        for competitor in ["Baskin Robbins", "Naturals", "Amul", "Cream Stone", "Polar Bear"] {
            let rival = image("u", 0.5, 1600, &["ice cream", competitor]);
            assert!(!validator.validate_image(&rival, &place), "{}", competitor);

            let both = image("u", 0.5, 1600, &["corner house", competitor]);
            assert!(validator.validate_image(&both, &place), "{} with own brand", competitor);
        }
    }

    #[test]
    fn test_avoid_terms_rejected() {
        let validator = ImageValidator::default();
        let place = PlaceForSearch::new("Ulsoor Lake").with_metadata(PlaceMetadata {
            business_info: None,
            search_hints: Some(SearchHints {
                avoid_terms: vec!["swimming pool".to_string()],
                ..Default::default()
            }),
        });
        assert!(!validator.validate_image(&image("u", 0.5, 1600, &["Swimming Pool"]), &place));
        assert!(validator.validate_image(&image("u", 0.5, 1600, &["lake"]), &place));
    }

    #[test]
    fn test_quality_in_unit_range_and_monotonic_in_resolution() {
        let tag_sets: [&[&str]; 3] = [&[], &["a", "b", "c", "d"], &["a"; 12]];
        for tags in tag_sets {
            for source in ["Unsplash", "Someone's blog"] {
                let mut sub_hd = image("u", 0.5, 1600, tags).with_dimensions(1024, 768);
                sub_hd.attribution.source = source.to_string();
                let mut hd = sub_hd.clone().with_dimensions(1280, 720);
                let mut full_hd = sub_hd.clone().with_dimensions(1920, 1080);
                hd.attribution.source = source.to_string();
                full_hd.attribution.source = source.to_string();

                let (a, b, c) = (
                    score_image_quality(&sub_hd),
                    score_image_quality(&hd),
                    score_image_quality(&full_hd),
                );
                for s in [a, b, c] {
                    assert!((0.0..=1.0).contains(&s));
                }
                assert!(b > a);
                assert!(c > b);
            }
        }
    }

    #[test]
    fn test_quality_components() {
        let img = image("u", 0.5, 1920, &["a", "b", "c", "d", "e"]).with_dimensions(1920, 1080);
        assert!((score_image_quality(&img) - 0.9).abs() < 1e-9);
    }
}
