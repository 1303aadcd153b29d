//! Branded establishment strategy
//!
//! Applies to places with a brand, a parent brand or a chain flag. Queries
//! lead with the brand so that photos of the actual outlet outrank generic
//! shots of the cuisine.

use super::{significant_words, StrategyContext, TermScorer};
use crate::config::brand_rule_for;
use crate::text::push_unique;
use crate::types::PlaceForSearch;

const BRAND_BOOST: f64 = 0.25;
const NAME_BOOST: f64 = 0.1;
const TYPE_BOOST: f64 = 0.1;

pub(super) fn is_applicable(place: &PlaceForSearch) -> bool {
    place.brand().is_some() || place.parent_brand().is_some() || place.is_chain()
}

/// Brand to search under: brand, then parent brand, then the place name
fn effective_brand(place: &PlaceForSearch) -> &str {
    place
        .brand()
        .or_else(|| place.parent_brand())
        .unwrap_or_else(|| place.name.trim())
}

pub(super) fn generate_queries(place: &PlaceForSearch, ctx: &StrategyContext) -> Vec<String> {
    let brand = effective_brand(place);
    let mut queries = Vec::new();

    if let Some(establishment_type) = place.establishment_type() {
        push_unique(&mut queries, format!("{} {}", brand, establishment_type));
    }
    push_unique(&mut queries, &place.name);

    if let Some(rule) = brand_rule_for(&ctx.brand_rules, place) {
        for suffix in &rule.query_suffixes {
            push_unique(&mut queries, format!("{} {}", rule.brand, suffix));
        }
    }

    if let Some(parent) = place.parent_brand() {
        if !parent.eq_ignore_ascii_case(brand) {
            push_unique(&mut queries, format!("{} {}", parent, brand));
        }
    }

    push_unique(&mut queries, format!("{} {}", brand, ctx.location.neighborhood));

    if let Some(category) = place.category() {
        push_unique(&mut queries, format!("{} {}", brand, category));
    }
    for term in place.must_include() {
        push_unique(&mut queries, format!("{} {}", brand, term));
    }

    queries
}

pub(super) fn score(scorer: &mut TermScorer<'_>, place: &PlaceForSearch, _ctx: &StrategyContext) {
    let brand = effective_brand(place);
    if !scorer.boost(brand, BRAND_BOOST) {
        if let Some(parent) = place.parent_brand() {
            scorer.boost(parent, BRAND_BOOST);
        }
    }

    if !place.name.trim().eq_ignore_ascii_case(brand) {
        scorer.boost(place.name.trim(), NAME_BOOST);
    }

    if let Some(establishment_type) = place.establishment_type() {
        if !scorer.boost(establishment_type, TYPE_BOOST) {
            let words = significant_words(establishment_type);
            scorer.boost_any(words.iter().map(String::as_str), TYPE_BOOST / 2.0);
        }
    }
}
