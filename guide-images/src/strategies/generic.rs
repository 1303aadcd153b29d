//! Generic place strategy: name plus category, keywords and neighborhood

use super::{significant_words, StrategyContext, TermScorer};
use crate::text::push_unique;
use crate::types::PlaceForSearch;

/// Keywords turned into queries, in order
const MAX_KEYWORD_QUERIES: usize = 3;

const NAME_BOOST: f64 = 0.15;
const CATEGORY_BOOST: f64 = 0.1;
const KEYWORD_BOOST: f64 = 0.05;
const KEYWORD_CAP: f64 = 0.15;

pub(super) fn generate_queries(place: &PlaceForSearch, ctx: &StrategyContext) -> Vec<String> {
    let name = place.name.trim();
    let mut queries = Vec::new();

    if let Some(category) = place.category() {
        push_unique(&mut queries, format!("{} {}", name, category));
    }
    for keyword in place.keywords().take(MAX_KEYWORD_QUERIES) {
        push_unique(&mut queries, format!("{} {}", name, keyword));
    }
    push_unique(&mut queries, format!("{} {}", name, ctx.location.neighborhood));
    push_unique(&mut queries, format!("{} {}", name, ctx.location.city));

    queries
}

pub(super) fn score(scorer: &mut TermScorer<'_>, place: &PlaceForSearch, _ctx: &StrategyContext) {
    scorer.boost(place.name.trim(), NAME_BOOST);

    if let Some(category) = place.category() {
        if !scorer.boost(category, CATEGORY_BOOST) {
            let words = significant_words(category);
            scorer.boost_any(words.iter().map(String::as_str), CATEGORY_BOOST);
        }
    }

    scorer.boost_each(place.keywords(), KEYWORD_BOOST, KEYWORD_CAP);
}
