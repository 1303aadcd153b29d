//! Local landmark strategy
//!
//! Stations, places of worship, parks, lakes and markets. Landmark photos are
//! usually tagged with the city, so every query is pinned to it; metro stations
//! also carry the transit system name.

use super::{append_missing, default_enhance_query, significant_words, StrategyContext, TermScorer};
use crate::text::{contains_term, normalize, push_unique};
use crate::types::PlaceForSearch;

/// Establishment types handled as landmarks
const LANDMARK_TYPES: &[&str] = &[
    "metro-station",
    "railway-station",
    "bus-station",
    "monument",
    "temple",
    "church",
    "mosque",
    "place-of-worship",
    "park",
    "lake",
    "market",
];

/// Single keywords that mark a place as a landmark
const LANDMARK_KEYWORDS: &[&str] = &[
    "metro", "station", "monument", "temple", "church", "mosque", "park", "lake", "market",
];

const FULL_NAME_BOOST: f64 = 0.2;
const NAME_WORD_BOOST: f64 = 0.05;
const NAME_WORD_CAP: f64 = 0.15;
const LANDMARK_TERM_BOOST: f64 = 0.15;
const CITY_BOOST: f64 = 0.1;
const TRANSIT_BOOST: f64 = 0.1;

fn is_landmark_keyword(keyword: &str) -> bool {
    let hyphenated = normalize(keyword).replace(' ', "-");
    LANDMARK_TYPES.contains(&hyphenated.as_str()) || LANDMARK_KEYWORDS.contains(&hyphenated.as_str())
}

pub(super) fn is_applicable(place: &PlaceForSearch) -> bool {
    place
        .establishment_type()
        .is_some_and(|t| LANDMARK_TYPES.contains(&normalize(t).replace(' ', "-").as_str()))
        || place.keywords().any(is_landmark_keyword)
}

fn is_metro_station(place: &PlaceForSearch) -> bool {
    place
        .establishment_type()
        .is_some_and(|t| normalize(t) == "metro station")
        || place.keywords().any(|k| {
            let k = normalize(k);
            k == "metro" || k == "metro station"
        })
}

/// Type as words ("place-of-worship" -> "place of worship")
fn humanized_type(place: &PlaceForSearch) -> Option<String> {
    place.establishment_type().map(normalize)
}

/// Name with trailing "metro"/"station" words removed ("Indiranagar Metro Station" -> "Indiranagar")
fn station_base_name(name: &str) -> String {
    let mut words: Vec<&str> = name.split_whitespace().collect();
    while let Some(last) = words.last() {
        let lower = last.to_lowercase();
        if lower == "metro" || lower == "station" {
            words.pop();
        } else {
            break;
        }
    }
    if words.is_empty() {
        name.trim().to_string()
    } else {
        words.join(" ")
    }
}

pub(super) fn generate_queries(place: &PlaceForSearch, ctx: &StrategyContext) -> Vec<String> {
    let name = place.name.trim();
    let city = &ctx.location.city;
    let mut queries = Vec::new();

    if is_metro_station(place) {
        let transit = &ctx.location.transit_system;
        let base = station_base_name(name);
        push_unique(&mut queries, format!("{} {} {}", name, transit, city));
        push_unique(&mut queries, format!("{} metro station {}", base, city));
        push_unique(&mut queries, format!("{} {}", transit, base));
        push_unique(&mut queries, format!("{} {}", transit, city));
        return queries;
    }

    push_unique(&mut queries, format!("{} {}", name, city));
    if let Some(kind) = humanized_type(place) {
        if !contains_term(name, &kind) {
            push_unique(&mut queries, format!("{} {}", name, kind));
        }
    }
    push_unique(&mut queries, format!("{} {}", name, ctx.location.neighborhood));
    push_unique(&mut queries, name);

    queries
}

/// Pin the query to the city, plus the transit system for metro stations
pub(super) fn enhance_query(query: &str, place: &PlaceForSearch, ctx: &StrategyContext) -> String {
    let enhanced = default_enhance_query(query, place, ctx);
    let mut required = vec![ctx.location.city.as_str()];
    if is_metro_station(place) {
        required.push(ctx.location.transit_system.as_str());
    }
    append_missing(&enhanced, required)
}

pub(super) fn score(scorer: &mut TermScorer<'_>, place: &PlaceForSearch, ctx: &StrategyContext) {
    let name = place.name.trim();
    if !scorer.boost(name, FULL_NAME_BOOST) {
        let words = significant_words(name);
        scorer.boost_each(words.iter().map(String::as_str), NAME_WORD_BOOST, NAME_WORD_CAP);
    }

    let mut landmark_terms: Vec<String> = humanized_type(place).into_iter().collect();
    landmark_terms.extend(
        place
            .keywords()
            .filter(|k| is_landmark_keyword(k))
            .map(normalize),
    );
    scorer.boost_any(landmark_terms.iter().map(String::as_str), LANDMARK_TERM_BOOST);

    scorer.boost(&ctx.location.city, CITY_BOOST);
    if is_metro_station(place) {
        scorer.boost(&ctx.location.transit_system, TRANSIT_BOOST);
    }
}
