//! De-duplication and ranking of image results
//!
//! Two results are the same image when their URLs share path and query; the
//! scheme and host are ignored so that `http://` and `https://` variants or CDN
//! mirrors collapse. The higher-scored copy survives.
//!
//! Ordering is relevance descending, with near-ties resolved by width. Scores
//! are grouped into bands `tie_break_window` wide; inside a band the wider
//! image ranks first. Banding keeps the order total, so ranking an already
//! ranked list returns it unchanged.

use crate::types::ImageResult;
use reqwest::Url;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Identity of an image URL: path plus query, or the raw string if unparseable
pub fn dedupe_key(url: &str) -> String {
    match Url::parse(url.trim()) {
        Ok(parsed) => match parsed.query() {
            Some(query) => format!("{}?{}", parsed.path(), query),
            None => parsed.path().to_string(),
        },
        Err(_) => url.trim().to_string(),
    }
}

/// Drop duplicate URLs, keeping the higher-scored copy (first seen on ties)
pub fn dedupe(images: Vec<ImageResult>) -> Vec<ImageResult> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<ImageResult> = Vec::with_capacity(images.len());

    for image in images {
        let key = dedupe_key(&image.url);
        match positions.get(&key) {
            Some(&idx) => {
                if image.relevance_score > unique[idx].relevance_score {
                    unique[idx] = image;
                }
            }
            None => {
                positions.insert(key, unique.len());
                unique.push(image);
            }
        }
    }

    unique
}

/// Score band; all scores inside one band count as a near-tie
fn band(score: f64, window: f64) -> i64 {
    // Nudge so that exact multiples (0.7 / 0.1) land in their own band
    ((score + 1e-9) / window).floor() as i64
}

/// Total order used for ranking
///
/// Near-ties are decided by fixed score bands of `tie_break_window`, not by
/// pairwise distance. Two scores on either side of a band edge (0.81 and
/// 0.79 with a 0.1 window) rank by score even though they differ by less
/// than the window.
pub fn compare(a: &ImageResult, b: &ImageResult, tie_break_window: f64) -> Ordering {
    let width = |i: &ImageResult| i.width.unwrap_or(0);

    let by_band = if tie_break_window > 0.0 {
        band(b.relevance_score, tie_break_window).cmp(&band(a.relevance_score, tie_break_window))
    } else {
        Ordering::Equal
    };

    by_band
        .then_with(|| {
            if tie_break_window > 0.0 {
                width(b).cmp(&width(a))
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| b.relevance_score.total_cmp(&a.relevance_score))
        .then_with(|| width(b).cmp(&width(a)))
        .then_with(|| a.url.cmp(&b.url))
}

/// De-duplicate, rank and truncate to `limit`
pub fn rank_and_dedupe(images: Vec<ImageResult>, limit: usize, tie_break_window: f64) -> Vec<ImageResult> {
    let mut ranked = dedupe(images);
    ranked.sort_by(|a, b| compare(a, b, tie_break_window));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::image;

    const WINDOW: f64 = 0.1;

    fn urls(images: &[ImageResult]) -> Vec<&str> {
        images.iter().map(|i| i.url.as_str()).collect()
    }

    #[test]
    fn test_dedupe_key_ignores_scheme_and_host() {
        assert_eq!(
            dedupe_key("http://images.unsplash.com/photo-1?w=1080"),
            dedupe_key("https://images.unsplash.com/photo-1?w=1080")
        );
        assert_ne!(
            dedupe_key("https://images.unsplash.com/photo-1?w=1080"),
            dedupe_key("https://images.unsplash.com/photo-1?w=400")
        );
        assert_eq!(dedupe_key("/images/fallbacks/park.jpg"), "/images/fallbacks/park.jpg");
    }

    #[test]
    fn test_same_path_different_scheme_keeps_higher_score() {
        let images = vec![
            image("http://cdn.example.com/p/1.jpg?x=1", 0.4, 1200, &[]),
            image("https://cdn.example.com/p/1.jpg?x=1", 0.8, 1200, &[]),
        ];
        let ranked = rank_and_dedupe(images, 10, WINDOW);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].url, "https://cdn.example.com/p/1.jpg?x=1");
        assert_eq!(ranked[0].relevance_score, 0.8);
    }

    #[test]
    fn test_sorted_by_score() {
        let images = vec![
            image("https://x/low.jpg", 0.3, 1200, &[]),
            image("https://x/high.jpg", 0.9, 1200, &[]),
            image("https://x/mid.jpg", 0.6, 1200, &[]),
        ];
        let ranked = rank_and_dedupe(images, 10, WINDOW);
        assert_eq!(urls(&ranked), vec!["https://x/high.jpg", "https://x/mid.jpg", "https://x/low.jpg"]);
    }

    #[test]
    fn test_near_tie_prefers_wider_image() {
        let images = vec![
            image("https://x/narrow.jpg", 0.84, 800, &[]),
            image("https://x/wide.jpg", 0.81, 2400, &[]),
        ];
        let ranked = rank_and_dedupe(images, 10, WINDOW);
        assert_eq!(urls(&ranked), vec!["https://x/wide.jpg", "https://x/narrow.jpg"]);
    }

    #[test]
    fn test_scores_across_band_edge_rank_by_score() {
        let images = vec![
            image("https://x/wide.jpg", 0.79, 3000, &[]),
            image("https://x/narrow.jpg", 0.81, 800, &[]),
        ];
        let ranked = rank_and_dedupe(images, 10, WINDOW);
        assert_eq!(urls(&ranked), vec!["https://x/narrow.jpg", "https://x/wide.jpg"]);
    }

    #[test]
    fn test_clear_winner_not_overridden_by_width() {
        let images = vec![
            image("https://x/wide.jpg", 0.5, 4000, &[]),
            image("https://x/good.jpg", 0.9, 800, &[]),
        ];
        let ranked = rank_and_dedupe(images, 10, WINDOW);
        assert_eq!(ranked[0].url, "https://x/good.jpg");
    }

    #[test]
    fn test_truncates_to_limit() {
        let images = (0..6)
            .map(|i| image(&format!("https://x/{i}.jpg"), 0.1 * i as f64, 1200, &[]))
            .collect();
        assert_eq!(rank_and_dedupe(images, 2, WINDOW).len(), 2);
    }

    #[test]
    fn test_ranking_is_idempotent() {
        let images = vec![
            image("https://x/a.jpg", 0.69, 800, &[]),
            image("https://x/b.jpg", 0.71, 1600, &[]),
            image("https://x/c.jpg", 0.75, 1200, &[]),
            image("http://x/c.jpg", 0.2, 1200, &[]),
            image("https://x/d.jpg", 0.3, 3000, &[]),
            image("https://x/e.jpg", 0.35, 600, &[]),
        ];
        let once = rank_and_dedupe(images, 4, WINDOW);
        let twice = rank_and_dedupe(once.clone(), 4, WINDOW);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 4);
    }

    #[test]
    fn test_missing_width_ranks_after_known_width_in_band() {
        let mut unknown = image("https://x/unknown.jpg", 0.82, 1200, &[]);
        unknown.width = None;
        unknown.height = None;
        let known = image("https://x/known.jpg", 0.8, 1200, &[]);
        let ranked = rank_and_dedupe(vec![unknown, known], 10, WINDOW);
        assert_eq!(ranked[0].url, "https://x/known.jpg");
    }
}
