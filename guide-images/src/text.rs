//! Small text helpers shared by strategies, sources and the validator

/// Trimmed value, or None when missing or blank
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Lowercase, treat '-' and '_' as spaces, collapse whitespace
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Case-insensitive containment after normalisation; blank terms never match
pub fn contains_term(haystack: &str, term: &str) -> bool {
    let term = normalize(term);
    !term.is_empty() && normalize(haystack).contains(&term)
}

/// Like [`contains_term`] but only on word boundaries ("gore" does not match "gorewada")
pub fn contains_word(haystack: &str, term: &str) -> bool {
    let term = normalize(term);
    if term.is_empty() {
        return false;
    }
    let words: String = normalize(haystack)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    format!(" {} ", words).contains(&format!(" {} ", term))
}

/// Append `query` unless blank or already present (case-insensitive)
pub fn push_unique(queries: &mut Vec<String>, query: impl AsRef<str>) {
    let query = query.as_ref().split_whitespace().collect::<Vec<_>>().join(" ");
    if query.is_empty() {
        return;
    }
    let key = query.to_lowercase();
    if !queries.iter().any(|q| q.to_lowercase() == key) {
        queries.push(query);
    }
}
