//! Text and URL normalization shared by every scrape target.

const PARTY_TOKENS: &[(&str, &str)] = &[
    ("republican", "Republican"),
    ("democrat", "Democrat"),
    ("independent", "Independent"),
];

/// Resolve a possibly relative `href` against `base` (`https://host`).
///
/// Total: every input maps to some string, and applying it twice gives the
/// same result as applying it once.
pub fn absolutize(href: &str, base: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }
    if href.starts_with("http") {
        return href.to_string();
    }
    if href.starts_with("//") {
        return format!("https:{}", href);
    }

    let base = base.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{}{}", base, href)
    } else {
        format!("{}/{}", base, href)
    }
}

/// Canonical party label for the first party token found in `text`.
pub fn infer_party(text: &str) -> String {
    let lowered = text.to_lowercase();
    PARTY_TOKENS
        .iter()
        .find(|(token, _)| lowered.contains(token))
        .map(|(_, label)| label.to_string())
        .unwrap_or_default()
}

/// Trim and fold internal whitespace runs (including newlines) to one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
