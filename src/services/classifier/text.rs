//! String utilities behind the keyword classifier.

fn is_kept(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '#' | '-' | '/')
}

/// Lowercase, drop everything except ASCII letters, digits, `_ # - /` and
/// whitespace, then collapse whitespace runs to single spaces and trim.
///
/// Characters are dropped before whitespace is collapsed, so
/// `normalize_text(normalize_text(s)) == normalize_text(s)`.
pub fn normalize_text(text: &str) -> String {
    let kept: String = text.to_lowercase().chars().filter(|&c| is_kept(c)).collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Edit distance with unit-cost insertions, deletions and substitutions,
/// counted over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// `1 - distance / longer length`; two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// The most similar candidate scoring strictly above `threshold`. On equal
/// scores the earlier candidate wins.
pub fn fuzzy_match<'a, I>(token: &str, candidates: I, threshold: f64) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, f64)> = None;

    for candidate in candidates {
        let score = similarity(token, candidate);
        if score > threshold && best.map_or(true, |(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }

    best.map(|(candidate, _)| candidate)
}

/// Share of characters that are neither ASCII alphanumeric nor whitespace.
pub fn special_char_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let special = text
        .chars()
        .filter(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace())
        .count();
    special as f64 / total as f64
}
