//! Word-level explanation of a description.

use super::keywords::{EXPLAIN_WORDS, FALLBACK_CATEGORY, INFLUENCES};
use crate::models::Explanation;

const MAX_INFLUENCES: usize = 5;
const PLACEHOLDER_INFLUENCES: [&str; 2] = ["feature", "attribution"];

/// `transaction` must already be checked for blankness.
pub fn explain(transaction: &str, jitter: f64) -> Explanation {
    let lowered = transaction.to_lowercase();
    let words: Vec<&str> = lowered
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .collect();

    let category = words
        .iter()
        .find_map(|w| EXPLAIN_WORDS.get(*w).copied())
        .unwrap_or(FALLBACK_CATEGORY);

    let mut influences: Vec<String> = match INFLUENCES.get(category) {
        Some(candidates) => candidates
            .iter()
            .filter(|c| lowered.contains(*c))
            .take(MAX_INFLUENCES)
            .map(|c| c.to_string())
            .collect(),
        None => words.iter().take(3).map(|w| w.to_string()).collect(),
    };
    if influences.is_empty() {
        influences = PLACEHOLDER_INFLUENCES.iter().map(|s| s.to_string()).collect();
    }

    Explanation {
        transaction: transaction.to_string(),
        category: category.to_string(),
        confidence: 0.85 + jitter * 0.14,
        influences,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_word_picks_category_and_influences() {
        let e = explain("Shell gas station 42", 0.0);
        assert_eq!(e.category, "Fuel");
        assert_eq!(e.influences, vec!["gas", "station", "shell"]);
        assert_eq!(e.confidence, 0.85);
        assert_eq!(e.transaction, "Shell gas station 42");
    }

    #[test]
    fn test_first_known_word_wins() {
        let e = explain("uber to starbucks", 0.5);
        assert_eq!(e.category, "Transport");
        assert!((e.confidence - 0.92).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_words_fall_back_to_first_three() {
        let e = explain("Weekly farmers co op payment", 0.0);
        assert_eq!(e.category, "Other");
        assert_eq!(e.influences, vec!["weekly", "farmers", "payment"]);
    }

    #[test]
    fn test_placeholder_when_nothing_influences() {
        let e = explain("cvs", 0.0);
        assert_eq!(e.category, "Healthcare");
        assert_eq!(e.influences, vec!["cvs"]);

        let e = explain("a b", 0.99);
        assert_eq!(e.category, "Other");
        assert_eq!(e.influences, vec!["feature", "attribution"]);
        assert!(e.confidence < 0.99 + 1e-9);
    }
}
