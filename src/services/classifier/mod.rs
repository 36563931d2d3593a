//! Keyword-based transaction classifier.
//!
//! Descriptions are normalized, tokenized and matched (exactly, then with a
//! Levenshtein-based fuzzy match) against a static table of merchant
//! keywords. Unknown descriptions fall back to `Other` with a low confidence.

pub mod explain;
pub mod jitter;
pub mod keywords;
pub mod text;
pub mod validate;

use std::sync::Arc;

use tracing::debug;

use crate::models::{Explanation, PredictRequest, PredictionOutcome};
use crate::validation::ValidationError;

pub use jitter::{FixedJitter, HashedJitter, JitterSource, RandomJitter};
use keywords::{KeywordRule, FALLBACK_CATEGORY, KEYWORDS};
use text::{fuzzy_match, normalize_text, special_char_ratio};

const FUZZY_THRESHOLD: f64 = 0.85;
const MAX_CONFIDENCE: f64 = 0.99;

const FALLBACK_BASE_CONFIDENCE: f64 = 0.45;
const FALLBACK_MAX_CONFIDENCE: f64 = 0.65;
const FALLBACK_JITTER_SPAN: f64 = 0.2;
const SHORT_INPUT_LEN: usize = 10;
const SHORT_INPUT_PENALTY: f64 = 0.9;
const FALLBACK_NOISE_RATIO: f64 = 0.3;
const FALLBACK_NOISE_PENALTY: f64 = 0.85;

const MATCH_NOISE_RATIO: f64 = 0.4;
const MATCH_NOISE_PENALTY: f64 = 0.9;
const MERCHANT_BOOST: f64 = 1.05;

#[derive(Clone)]
pub struct Classifier {
    jitter: Arc<dyn JitterSource>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(RandomJitter)
    }
}

impl std::fmt::Debug for Classifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Classifier").finish_non_exhaustive()
    }
}

impl Classifier {
    pub fn new(jitter: impl JitterSource + 'static) -> Self {
        Self {
            jitter: Arc::new(jitter),
        }
    }

    /// Predict a category for a transaction description.
    ///
    /// Validation failures are returned before any matching is attempted.
    pub fn predict(&self, input: &PredictRequest) -> Result<PredictionOutcome, ValidationError> {
        let description = validate::validate_description(input.transaction.as_deref())?;
        validate::validate_amount(input.amount.as_ref())?;

        // the noise ratio is measured on the text as sent
        let raw = input.transaction.as_deref().unwrap_or(description);
        let normalized = normalize_text(description);
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        let merchant = input
            .merchant_name
            .as_deref()
            .map(normalize_text)
            .filter(|m| !m.is_empty());

        let matched: Vec<&'static str> = tokens
            .iter()
            .filter_map(|token| match KEYWORDS.get_key(*token) {
                Some(keyword) => Some(*keyword),
                None => fuzzy_match(token, KEYWORDS.keys().copied(), FUZZY_THRESHOLD),
            })
            .collect();

        let mut best: Option<&KeywordRule> = None;
        let mut best_len = 0;
        for keyword in &matched {
            if keyword.len() > best_len {
                best = KEYWORDS.get(*keyword);
                best_len = keyword.len();
            }
        }

        if best.is_none() {
            if let Some(merchant) = &merchant {
                best = KEYWORDS
                    .entries()
                    .find(|(keyword, _)| merchant.contains(**keyword))
                    .map(|(_, rule)| rule);
            }
        }

        let (category, confidence, influential_tokens) = match best {
            Some(rule) => {
                let mut multiplier = 1.0;
                if special_char_ratio(raw) > MATCH_NOISE_RATIO {
                    multiplier *= MATCH_NOISE_PENALTY;
                }
                if let (Some(merchant), Some(first)) = (&merchant, matched.first()) {
                    if merchant.contains(*first) {
                        multiplier *= MERCHANT_BOOST;
                    }
                }
                (
                    rule.category,
                    (rule.confidence * multiplier).min(MAX_CONFIDENCE),
                    rule.tokens.iter().map(|t| t.to_string()).collect(),
                )
            }
            None => {
                let mut base = FALLBACK_BASE_CONFIDENCE;
                if normalized.chars().count() < SHORT_INPUT_LEN {
                    base *= SHORT_INPUT_PENALTY;
                }
                if special_char_ratio(raw) > FALLBACK_NOISE_RATIO {
                    base *= FALLBACK_NOISE_PENALTY;
                }
                let jitter = self.jitter.jitter(&normalized);
                (
                    FALLBACK_CATEGORY,
                    (base + jitter * FALLBACK_JITTER_SPAN).min(FALLBACK_MAX_CONFIDENCE),
                    tokens.iter().take(3).map(|t| t.to_string()).collect(),
                )
            }
        };

        debug!(
            "Classified {:?} as {} ({:.3})",
            normalized, category, confidence
        );

        Ok(PredictionOutcome {
            category: category.to_string(),
            confidence,
            influential_tokens,
            category_id: keywords::category_id(category),
            normalized_input: normalized,
        })
    }

    /// Explain which words drove the category of a description.
    pub fn explain(&self, input: &PredictRequest) -> Result<Explanation, ValidationError> {
        let transaction = input
            .transaction
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ValidationError::Missing {
                field: "transaction",
            })?;
        let jitter = self.jitter.jitter(&normalize_text(transaction));
        Ok(explain::explain(transaction, jitter))
    }
}
