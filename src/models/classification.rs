use serde::{Deserialize, Serialize};

use crate::json_utils::Numeric;

/// Body of `POST /api/predict` and `POST /api/explain`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictRequest {
    pub transaction: Option<String>,
    pub amount: Option<Numeric>,
    #[serde(alias = "merchantName")]
    pub merchant_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionOutcome {
    pub category: String,
    pub confidence: f64,
    pub influential_tokens: Vec<String>,
    pub category_id: i64,
    /// Echoed back for debugging the normalizer.
    pub normalized_input: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub transaction: String,
    pub category: String,
    pub confidence: f64,
    pub influences: Vec<String>,
}
