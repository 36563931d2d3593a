use serde::{Deserialize, Serialize};

use crate::json_utils::{double_option, Numeric};
use crate::validation::{parse_confidence, parse_ref, required_ref, Validate, ValidationError};

pub const DEFAULT_MODEL_VERSION: &str = "v1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: i64,
    pub transaction_id: i64,
    pub category_id: i64,
    pub confidence: f64,
    pub influential_tokens: Option<Vec<String>>,
    pub model_version: String,
    pub created_at: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PredictionFilter {
    pub transaction_id: Option<String>,
    pub category_id: Option<String>,
    pub min_confidence: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewPredictionRequest {
    #[serde(alias = "transactionId")]
    pub transaction_id: Option<Numeric>,
    #[serde(alias = "categoryId")]
    pub category_id: Option<Numeric>,
    pub confidence: Option<Numeric>,
    #[serde(alias = "influentialTokens")]
    pub influential_tokens: Option<Vec<String>>,
    #[serde(alias = "modelVersion")]
    pub model_version: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPrediction {
    pub transaction_id: i64,
    pub category_id: i64,
    pub confidence: f64,
    pub influential_tokens: Option<Vec<String>>,
    pub model_version: String,
}

#[derive(Debug, Deserialize)]
pub struct PredictionPatchRequest {
    #[serde(default, deserialize_with = "double_option", alias = "categoryId")]
    pub category_id: Option<Option<Numeric>>,
    #[serde(default, deserialize_with = "double_option")]
    pub confidence: Option<Option<Numeric>>,
    #[serde(default, deserialize_with = "double_option", alias = "influentialTokens")]
    pub influential_tokens: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "double_option", alias = "modelVersion")]
    pub model_version: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct PredictionChanges {
    pub category_id: Option<i64>,
    pub confidence: Option<f64>,
    pub influential_tokens: Option<Option<Vec<String>>>,
    pub model_version: Option<String>,
}

impl PredictionChanges {
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && self.confidence.is_none()
            && self.influential_tokens.is_none()
            && self.model_version.is_none()
    }
}

impl Validate for NewPredictionRequest {
    type Valid = NewPrediction;

    fn validate(self) -> Result<NewPrediction, ValidationError> {
        let transaction_id = required_ref(self.transaction_id, "transaction_id")?;
        let category_id = required_ref(self.category_id, "category_id")?;
        let confidence = self
            .confidence
            .ok_or(ValidationError::Missing {
                field: "confidence",
            })
            .and_then(|c| parse_confidence(&c))?;
        let model_version = self
            .model_version
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL_VERSION.to_string());

        Ok(NewPrediction {
            transaction_id,
            category_id,
            confidence,
            influential_tokens: self.influential_tokens,
            model_version,
        })
    }
}

impl Validate for PredictionPatchRequest {
    type Valid = PredictionChanges;

    fn validate(self) -> Result<PredictionChanges, ValidationError> {
        let mut changes = PredictionChanges::default();

        if let Some(category_id) = self.category_id {
            let category_id = category_id.ok_or_else(|| {
                ValidationError::invalid(
                    "category_id",
                    "Category ID must be a valid positive integer",
                )
            })?;
            changes.category_id = Some(parse_ref(&category_id, "category_id")?);
        }

        if let Some(confidence) = self.confidence {
            let confidence = confidence
                .and_then(|c| c.as_f64())
                .filter(|c| (0.0..=1.0).contains(c))
                .ok_or_else(|| {
                    ValidationError::invalid(
                        "confidence",
                        "Confidence must be a number between 0 and 1",
                    )
                })?;
            changes.confidence = Some(confidence);
        }

        if let Some(tokens) = self.influential_tokens {
            changes.influential_tokens = Some(tokens);
        }

        if let Some(version) = self.model_version {
            match version.map(|v| v.trim().to_string()) {
                Some(v) if !v.is_empty() => changes.model_version = Some(v),
                _ => {
                    return Err(ValidationError::invalid(
                        "model_version",
                        "model_version cannot be empty",
                    ))
                }
            }
        }

        if changes.is_empty() {
            return Err(ValidationError::NoUpdates);
        }
        Ok(changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_new(json: &str) -> Result<NewPrediction, ValidationError> {
        serde_json::from_str::<NewPredictionRequest>(json)
            .unwrap()
            .validate()
    }

    #[test]
    fn test_model_version_defaults() {
        let p = parse_new(r#"{"transaction_id": 1, "category_id": 2, "confidence": 0.9}"#).unwrap();
        assert_eq!(p.model_version, DEFAULT_MODEL_VERSION);
        assert_eq!(p.influential_tokens, None);
    }

    #[test]
    fn test_required_fields_in_order() {
        assert_eq!(
            parse_new(r#"{"category_id": 2, "confidence": 0.9}"#)
                .unwrap_err()
                .code(),
            "MISSING_TRANSACTION_ID"
        );
        assert_eq!(
            parse_new(r#"{"transaction_id": 1, "confidence": 0.9}"#)
                .unwrap_err()
                .code(),
            "MISSING_CATEGORY_ID"
        );
        assert_eq!(
            parse_new(r#"{"transaction_id": 1, "category_id": 2}"#)
                .unwrap_err()
                .code(),
            "MISSING_CONFIDENCE"
        );
    }

    #[test]
    fn test_confidence_must_be_a_probability() {
        assert_eq!(
            parse_new(r#"{"transaction_id": 1, "category_id": 2, "confidence": 1.2}"#)
                .unwrap_err()
                .code(),
            "CONFIDENCE_OUT_OF_RANGE"
        );
        assert_eq!(
            parse_new(r#"{"transaction_id": 1, "category_id": 2, "confidence": -0.1}"#)
                .unwrap_err()
                .code(),
            "CONFIDENCE_OUT_OF_RANGE"
        );
    }

    #[test]
    fn test_patch_confidence_validation() {
        let patch: PredictionPatchRequest =
            serde_json::from_str(r#"{"confidence": 3}"#).unwrap();
        assert_eq!(patch.validate().unwrap_err().code(), "INVALID_CONFIDENCE");

        let patch: PredictionPatchRequest =
            serde_json::from_str(r#"{"category_id": 0}"#).unwrap();
        assert_eq!(patch.validate().unwrap_err().code(), "INVALID_CATEGORY_ID");
    }

    #[test]
    fn test_patch_tokens_only() {
        let patch: PredictionPatchRequest =
            serde_json::from_str(r#"{"influential_tokens": ["uber", "ride"]}"#).unwrap();
        let changes = patch.validate().unwrap();
        assert_eq!(
            changes.influential_tokens,
            Some(Some(vec!["uber".to_string(), "ride".to_string()]))
        );
    }
}
