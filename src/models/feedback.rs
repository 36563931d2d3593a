use serde::{Deserialize, Serialize};

use crate::json_utils::{double_option, Numeric};
use crate::validation::{
    optional_ref, optional_text, parse_ref, required_ref, Validate, ValidationError,
};

/// A human correction of a prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub id: i64,
    pub transaction_id: i64,
    pub prediction_id: Option<i64>,
    pub original_category_id: Option<i64>,
    pub corrected_category_id: i64,
    pub user_id: i64,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedbackFilter {
    pub user_id: Option<String>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewFeedbackRequest {
    #[serde(alias = "transactionId")]
    pub transaction_id: Option<Numeric>,
    #[serde(alias = "predictionId")]
    pub prediction_id: Option<Numeric>,
    #[serde(alias = "originalCategoryId")]
    pub original_category_id: Option<Numeric>,
    #[serde(alias = "correctedCategoryId")]
    pub corrected_category_id: Option<Numeric>,
    #[serde(alias = "userId")]
    pub user_id: Option<Numeric>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub transaction_id: i64,
    pub prediction_id: Option<i64>,
    pub original_category_id: Option<i64>,
    pub corrected_category_id: i64,
    pub user_id: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackPatchRequest {
    #[serde(default, deserialize_with = "double_option", alias = "predictionId")]
    pub prediction_id: Option<Option<Numeric>>,
    #[serde(default, deserialize_with = "double_option", alias = "originalCategoryId")]
    pub original_category_id: Option<Option<Numeric>>,
    #[serde(default, deserialize_with = "double_option", alias = "correctedCategoryId")]
    pub corrected_category_id: Option<Option<Numeric>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackChanges {
    pub prediction_id: Option<Option<i64>>,
    pub original_category_id: Option<Option<i64>>,
    pub corrected_category_id: Option<i64>,
    pub notes: Option<Option<String>>,
}

impl FeedbackChanges {
    pub fn is_empty(&self) -> bool {
        self.prediction_id.is_none()
            && self.original_category_id.is_none()
            && self.corrected_category_id.is_none()
            && self.notes.is_none()
    }
}

impl Validate for NewFeedbackRequest {
    type Valid = NewFeedback;

    fn validate(self) -> Result<NewFeedback, ValidationError> {
        let transaction_id = required_ref(self.transaction_id, "transaction_id")?;
        let corrected_category_id =
            required_ref(self.corrected_category_id, "corrected_category_id")?;
        let user_id = required_ref(self.user_id, "user_id")?;

        Ok(NewFeedback {
            transaction_id,
            prediction_id: optional_ref(self.prediction_id, "prediction_id")?,
            original_category_id: optional_ref(self.original_category_id, "original_category_id")?,
            corrected_category_id,
            user_id,
            notes: optional_text(self.notes),
        })
    }
}

impl Validate for FeedbackPatchRequest {
    type Valid = FeedbackChanges;

    fn validate(self) -> Result<FeedbackChanges, ValidationError> {
        let mut changes = FeedbackChanges::default();

        if let Some(prediction_id) = self.prediction_id {
            changes.prediction_id = Some(
                prediction_id
                    .map(|p| parse_ref(&p, "prediction_id"))
                    .transpose()?,
            );
        }

        if let Some(original) = self.original_category_id {
            changes.original_category_id = Some(
                original
                    .map(|c| parse_ref(&c, "original_category_id"))
                    .transpose()?,
            );
        }

        if let Some(corrected) = self.corrected_category_id {
            let corrected = corrected.ok_or_else(|| {
                ValidationError::invalid(
                    "corrected_category_id",
                    "corrected_category_id must be a valid positive integer",
                )
            })?;
            changes.corrected_category_id = Some(parse_ref(&corrected, "corrected_category_id")?);
        }

        if let Some(notes) = self.notes {
            changes.notes = Some(optional_text(notes));
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

    fn parse_new(json: &str) -> Result<NewFeedback, ValidationError> {
        serde_json::from_str::<NewFeedbackRequest>(json)
            .unwrap()
            .validate()
    }

    #[test]
    fn test_full_feedback() {
        let fb = parse_new(
            r#"{"transactionId": 4, "predictionId": 7, "originalCategoryId": 2,
                "correctedCategoryId": 3, "userId": 1, "notes": "  wrong  "}"#,
        )
        .unwrap();
        assert_eq!(fb.prediction_id, Some(7));
        assert_eq!(fb.original_category_id, Some(2));
        assert_eq!(fb.notes.as_deref(), Some("wrong"));
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(
            parse_new(r#"{"corrected_category_id": 3, "user_id": 1}"#)
                .unwrap_err()
                .code(),
            "MISSING_TRANSACTION_ID"
        );
        assert_eq!(
            parse_new(r#"{"transaction_id": 4, "user_id": 1}"#)
                .unwrap_err()
                .code(),
            "MISSING_CORRECTED_CATEGORY_ID"
        );
        assert_eq!(
            parse_new(r#"{"transaction_id": 4, "corrected_category_id": 3}"#)
                .unwrap_err()
                .code(),
            "MISSING_USER_ID"
        );
    }

    #[test]
    fn test_invalid_optional_reference() {
        assert_eq!(
            parse_new(
                r#"{"transaction_id": 4, "corrected_category_id": 3, "user_id": 1, "prediction_id": "x"}"#
            )
            .unwrap_err()
            .code(),
            "INVALID_PREDICTION_ID"
        );
    }

    #[test]
    fn test_patch_unlinks_prediction() {
        let patch: FeedbackPatchRequest =
            serde_json::from_str(r#"{"prediction_id": null}"#).unwrap();
        assert_eq!(patch.validate().unwrap().prediction_id, Some(None));
    }
}
