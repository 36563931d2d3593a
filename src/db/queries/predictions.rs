use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use crate::date_utils::now_iso;
use crate::db::repository::{Assignments, Conditions, Resource, Write};
use crate::error::{AppError, AppResult, Constraint};
use crate::models::prediction::{NewPredictionRequest, PredictionPatchRequest};
use crate::models::{NewPrediction, Prediction, PredictionChanges, PredictionFilter};
use crate::validation::{query_ref, ValidationError};

/// Tokens are stored as a JSON array in a TEXT column.
fn encode_tokens(tokens: &Option<Vec<String>>) -> AppResult<Option<String>> {
    tokens
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| AppError::Internal(format!("Failed to encode tokens: {}", e)))
}

fn decode_tokens(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Vec<String>>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|text| {
        serde_json::from_str(&text)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

impl Resource for Prediction {
    const NAME: &'static str = "Prediction";
    const TABLE: &'static str = "predictions";
    const COLUMNS: &'static str =
        "id, transaction_id, category_id, confidence, influential_tokens, model_version, created_at";
    const DEFAULT_LIMIT: i64 = 50;

    type Filter = PredictionFilter;
    type CreateRequest = NewPredictionRequest;
    type PatchRequest = PredictionPatchRequest;
    type New = NewPrediction;
    type Changes = PredictionChanges;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Prediction {
            id: row.get(0)?,
            transaction_id: row.get(1)?,
            category_id: row.get(2)?,
            confidence: row.get(3)?,
            influential_tokens: decode_tokens(row, 4)?,
            model_version: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn filter(filter: &PredictionFilter, conditions: &mut Conditions) -> Result<(), ValidationError> {
        if let Some(id) = query_ref(filter.transaction_id.as_deref(), "transaction_id")? {
            conditions.and("transaction_id = ?", id);
        }
        if let Some(id) = query_ref(filter.category_id.as_deref(), "category_id")? {
            conditions.and("category_id = ?", id);
        }
        if let Some(min) = filter.min_confidence.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            let min = min
                .parse::<f64>()
                .ok()
                .filter(|m| (0.0..=1.0).contains(m))
                .ok_or_else(|| {
                    ValidationError::invalid(
                        "min_confidence",
                        "min_confidence must be a number between 0 and 1",
                    )
                })?;
            conditions.and("confidence >= ?", min);
        }
        Ok(())
    }

    fn insert(conn: &Connection, prediction: &NewPrediction) -> AppResult<i64> {
        conn.execute(
            "INSERT INTO predictions
                (transaction_id, category_id, confidence, influential_tokens, model_version, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                prediction.transaction_id,
                prediction.category_id,
                prediction.confidence,
                encode_tokens(&prediction.influential_tokens)?,
                prediction.model_version,
                now_iso()
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn assign(changes: &PredictionChanges, set: &mut Assignments) -> AppResult<()> {
        set.set_opt("category_id", &changes.category_id);
        set.set_opt("confidence", &changes.confidence);
        if let Some(tokens) = &changes.influential_tokens {
            set.set("influential_tokens", encode_tokens(tokens)?);
        }
        set.set_opt("model_version", &changes.model_version);
        Ok(())
    }

    fn constraint_error(constraint: Constraint, write: Write) -> AppError {
        match (constraint, write) {
            (_, Write::Delete) => AppError::foreign_key(
                "Cannot delete prediction. It is referenced by other records",
            ),
            _ => AppError::foreign_key("Transaction or category does not exist"),
        }
    }
}
