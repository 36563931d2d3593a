use rusqlite::{params, Connection, Row};

use crate::date_utils::now_iso;
use crate::db::repository::{Assignments, Conditions, Resource};
use crate::error::AppResult;
use crate::models::feedback::{FeedbackPatchRequest, NewFeedbackRequest};
use crate::models::{Feedback, FeedbackChanges, FeedbackFilter, NewFeedback};
use crate::validation::{query_ref, ValidationError};

impl Resource for Feedback {
    const NAME: &'static str = "Feedback";
    const TABLE: &'static str = "feedback";
    const COLUMNS: &'static str = "id, transaction_id, prediction_id, original_category_id, \
                                   corrected_category_id, user_id, notes, created_at";
    const DEFAULT_LIMIT: i64 = 50;

    type Filter = FeedbackFilter;
    type CreateRequest = NewFeedbackRequest;
    type PatchRequest = FeedbackPatchRequest;
    type New = NewFeedback;
    type Changes = FeedbackChanges;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Feedback {
            id: row.get(0)?,
            transaction_id: row.get(1)?,
            prediction_id: row.get(2)?,
            original_category_id: row.get(3)?,
            corrected_category_id: row.get(4)?,
            user_id: row.get(5)?,
            notes: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn filter(filter: &FeedbackFilter, conditions: &mut Conditions) -> Result<(), ValidationError> {
        if let Some(id) = query_ref(filter.user_id.as_deref(), "user_id")? {
            conditions.and("user_id = ?", id);
        }
        if let Some(id) = query_ref(filter.transaction_id.as_deref(), "transaction_id")? {
            conditions.and("transaction_id = ?", id);
        }
        Ok(())
    }

    fn insert(conn: &Connection, feedback: &NewFeedback) -> AppResult<i64> {
        conn.execute(
            "INSERT INTO feedback
                (transaction_id, prediction_id, original_category_id, corrected_category_id,
                 user_id, notes, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                feedback.transaction_id,
                feedback.prediction_id,
                feedback.original_category_id,
                feedback.corrected_category_id,
                feedback.user_id,
                feedback.notes,
                now_iso()
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn assign(changes: &FeedbackChanges, set: &mut Assignments) -> AppResult<()> {
        set.set_opt("prediction_id", &changes.prediction_id);
        set.set_opt("original_category_id", &changes.original_category_id);
        set.set_opt("corrected_category_id", &changes.corrected_category_id);
        set.set_opt("notes", &changes.notes);
        Ok(())
    }
}
