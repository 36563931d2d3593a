use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use crate::db::queries::transactions;
use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::models::transaction::BulkTransactionsRequest;
use crate::models::Transaction;
use crate::state::AppState;
use crate::validation::Validate;

#[derive(Debug, Serialize)]
pub struct BulkCreated {
    pub success: bool,
    pub count: usize,
    pub transactions: Vec<Transaction>,
}

/// Create many transactions at once. Every row is validated first, and
/// nothing is stored unless every insert succeeds.
pub async fn bulk_create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<BulkTransactionsRequest>,
) -> AppResult<(StatusCode, Json<BulkCreated>)> {
    let rows = body.validate()?;
    let mut conn = state.db.get()?;
    let created = transactions::insert_many(&mut conn, &rows)?;

    tracing::info!(count = created.len(), "Bulk transaction import");
    Ok((
        StatusCode::CREATED,
        Json(BulkCreated {
            success: true,
            count: created.len(),
            transactions: created,
        }),
    ))
}
