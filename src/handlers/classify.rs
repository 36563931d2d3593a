use axum::extract::State;
use axum::response::Json;

use crate::db::repository;
use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::models::{Explanation, Feedback, PredictRequest, PredictionOutcome};
use crate::services::metrics::{evaluation_metrics, EvaluationMetrics};
use crate::state::AppState;

pub async fn predict(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<PredictRequest>,
) -> AppResult<Json<PredictionOutcome>> {
    Ok(Json(state.classifier.predict(&body)?))
}

pub async fn explain(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<PredictRequest>,
) -> AppResult<Json<Explanation>> {
    Ok(Json(state.classifier.explain(&body)?))
}

pub async fn metrics(State(state): State<AppState>) -> AppResult<Json<EvaluationMetrics>> {
    let conn = state.db.get()?;
    let feedback_count = repository::count::<Feedback>(&conn)?;
    Ok(Json(evaluation_metrics(feedback_count)))
}
