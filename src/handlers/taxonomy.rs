use axum::extract::State;
use axum::response::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::models::{Taxonomy, TaxonomyRequest};
use crate::state::AppState;
use crate::validation::Validate;

#[derive(Debug, Serialize)]
pub struct TaxonomySaved {
    pub success: bool,
    pub taxonomy: Taxonomy,
}

pub async fn show(State(state): State<AppState>) -> AppResult<Json<Taxonomy>> {
    Ok(Json(state.taxonomy.load()?))
}

pub async fn replace(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<TaxonomyRequest>,
) -> AppResult<Json<TaxonomySaved>> {
    let taxonomy = body.validate()?;
    state.taxonomy.save(&taxonomy)?;
    Ok(Json(TaxonomySaved {
        success: true,
        taxonomy,
    }))
}
