//! Handlers shared by every [`Resource`]; routed once per entity.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use crate::db::repository::{self, PageQuery, Resource};
use crate::error::AppResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;
use crate::validation::{check_id, Validate};

#[derive(Debug, Serialize)]
pub struct Deleted<R> {
    pub success: bool,
    pub message: String,
    pub deleted: R,
}

pub async fn list<R: Resource>(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageQuery>,
    ApiQuery(filter): ApiQuery<R::Filter>,
) -> AppResult<Json<Vec<R>>> {
    let page = page.page(R::DEFAULT_LIMIT)?;
    let conn = state.db.get()?;
    Ok(Json(repository::list::<R>(&conn, &filter, page)?))
}

pub async fn get<R: Resource>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<R>> {
    let id = check_id(id)?;
    let conn = state.db.get()?;
    Ok(Json(repository::require::<R>(&conn, id)?))
}

pub async fn create<R: Resource>(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<R::CreateRequest>,
) -> AppResult<(StatusCode, Json<R>)> {
    let new = body.validate()?;
    let conn = state.db.get()?;
    let created = repository::create::<R>(&conn, &new)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Only fields present in the body change; `null` clears nullable columns.
/// A missing row is reported before anything in the body is checked.
pub async fn update<R: Resource>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<R::PatchRequest>,
) -> AppResult<Json<R>> {
    let id = check_id(id)?;
    let conn = state.db.get()?;
    repository::require::<R>(&conn, id)?;

    let changes = body.validate()?;
    Ok(Json(repository::update::<R>(&conn, id, &changes)?))
}

pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Deleted<R>>> {
    let id = check_id(id)?;
    let conn = state.db.get()?;
    let deleted = repository::delete::<R>(&conn, id)?;
    Ok(Json(Deleted {
        success: true,
        message: format!("{} deleted successfully", R::NAME),
        deleted,
    }))
}
