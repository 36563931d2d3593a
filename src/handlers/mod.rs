pub mod classify;
pub mod crud;
pub mod taxonomy;
pub mod transactions;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::db::repository::Resource;
use crate::models::{Category, Feedback, Prediction, Transaction, User};
use crate::state::AppState;

/// `GET|POST {base}` and `GET|PATCH|DELETE {base}/:id` for one entity.
fn resource<R: Resource>(base: &str) -> Router<AppState> {
    Router::new()
        .route(base, get(crud::list::<R>).post(crud::create::<R>))
        .route(
            &format!("{base}/:id"),
            get(crud::get::<R>)
                .patch(crud::update::<R>)
                .delete(crud::delete::<R>),
        )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // CRUD
        .merge(resource::<User>("/api/users"))
        .merge(resource::<Category>("/api/categories"))
        .merge(resource::<Transaction>("/api/transactions"))
        .merge(resource::<Prediction>("/api/predictions"))
        .merge(resource::<Feedback>("/api/feedback"))
        .route("/api/transactions/bulk", post(transactions::bulk_create))
        // Classifier
        .route("/api/predict", post(classify::predict))
        .route("/api/explain", post(classify::explain))
        .route("/api/metrics", get(classify::metrics))
        .route(
            "/api/taxonomy",
            get(taxonomy::show).post(taxonomy::replace),
        )
}
