//! Integration tests for the category endpoints.

mod common;

use axum::http::StatusCode;
use common::TestClient;
use serde_json::json;

#[tokio::test]
async fn test_defaults_are_seeded() {
    let client = TestClient::new();

    let (status, body) = client.get("/api/categories").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 9);
    assert_eq!(names[0], "Groceries");
    assert_eq!(names[8], "Other");
}

#[tokio::test]
async fn test_create_and_fetch() {
    let client = TestClient::new();

    let (status, created) = client
        .post_json(
            "/api/categories",
            json!({ "name": " Travel ", "colorHex": "#123abc", "icon": "plane" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Travel");
    assert_eq!(created["color_hex"], "#123abc");
    assert!(created["user_id"].is_null());

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = client.get(&format!("/api/categories/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_duplicate_name_is_rejected() {
    let client = TestClient::new();

    let (status, body) = client
        .post_json("/api/categories", json!({ "name": "Dining", "color_hex": "#fff" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE_NAME");

    let (status, body) = client
        .patch_json("/api/categories/1", json!({ "name": "Dining" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DUPLICATE_NAME");
}

#[tokio::test]
async fn test_create_validation_codes() {
    let client = TestClient::new();

    let (status, body) = client
        .post_json("/api/categories", json!({ "color_hex": "#fff" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_NAME");

    let (_, body) = client
        .post_json("/api/categories", json!({ "name": "Travel" }))
        .await;
    assert_eq!(body["code"], "MISSING_COLOR_HEX");

    let (_, body) = client
        .post_json("/api/categories", json!({ "name": "Travel", "color_hex": "blue" }))
        .await;
    assert_eq!(body["code"], "INVALID_COLOR_HEX");

    let (_, body) = client
        .post_json(
            "/api/categories",
            json!({ "name": "Travel", "color_hex": "#fff", "user_id": 999 }),
        )
        .await;
    assert_eq!(body["code"], "FOREIGN_KEY_CONSTRAINT");
}

#[tokio::test]
async fn test_delete_referenced_category_is_blocked() {
    let client = TestClient::new();
    let user = client.create_user("Ada", "ada@example.com").await;
    let tx = client.create_transaction(user, "Starbucks", "2024-01-05").await;
    client.create_prediction(tx, 2).await;

    let (status, body) = client.delete("/api/categories/2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "FOREIGN_KEY_CONSTRAINT");

    let (status, body) = client.get("/api/categories/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Dining");
}

#[tokio::test]
async fn test_delete_unused_category() {
    let client = TestClient::new();

    let (status, body) = client.delete("/api/categories/9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["deleted"]["name"], "Other");

    let (status, body) = client.get("/api/categories/9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = client.delete("/api/categories/9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_ids() {
    let client = TestClient::new();

    for uri in ["/api/categories/abc", "/api/categories/0", "/api/categories/-2"] {
        let (status, body) = client.get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["code"], "INVALID_ID", "{uri}");
    }
}

#[tokio::test]
async fn test_patch_applies_only_present_fields() {
    let client = TestClient::new();

    let (status, body) = client
        .patch_json("/api/categories/1", json!({ "description": "Food at home", "icon": null }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Groceries");
    assert_eq!(body["description"], "Food at home");
    assert!(body["icon"].is_null());

    let (status, body) = client.patch_json("/api/categories/1", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NO_UPDATES");

    let (status, _) = client
        .patch_json("/api/categories/999", json!({ "name": "Nope" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_filter_by_user_and_defaults() {
    let client = TestClient::new();
    let user = client.create_user("Ada", "ada@example.com").await;

    let (status, _) = client
        .post_json(
            "/api/categories",
            json!({ "name": "Hobbies", "color_hex": "#abcdef", "user_id": user }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, own) = client
        .get(&format!("/api/categories?user_id={user}"))
        .await;
    assert_eq!(own.as_array().unwrap().len(), 1);

    let (_, with_defaults) = client
        .get(&format!("/api/categories?user_id={user}&include_defaults=true"))
        .await;
    assert_eq!(with_defaults.as_array().unwrap().len(), 10);

    let (status, body) = client.get("/api/categories?user_id=me").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_USER_ID");
}

#[tokio::test]
async fn test_deleting_user_removes_their_categories() {
    let client = TestClient::new();
    let user = client.create_user("Ada", "ada@example.com").await;
    client
        .post_json(
            "/api/categories",
            json!({ "name": "Hobbies", "color_hex": "#abcdef", "user_id": user }),
        )
        .await;

    let (status, _) = client.delete(&format!("/api/users/{user}")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, all) = client.get("/api/categories").await;
    assert_eq!(all.as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn test_paging() {
    let client = TestClient::new();

    let (_, body) = client.get("/api/categories?limit=3&offset=2").await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 4, 5]);

    let (status, body) = client.get("/api/categories?limit=lots").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_LIMIT");

    let (status, body) = client.get("/api/categories?offset=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_OFFSET");
}

#[tokio::test]
async fn test_patch_missing_category_is_not_found_before_validation() {
    let client = TestClient::new();

    let (status, body) = client.patch_json("/api/categories/999", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = client
        .patch_json("/api/categories/999", json!({ "name": " " }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = client
        .patch_json("/api/users/999", json!({ "password": "1" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "USER_NOT_FOUND");

    // an existing row still gets the validation error
    let (status, body) = client.patch_json("/api/categories/1", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NO_UPDATES");
}
