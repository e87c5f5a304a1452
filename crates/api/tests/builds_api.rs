//! Integration tests for the `/api/v1/builds` resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, post_json};
use serde_json::json;

fn submission(app_name: &str) -> serde_json::Value {
    json!({
        "app_name": app_name,
        "package_name": format!("com.test.{app_name}"),
        "web_url": "https://a.com",
    })
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_returns_201_with_queued_job() {
    let (app, _tmp) = build_test_app();

    let response = post_json(app, "/api/v1/builds", submission("A1")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(json["data"]["id"].is_string());
    assert_eq!(json["data"]["status"], "queued");
    assert_eq!(json["data"]["config"]["app_name"], "A1");
    assert!(json["data"]["artifact"].is_null());
}

#[tokio::test]
async fn submitted_job_is_immediately_pollable() {
    let (app, _tmp) = build_test_app();

    let response = post_json(app.clone(), "/api/v1/builds", submission("A1")).await;
    let id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Never not-found right after creation, regardless of how far the
    // pipeline has progressed.
    let response = get(app, &format!("/api/v1/builds/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], id.as_str());
}

#[tokio::test]
async fn invalid_config_is_rejected_with_400() {
    let (app, _tmp) = build_test_app();

    let response = post_json(
        app,
        "/api/v1/builds",
        json!({
            "app_name": "A1",
            "package_name": "com.test.A1",
            "web_url": "not-a-url",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn missing_required_field_is_a_client_error() {
    let (app, _tmp) = build_test_app();

    let response = post_json(app, "/api/v1/builds", json!({"app_name": "A1"})).await;
    assert!(response.status().is_client_error());
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_job_id_returns_404() {
    let (app, _tmp) = build_test_app();

    let response = get(app, "/api/v1/builds/no-such-job").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// List / concurrency
// ---------------------------------------------------------------------------

#[tokio::test]
async fn back_to_back_submissions_get_distinct_ids() {
    let (app, _tmp) = build_test_app();

    let mut ids = Vec::new();
    for app_name in ["A1", "A2", "A3"] {
        let response = post_json(app.clone(), "/api/v1/builds", submission(app_name)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = body_json(response).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_string();
        ids.push(id);
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3, "job ids must be distinct");

    let response = get(app, "/api/v1/builds").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}
