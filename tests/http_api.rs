//! HTTP surface tests: drive the router directly and check the error-kind
//! to status mapping the transport promises.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::tempdir;
use tower::ServiceExt;

async fn setup_app(dir: &tempfile::TempDir) -> Router {
    let pool = review_roster::db::initialize(&dir.path().join("test.db"))
        .await
        .unwrap();
    review_roster::api::router(pool)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn backend_team() -> Value {
    json!({
        "team_name": "Backend",
        "members": [
            {"user_id": "alice", "username": "Alice", "is_active": true},
            {"user_id": "bob", "username": "Bob", "is_active": true},
            {"user_id": "charlie", "username": "Charlie", "is_active": true},
        ]
    })
}

#[tokio::test]
async fn test_create_and_merge_flow_over_http() {
    let dir = tempdir().unwrap();
    let app = setup_app(&dir).await;

    let (status, team) = send(&app, "POST", "/team/add", Some(backend_team())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team["members"].as_array().unwrap().len(), 3);

    let (status, pr) = send(
        &app,
        "POST",
        "/pullRequest/create",
        Some(json!({
            "pull_request_id": "PR-100",
            "pull_request_name": "Fix login bug",
            "author_id": "alice",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pr["status"], "OPEN");
    let reviewers = pr["assigned_reviewers"].as_array().unwrap();
    assert_eq!(reviewers.len(), 2);
    assert!(reviewers.contains(&json!("bob")));
    assert!(reviewers.contains(&json!("charlie")));

    let (status, merged) = send(
        &app,
        "POST",
        "/pullRequest/merge",
        Some(json!({"pull_request_id": "PR-100"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(merged["status"], "MERGED");
    assert!(merged["merged_at"].is_i64());

    // Merge again: identical response, still 200
    let (status, merged_again) = send(
        &app,
        "POST",
        "/pullRequest/merge",
        Some(json!({"pull_request_id": "PR-100"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(merged_again["merged_at"], merged["merged_at"]);
}

#[tokio::test]
async fn test_unknown_author_maps_to_404() {
    let dir = tempdir().unwrap();
    let app = setup_app(&dir).await;

    let (status, body) = send(
        &app,
        "POST",
        "/pullRequest/create",
        Some(json!({
            "pull_request_id": "PR-999",
            "pull_request_name": "Ghost PR",
            "author_id": "ghost",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_duplicate_create_maps_to_409() {
    let dir = tempdir().unwrap();
    let app = setup_app(&dir).await;
    send(&app, "POST", "/team/add", Some(backend_team())).await;

    let create = json!({
        "pull_request_id": "PR-1",
        "pull_request_name": "First",
        "author_id": "alice",
    });
    let (status, _) = send(&app, "POST", "/pullRequest/create", Some(create.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", "/pullRequest/create", Some(create)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn test_reassign_on_merged_maps_to_400() {
    let dir = tempdir().unwrap();
    let app = setup_app(&dir).await;
    send(&app, "POST", "/team/add", Some(backend_team())).await;

    send(
        &app,
        "POST",
        "/pullRequest/create",
        Some(json!({
            "pull_request_id": "PR-1",
            "pull_request_name": "First",
            "author_id": "alice",
        })),
    )
    .await;
    send(
        &app,
        "POST",
        "/pullRequest/merge",
        Some(json!({"pull_request_id": "PR-1"})),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/pullRequest/reassign",
        Some(json!({"pull_request_id": "PR-1", "old_reviewer_id": "bob"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PRECONDITION_FAILED");
}

#[tokio::test]
async fn test_team_read_and_reviews_endpoints() {
    let dir = tempdir().unwrap();
    let app = setup_app(&dir).await;
    send(&app, "POST", "/team/add", Some(backend_team())).await;

    let (status, team) = send(&app, "GET", "/team/get/Backend", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team["team_name"], "Backend");

    let (status, body) = send(&app, "GET", "/team/get/Nobody", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, reviews) = send(&app, "GET", "/users/getReview?user_id=bob", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews, json!([]));

    send(
        &app,
        "POST",
        "/pullRequest/create",
        Some(json!({
            "pull_request_id": "PR-7",
            "pull_request_name": "Fix",
            "author_id": "alice",
        })),
    )
    .await;

    // Both non-author members were assigned, so bob reviews PR-7
    let (status, reviews) = send(&app, "GET", "/users/getReview?user_id=bob", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews[0]["pull_request_id"], "PR-7");
    assert_eq!(reviews[0]["status"], "OPEN");

    let (status, user) = send(
        &app,
        "POST",
        "/users/setIsActive",
        Some(json!({"user_id": "bob", "is_active": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["is_active"], false);
}
