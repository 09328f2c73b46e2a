use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use quaderno::application::posts::PostService;
use quaderno::application::repos::{
    CreateAck, DeleteAck, NewPost, PostPatch, PostsRepo, RepoError, UpdateAck,
};
use quaderno::domain::entities::PostRecord;
use quaderno::infra::http::{AppState, build_router};
use quaderno::infra::mem::MemoryPosts;

/// Store whose every operation fails with a diagnostic that must never
/// reach a client.
struct BrokenStore;

#[async_trait]
impl PostsRepo for BrokenStore {
    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        Err(RepoError::from_persistence("pool diagnostics leaked"))
    }

    async fn find_post(&self, _id: &str) -> Result<Option<PostRecord>, RepoError> {
        Err(RepoError::from_persistence("pool diagnostics leaked"))
    }

    async fn create_post(&self, _post: NewPost) -> Result<CreateAck, RepoError> {
        Err(RepoError::from_persistence("pool diagnostics leaked"))
    }

    async fn update_post(&self, _id: &str, _patch: PostPatch) -> Result<UpdateAck, RepoError> {
        Err(RepoError::from_persistence("pool diagnostics leaked"))
    }

    async fn delete_post(&self, _id: &str) -> Result<DeleteAck, RepoError> {
        Err(RepoError::from_persistence("pool diagnostics leaked"))
    }
}

fn test_router(store: MemoryPosts) -> Router {
    let posts = Arc::new(PostService::fallback_only(Arc::new(store)));
    build_router(AppState { posts, db: None })
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn index_page_renders() {
    let router = test_router(MemoryPosts::seeded());

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("post-form"));
    assert!(html.contains("/api/posts"));
    // Delete failures surface to the user on both HTTP errors and
    // thrown fetch errors.
    assert!(html.contains("response.ok"));
    assert!(html.contains("Failed to delete post"));
}

#[tokio::test]
async fn list_returns_seeded_posts_as_json_array() {
    let router = test_router(MemoryPosts::seeded());

    let response = router
        .oneshot(Request::get("/api/posts").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let posts = body.as_array().expect("array body");
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["title"], "Welcome to the Blog!");
    assert_eq!(posts[0]["id"], "1");
}

#[tokio::test]
async fn create_returns_normalized_ack_envelope() {
    let router = test_router(MemoryPosts::empty());

    let response = router
        .oneshot(
            Request::post("/api/posts")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"title": "Hello", "content": "World"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert!(body["inserted_id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn create_accepts_payload_without_required_fields() {
    let router = test_router(MemoryPosts::empty());

    // No server-side validation: an empty object still inserts.
    let response = router
        .oneshot(
            Request::post("/api/posts")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn get_missing_post_is_null_with_200() {
    let router = test_router(MemoryPosts::empty());

    let response = router
        .oneshot(
            Request::get("/api/posts/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, Value::Null);
}

#[tokio::test]
async fn put_merges_partial_fields() {
    let router = test_router(MemoryPosts::seeded());

    let response = router
        .clone()
        .oneshot(
            Request::put("/api/posts/1")
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"title": "Renamed"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"modified": 1}));

    let response = router
        .oneshot(Request::get("/api/posts/1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let post = json_body(response).await;
    assert_eq!(post["title"], "Renamed");
    assert_eq!(
        post["content"],
        "This is your first blog post. You can create, edit, and delete posts using the form above."
    );
}

#[tokio::test]
async fn delete_is_idempotent() {
    let router = test_router(MemoryPosts::seeded());

    let response = router
        .clone()
        .oneshot(
            Request::delete("/api/posts/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(json_body(response).await, json!({"deleted": 1}));

    let response = router
        .oneshot(
            Request::delete("/api/posts/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(json_body(response).await, json!({"deleted": 0}));
}

#[tokio::test]
async fn repo_diagnostics_stay_out_of_error_bodies() {
    let posts = Arc::new(PostService::fallback_only(Arc::new(BrokenStore)));
    let router = build_router(AppState { posts, db: None });

    let response = router
        .oneshot(Request::get("/api/posts").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(!text.contains("pool diagnostics"));
    assert_eq!(
        serde_json::from_str::<Value>(&text).unwrap(),
        json!({"error": {"code": "internal_error", "message": "Failed to fetch posts"}})
    );
}

#[tokio::test]
async fn health_probe_without_database_is_no_content() {
    let router = test_router(MemoryPosts::seeded());

    let response = router
        .oneshot(Request::get("/_health/db").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
