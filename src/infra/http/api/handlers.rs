//! Posts handlers.
//!
//! An absent record on get is a JSON `null` with 200, not a 404; clients
//! treat the two identically and the contract predates this server.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::repos::{NewPost, PostPatch};
use crate::infra::http::AppState;
use crate::infra::http::api::error::{ApiError, repo_to_api};
use crate::infra::http::api::models::{PostCreateRequest, PostUpdateRequest};

pub async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state
        .posts
        .list_posts()
        .await
        .map_err(repo_to_api("Failed to fetch posts"))?;

    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .posts
        .find_post(&id)
        .await
        .map_err(repo_to_api("Failed to fetch post"))?;

    Ok(Json(post))
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<PostCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ack = state
        .posts
        .create_post(NewPost {
            title: payload.title,
            content: payload.content,
        })
        .await
        .map_err(repo_to_api("Failed to create post"))?;

    Ok((StatusCode::CREATED, Json(ack)))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<PostUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ack = state
        .posts
        .update_post(
            &id,
            PostPatch {
                title: payload.title,
                content: payload.content,
            },
        )
        .await
        .map_err(repo_to_api("Failed to update post"))?;

    Ok(Json(ack))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ack = state
        .posts
        .delete_post(&id)
        .await
        .map_err(repo_to_api("Failed to delete post"))?;

    Ok(Json(ack))
}
