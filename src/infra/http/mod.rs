pub mod api;
pub mod middleware;

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use sqlx::Error as SqlxError;

use crate::{
    application::{error::ErrorReport, posts::PostService},
    infra::db::PostgresPosts,
    presentation::views::{IndexTemplate, render_template_response},
};

use middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
    /// Present only when a database URL is configured; used for the
    /// health probe, never for request traffic.
    pub db: Option<Arc<PostgresPosts>>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/_health/db", get(db_health))
        .merge(api::build_api_router())
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}

async fn index() -> Response {
    render_template_response(IndexTemplate {}, StatusCode::OK)
}

async fn db_health(State(state): State<AppState>) -> Response {
    match state.db.as_deref() {
        Some(db) => db_health_response(db.health_check().await),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

fn db_health_response(result: Result<(), SqlxError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}
