pub mod error;
pub mod handlers;
pub mod models;

use axum::{Router, routing::get};

use crate::infra::http::AppState;

pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/api/posts/{id}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
}
