use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::error::ErrorReport;
use crate::application::repos::RepoError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const INTERNAL: &str = "internal_error";
    pub const DB_TIMEOUT: &str = "db_timeout";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
}

/// The client body carries only the code and the fixed message; the
/// `detail` diagnostic goes to the attached report and never leaves the
/// process.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    detail: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        detail: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            detail,
        }
    }

    pub fn internal(message: &'static str, detail: String) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL,
            message,
            Some(detail),
        )
    }
}

/// Both storage tiers failed; whatever the repo error was, the caller
/// only sees the operation's fixed message.
pub fn repo_to_api(message: &'static str) -> impl FnOnce(RepoError) -> ApiError {
    move |err| match err {
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            message,
            Some(err.to_string()),
        ),
        other => ApiError::internal(message, other.to_string()),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        ErrorReport::from_message(
            "infra::http::api",
            self.status,
            format!(
                "{}: {}",
                self.code,
                self.detail.as_deref().unwrap_or(self.message)
            ),
        )
        .attach(&mut response);
        response
    }
}
