use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::{error, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

/// Correlates the request and response halves of a log line.
#[derive(Clone)]
pub struct RequestContext {
    pub request_id: String,
}

pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let ctx = RequestContext {
        request_id: Uuid::new_v4().to_string(),
    };
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(ctx);
    response
}

/// Emits one structured line per failed response, folding in the
/// `ErrorReport` the handler attached. Successful responses pass
/// through silently.
pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();

    let mut response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let (source, chain) = response
        .extensions_mut()
        .remove::<ErrorReport>()
        .map(|report| (report.source, report.messages))
        .unwrap_or(("unknown", Vec::new()));
    let detail = chain
        .first()
        .cloned()
        .unwrap_or_else(|| "no diagnostic recorded".to_string());
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        error!(
            target = "quaderno::http::response",
            status = status.as_u16(),
            method = %method,
            path = %path,
            elapsed_ms = elapsed_ms,
            source = source,
            detail = %detail,
            chain = ?chain,
            request_id = request_id,
            "request failed",
        );
    } else {
        warn!(
            target = "quaderno::http::response",
            status = status.as_u16(),
            method = %method,
            path = %path,
            elapsed_ms = elapsed_ms,
            source = source,
            detail = %detail,
            chain = ?chain,
            request_id = request_id,
            "client request error",
        );
    }

    response
}
