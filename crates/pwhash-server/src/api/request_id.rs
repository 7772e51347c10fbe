//! Request ids and per-call logging.
//!
//! Each request runs inside a span carrying its id, method and path. The id is
//! the caller's `X-Request-ID` when present, otherwise a sequential number.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use pwhash_core::as_micros_saturating;
use tokio::time::Instant;
use tracing::Instrument;

use super::routes::AppState;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub(crate) async fn track(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let rid = match req.headers().get(REQUEST_ID_HEADER) {
        Some(value) => value.clone(),
        None => {
            let n = state.next_request_id.fetch_add(1, Ordering::Relaxed);
            let value = HeaderValue::from(n);
            req.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
            value
        }
    };

    let span = tracing::info_span!(
        "request",
        rid = %String::from_utf8_lossy(rid.as_bytes()),
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        let start = Instant::now();
        let mut response = next.run(req).await;
        let status = response.status();

        if status.is_success() {
            tracing::info!(status = status.as_u16(), "{}", status);
        } else {
            tracing::warn!(status = status.as_u16(), "{}", status);
        }
        tracing::debug!(elapsed_us = as_micros_saturating(start.elapsed()), "handled");

        response.headers_mut().insert(REQUEST_ID_HEADER, rid);
        response
    }
    .instrument(span)
    .await
}
