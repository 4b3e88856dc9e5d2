//! Per-request correlation id.
//!
//! `tower-http` assigns `x-request-id` to every request. [`scope_request_id`]
//! makes that value readable via [`current`] for the rest of the request, so
//! error responses and log events can carry it without threading it through
//! every call.

use axum::extract::Request;
use axum::http::HeaderName;
use axum::middleware::Next;
use axum::response::Response;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Value reported when no request is in scope.
pub const UNKNOWN_REQUEST_ID: &str = "unknown";

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Middleware running the rest of the request inside a request-id scope.
///
/// Must sit inside `SetRequestIdLayer` so the header is already present.
pub async fn scope_request_id(request: Request, next: Next) -> Response {
    let id = header_value(&request).to_string();
    REQUEST_ID.scope(id, next.run(request)).await
}

/// The request id of the current request, or [`UNKNOWN_REQUEST_ID`].
pub fn current() -> String {
    REQUEST_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| UNKNOWN_REQUEST_ID.to_string())
}

/// Read `x-request-id` from a request, falling back to [`UNKNOWN_REQUEST_ID`].
pub fn header_value<B>(request: &axum::http::Request<B>) -> &str {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(UNKNOWN_REQUEST_ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn outside_a_request_reports_unknown() {
        assert_eq!(current(), UNKNOWN_REQUEST_ID);
    }

    #[tokio::test]
    async fn scope_exposes_the_id() {
        let seen = REQUEST_ID
            .scope("req-42".to_string(), async { current() })
            .await;
        assert_eq!(seen, "req-42");
    }
}
