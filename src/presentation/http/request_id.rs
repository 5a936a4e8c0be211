//! Per-request id and the `http` tracing span.
//!
//! Every request gets an `x-request-id` (a fresh UUID unless the caller sent
//! one). The id is echoed on the response and recorded on the span.

use axum::Router;
use axum::body::Body;
use axum::extract::MatchedPath;
use http::{HeaderName, Request};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Wraps `router` with request-id assignment, propagation and request tracing.
pub fn layer(router: Router) -> Router {
    let header = HeaderName::from_static(REQUEST_ID_HEADER);
    // Outermost last: the id is set before the span is created.
    router
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .layer(PropagateRequestIdLayer::new(header.clone()))
        .layer(SetRequestIdLayer::new(header, MakeRequestUuid))
}

fn make_span(req: &Request<Body>) -> tracing::Span {
    let matched = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    tracing::info_span!(
        "http",
        method = %req.method(),
        uri = %req.uri(),
        matched_path = %matched,
        request_id = %request_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use tower::ServiceExt;

    fn app() -> Router {
        layer(Router::new().route("/ping", get(|| async { "pong" })))
    }

    #[tokio::test]
    async fn responses_carry_a_fresh_request_id() {
        let first = app()
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let second = app()
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id = |res: &http::Response<Body>| {
            res.headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
                .unwrap()
        };
        let (a, b) = (id(&first), id(&second));
        assert_eq!(a.len(), 36);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn caller_supplied_id_is_echoed() {
        let res = app()
            .oneshot(
                Request::get("/ping")
                    .header("X-Request-Id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn unmatched_routes_still_get_an_id() {
        let res = app()
            .oneshot(Request::get("/missing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), http::StatusCode::NOT_FOUND);
        assert!(res.headers().contains_key(REQUEST_ID_HEADER));
    }
}
