//! Outermost layers, `/health` included: `x-request-id`, access log, body cap.
//!
//! No global timeout; token verification bounds itself via its HTTP client.

use axum::Router;
use axum::http::header::HeaderName;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// 1 MiB
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

pub fn apply(router: Router) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    let layers = ServiceBuilder::new()
        // reuse the caller's id, mint one otherwise
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(TraceLayer::new_for_http());

    router.layer(layers)
}
