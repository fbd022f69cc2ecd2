//! OpenAPI 契約検証 middleware.
//!
//! Runs before authentication: unknown routes, undeclared methods and
//! contract violations never reach a handler.
//!
//! The request body is buffered only when the matched operation declares a
//! `requestBody`.

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::middleware::http::BODY_LIMIT_BYTES;
use crate::services::contract::ContractError;
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, contract_middleware))
}

async fn contract_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, body) = req.into_parts();

    let rules = state
        .contract
        .match_operation(&parts.method, parts.uri.path())
        .inspect_err(|err| tracing::debug!(error = %err, "request rejected by contract"))?;

    if let Err(err) = rules.check_parameters(&parts.headers, parts.uri.query()) {
        tracing::info!(operation = rules.label(), error = %err, "contract violation");
        return Err(err.into());
    }

    let body = if rules.inspects_body() {
        let bytes = to_bytes(body, BODY_LIMIT_BYTES).await.map_err(|e| {
            ContractError::Violation(format!("request body could not be read: {e}"))
        })?;

        if let Err(err) = rules.check_body(&bytes) {
            tracing::info!(operation = rules.label(), error = %err, "contract violation");
            return Err(err.into());
        }

        Body::from(bytes)
    } else {
        body
    };

    Ok(next.run(Request::from_parts(parts, body)).await)
}
