//! Bearer トークン検証 → AuthCtx を extensions に入れる
//!
//! - 検証自体は `BearerStrategy` (services::auth) の責務
//! - ここは結果 (`AuthOutcome`) で一度だけ分岐する:
//!   - Authenticated   => AuthCtx を入れて次へ
//!   - Unauthenticated => AuthCtx なしで次へ (401 は handler が返す)
//!   - Failed          => AppError を返し、次へは進まない

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::AuthOutcome;
use crate::state::AppState;

/// `/v1/*` に認証を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let v1 = Router::new().route("/test", get(show_line_id));
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // Body は Sync ではないため、await を跨ぐのは Parts だけにする
    let (mut parts, body) = req.into_parts();

    match state.auth.authenticate(&parts.headers).await {
        AuthOutcome::Authenticated(identity) => {
            tracing::debug!(user_id = %identity.user_id, "bearer token accepted");
            // middleware → extractor への受け渡し
            parts.extensions.insert(AuthCtx::new(identity));
        }
        AuthOutcome::Unauthenticated => {
            tracing::debug!(
                verifier = state.auth.verifier_name(),
                "bearer token rejected; continuing unauthenticated"
            );
        }
        AuthOutcome::Failed(err) => {
            tracing::warn!(error = %err, "authentication failed");
            return Err(err.into());
        }
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}
