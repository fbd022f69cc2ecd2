/*
 * Responsibility
 * - GET /v1/test
 * - 認証済みなら下流サービスを呼び、LINE ID を返す
 * - 未認証の 401 はここで返す (AppError は通さない)
 */
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    api::{dto::MessageResponse, v1::extractors::AuthCtxExtractor},
    error::AppError,
    state::AppState,
};

pub async fn show_line_id(
    State(state): State<AppState>,
    auth: Option<AuthCtxExtractor>,
) -> Result<Response, AppError> {
    let Some(AuthCtxExtractor(auth)) = auth else {
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(MessageResponse::new("Unauthorized")),
        )
            .into_response());
    };

    state.example.run(&auth.identity).await?;

    let message = format!("Your LINE ID is '{}'", auth.user_id());
    Ok((StatusCode::OK, Json(MessageResponse::new(message))).into_response())
}
