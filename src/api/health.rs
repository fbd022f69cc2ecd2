/*
 * Responsibility
 * - GET /health (疎通用)
 * - 契約検証・認証 middleware は通さない
 */
use axum::{Json, http::StatusCode, response::IntoResponse};

use crate::api::dto::MessageResponse;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(MessageResponse::new("ok")))
}
