/*
 * Responsibility
 * - HTTP 面の公開ポイント (/health, /v1, fallback)
 */
pub mod dto;
pub mod health;
pub mod v1;

use crate::error::AppError;

/// Router fallback for paths no route handles.
pub async fn not_found() -> AppError {
    AppError::RouteNotFound
}

/// Wrong method on a route registered outside the contract layer.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
