/*
 * Responsibility
 * - アプリ共通の AppError 定義 (パイプライン各段の失敗)
 * - IntoResponse 実装 = 失敗 → HTTP status / JSON body の唯一の対応表
 * - 契約検証 / 認証 / 下流サービスのエラーを統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::dto::MessageResponse;
use crate::services::auth::{AuthError, VerifierError};
use crate::services::contract::ContractError;
use crate::services::example::ServiceError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("route not found")]
    RouteNotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("request violates contract: {0}")]
    ContractViolation(String),
    #[error("missing authorization header")]
    MissingAuthHeader,
    #[error("malformed authorization header")]
    MalformedAuthHeader,
    #[error("token verification failed: {0}")]
    Verifier(#[from] VerifierError),
    #[error("service failure: {0}")]
    Service(#[from] ServiceError),
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::ContractViolation(_)
            | AppError::MissingAuthHeader
            | AppError::MalformedAuthHeader => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AppError::RouteNotFound => (StatusCode::NOT_FOUND, "Not Found"),
            AppError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"),
            AppError::Verifier(_) | AppError::Service(_) | AppError::Internal => {
                // details stay server-side
                tracing::error!(error = %self, "unhandled failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        (status, Json(MessageResponse::new(message))).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingHeader => AppError::MissingAuthHeader,
            AuthError::MalformedHeader => AppError::MalformedAuthHeader,
            AuthError::Verifier(e) => AppError::Verifier(e),
        }
    }
}

impl From<ContractError> for AppError {
    fn from(e: ContractError) -> Self {
        match e {
            ContractError::NotFound { .. } => AppError::RouteNotFound,
            ContractError::MethodNotAllowed { .. } => AppError::MethodNotAllowed,
            ContractError::Violation(reason) => AppError::ContractViolation(reason),
            // only raised while loading the document at startup
            ContractError::Load { .. } | ContractError::Parse(_) | ContractError::Invalid(_) => {
                AppError::Internal
            }
        }
    }
}
