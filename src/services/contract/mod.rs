pub mod document;
pub mod validator;

use axum::http::Method;
use thiserror::Error;

pub use document::ContractDocument;
pub use validator::{ContractValidator, OperationRules};

/// Contract-layer errors.
///
/// `NotFound` / `MethodNotAllowed` / `Violation` are per-request rejections;
/// the rest only happen while loading the document at startup.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("no route matches {path}")]
    NotFound { path: String },
    #[error("{method} is not declared for {path}")]
    MethodNotAllowed { method: Method, path: String },
    #[error("{0}")]
    Violation(String),
    #[error("contract load error for '{path}': {reason}")]
    Load { path: String, reason: String },
    #[error("contract parse error: {0}")]
    Parse(String),
    #[error("invalid contract: {0}")]
    Invalid(String),
}
