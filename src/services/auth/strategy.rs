//! Bearer authentication strategy.
//!
//! `Authorization: Bearer <token>` → `TokenVerifier` → `AuthOutcome`.
//! The middleware branches on the outcome exactly once.
use std::sync::Arc;

use axum::http::{HeaderMap, header};
use thiserror::Error;

use super::Identity;
use super::verifier::{TokenVerifier, VerifierError};

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingHeader,
    #[error("authorization header is not a bearer credential")]
    MalformedHeader,
    #[error(transparent)]
    Verifier(#[from] VerifierError),
}

#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated(Identity),
    /// Token was well-formed but the verifier did not accept it.
    Unauthenticated,
    Failed(AuthError),
}

pub struct BearerStrategy {
    verifier: Arc<dyn TokenVerifier>,
}

impl BearerStrategy {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }

    pub fn verifier_name(&self) -> &'static str {
        self.verifier.name()
    }

    /// Single attempt, no retries.
    pub async fn authenticate(&self, headers: &HeaderMap) -> AuthOutcome {
        let token = match bearer_token(headers) {
            Ok(token) => token,
            Err(err) => return AuthOutcome::Failed(err),
        };

        match self.verifier.verify(token).await {
            Ok(Some(identity)) => AuthOutcome::Authenticated(identity),
            Ok(None) => AuthOutcome::Unauthenticated,
            Err(err) => AuthOutcome::Failed(err.into()),
        }
    }
}

/// Extracts the token after the literal `Bearer ` prefix.
///
/// A header without that prefix is rejected rather than passed through as a raw token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?;

    value
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedHeader)
}
