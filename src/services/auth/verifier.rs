//! Token verifier interface used by the bearer strategy.
use async_trait::async_trait;
use thiserror::Error;

use super::Identity;

/// Tokens shorter than this are rejected without contacting the identity provider.
pub const MIN_TOKEN_CHARS: usize = 4;

/// Infrastructure failures while verifying a token.
///
/// An invalid or expired token is NOT an error: verifiers return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("verifier transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("verifier returned unexpected status {0}")]
    UnexpectedStatus(u16),
    #[error("verifier returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Resolves a bearer token to the identity it was issued for.
///
/// Returns:
/// - `Ok(Some(identity))` when the token is valid
/// - `Ok(None)` when the token is invalid (caller continues unauthenticated)
/// - `Err(_)` only when verification itself could not be carried out
#[async_trait]
pub trait TokenVerifier: Send + Sync + 'static {
    // Verifier name (for logging).
    fn name(&self) -> &'static str;

    async fn verify(&self, token: &str) -> Result<Option<Identity>, VerifierError>;
}

/// Input-shape fast reject shared by all verifiers.
pub fn is_plausible_token(token: &str) -> bool {
    token.chars().count() >= MIN_TOKEN_CHARS
}
