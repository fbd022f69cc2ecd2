use async_trait::async_trait;

use super::Identity;
use super::verifier::{TokenVerifier, VerifierError, is_plausible_token};

/// Development verifier: every plausible token maps to one fixed identity.
///
/// No network access. Never selected in production (see `Config`).
#[derive(Debug, Clone)]
pub struct FixedTokenVerifier {
    user_id: String,
}

impl FixedTokenVerifier {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl TokenVerifier for FixedTokenVerifier {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn verify(&self, token: &str) -> Result<Option<Identity>, VerifierError> {
        if !is_plausible_token(token) {
            return Ok(None);
        }
        Ok(Some(Identity::new(self.user_id.clone())))
    }
}
