//! Factory: build the `BearerStrategy` (and its verifier) from application `Config`.
use std::sync::Arc;

use crate::config::VerifierConfig;
use crate::services::auth::{
    BearerStrategy, FixedTokenVerifier, LineTokenVerifier, TokenVerifier, VerifierError,
};

pub fn build_token_verifier(
    config: &VerifierConfig,
) -> Result<Arc<dyn TokenVerifier>, VerifierError> {
    let verifier: Arc<dyn TokenVerifier> = match config {
        VerifierConfig::Fixed { user_id } => Arc::new(FixedTokenVerifier::new(user_id.clone())),
        VerifierConfig::Line {
            channel_id,
            verify_url,
            timeout,
        } => Arc::new(LineTokenVerifier::new(
            verify_url.clone(),
            channel_id.clone(),
            *timeout,
        )?),
    };

    Ok(verifier)
}

pub fn build_bearer_strategy(
    config: &VerifierConfig,
) -> Result<Arc<BearerStrategy>, VerifierError> {
    let verifier = build_token_verifier(config)?;
    Ok(Arc::new(BearerStrategy::new(verifier)))
}
