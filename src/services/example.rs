//! Downstream business operation behind `GET /v1/test`.
use async_trait::async_trait;
use thiserror::Error;

use crate::services::auth::Identity;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("downstream failure: {0}")]
    Downstream(String),
}

#[async_trait]
pub trait ExampleService: Send + Sync + 'static {
    async fn run(&self, identity: &Identity) -> Result<(), ServiceError>;
}

/// Placeholder downstream call; succeeds without side effects.
#[derive(Debug, Clone, Default)]
pub struct NoopExampleService;

#[async_trait]
impl ExampleService for NoopExampleService {
    async fn run(&self, identity: &Identity) -> Result<(), ServiceError> {
        tracing::debug!(user_id = %identity.user_id, "example service invoked");
        Ok(())
    }
}
