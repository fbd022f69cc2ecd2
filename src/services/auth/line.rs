use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use super::Identity;
use super::verifier::{TokenVerifier, VerifierError, is_plausible_token};

/// LINE Login ID-token verifier.
///
/// `POST <verify_url>` with form `id_token` + `client_id`:
/// - 200 => token valid, `sub` is the LINE user id
/// - 400 => token invalid/expired (not an error)
/// - anything else => infrastructure failure
///
/// Timeouts are enforced by the underlying `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct LineTokenVerifier {
    http: reqwest::Client,
    verify_url: Url,
    channel_id: String,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    sub: String,
}

impl LineTokenVerifier {
    pub fn new(
        verify_url: Url,
        channel_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, VerifierError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            verify_url,
            channel_id: channel_id.into(),
        })
    }
}

#[async_trait]
impl TokenVerifier for LineTokenVerifier {
    fn name(&self) -> &'static str {
        "line"
    }

    async fn verify(&self, token: &str) -> Result<Option<Identity>, VerifierError> {
        if !is_plausible_token(token) {
            return Ok(None);
        }

        let res = self
            .http
            .post(self.verify_url.clone())
            .form(&[("id_token", token), ("client_id", self.channel_id.as_str())])
            .send()
            .await?;

        match res.status() {
            StatusCode::OK => {
                let body: VerifyResponse = res
                    .json()
                    .await
                    .map_err(|e| VerifierError::InvalidResponse(e.to_string()))?;

                if body.sub.trim().is_empty() {
                    return Err(VerifierError::InvalidResponse("empty 'sub'".into()));
                }

                Ok(Some(Identity::new(body.sub)))
            }
            StatusCode::BAD_REQUEST => {
                tracing::debug!("id token rejected by LINE");
                Ok(None)
            }
            other => Err(VerifierError::UnexpectedStatus(other.as_u16())),
        }
    }
}
