/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, OpenAPI 契約ファイル, トークン検証先など)
 * - 設定値のバリデーション (不正なら起動失敗)
 */
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_LINE_VERIFY_URL: &str = "https://api.line.me/oauth2/v2.1/verify";
pub const DEFAULT_FIXED_USER_ID: &str = "HogeHogeHoge";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Which `TokenVerifier` the bootstrap wires in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifierConfig {
    /// Accepts every token of 4+ characters as `user_id`.
    Fixed { user_id: String },
    /// Verifies ID tokens against the LINE Login verify endpoint.
    Line {
        channel_id: String,
        verify_url: Url,
        timeout: Duration,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub openapi_spec_path: PathBuf,
    pub verifier: VerifierConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a `Config` from an arbitrary key lookup (env, test fixtures).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = lookup("APP_ENV")
            .map(|v| AppEnv::parse(&v))
            .unwrap_or(AppEnv::Development);

        let openapi_spec_path = lookup("OPENAPI_SPEC_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./openapi.yaml"));

        let channel_id = lookup("LINE_CHANNEL_ID")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let verifier = match channel_id {
            Some(channel_id) => {
                let verify_url = lookup("LINE_VERIFY_URL")
                    .unwrap_or_else(|| DEFAULT_LINE_VERIFY_URL.to_string());
                let verify_url =
                    Url::parse(&verify_url).map_err(|_| ConfigError::Invalid("LINE_VERIFY_URL"))?;

                let timeout_seconds: u64 = match lookup("VERIFIER_TIMEOUT_SECONDS") {
                    Some(raw) => raw
                        .trim()
                        .parse()
                        .ok()
                        .filter(|v| *v > 0)
                        .ok_or(ConfigError::Invalid("VERIFIER_TIMEOUT_SECONDS"))?,
                    None => 10,
                };

                VerifierConfig::Line {
                    channel_id,
                    verify_url,
                    timeout: Duration::from_secs(timeout_seconds),
                }
            }
            None => {
                if app_env.is_production() {
                    // the fixed verifier accepts any token; never run it in production
                    return Err(ConfigError::Missing("LINE_CHANNEL_ID"));
                }
                VerifierConfig::Fixed {
                    user_id: lookup("FIXED_USER_ID")
                        .filter(|s| !s.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_FIXED_USER_ID.to_string()),
                }
            }
        };

        Ok(Self {
            addr,
            app_env,
            openapi_spec_path,
            verifier,
        })
    }
}
