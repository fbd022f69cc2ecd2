use std::convert::Infallible;

use axum::extract::OptionalFromRequestParts;
use axum::http::request::Parts;

use super::AuthCtx;

/// Handler で、 AuthCtx を受け取るための extractor
/// `Option<AuthCtxExtractor>` として使う:
/// 認証 middleware が AuthCtx を入れていなければ `None` (401 は handler 側で返す)
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> OptionalFromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<AuthCtx>()
            .cloned()
            .map(AuthCtxExtractor))
    }
}
