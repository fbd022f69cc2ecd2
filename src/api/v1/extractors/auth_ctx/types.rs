/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - トークン検証は middleware/services 側の責務
 * - extensions に無い = 未認証 (部分的に埋まった状態は存在しない)
 */

use crate::services::auth::Identity;

/// 認証済みのリクエストに付与されるコンテキスト
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub identity: Identity,
}

impl AuthCtx {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn user_id(&self) -> &str {
        &self.identity.user_id
    }
}
