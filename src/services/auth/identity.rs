/// 検証済みトークンから解決された主体
///
/// - `user_id` は IdP (LINE) 側の一意な ID (`sub`)
/// - 1 リクエストの間だけ保持し、永続化はしない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}
