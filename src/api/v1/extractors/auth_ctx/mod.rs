//! `AuthCtx` as stored by the auth middleware; handlers read it via
//! `Option<AuthCtxExtractor>` and answer 401 themselves when it is absent.

mod core;
mod types;

pub use self::core::AuthCtxExtractor;
pub use types::AuthCtx;
