pub mod factory;
pub mod fixed;
pub mod identity;
pub mod line;
pub mod strategy;
pub mod verifier;

pub use factory::build_bearer_strategy;
pub use fixed::FixedTokenVerifier;
pub use identity::Identity;
pub use line::LineTokenVerifier;
pub use strategy::{AuthError, AuthOutcome, BearerStrategy};
pub use verifier::{TokenVerifier, VerifierError};
