//! Token introspection capability.
//!
//! The identity provider is the authority on whether a token is still alive
//! (revocation, expiry, logout). Everything the authorizer does after this call
//! trusts that answer.
use async_trait::async_trait;
use thiserror::Error;

/// Result of an introspection call. Only `active` is used for the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Introspection {
    pub active: bool,
}

impl Introspection {
    pub fn active() -> Self {
        Self { active: true }
    }

    pub fn inactive() -> Self {
        Self { active: false }
    }
}

#[derive(Debug, Error)]
pub enum IntrospectError {
    #[error("introspection request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("identity provider returned {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid introspection response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("introspection deadline exceeded")]
    DeadlineExceeded,
}

impl IntrospectError {
    pub fn is_deadline_exceeded(&self) -> bool {
        match self {
            Self::DeadlineExceeded => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// Asks the identity provider whether `token` is currently active.
///
/// Implementations are shared across all in-flight requests, so they must be
/// safe to call concurrently. Dropping the returned future aborts the call.
#[async_trait]
pub trait Introspector: Send + Sync {
    async fn introspect(&self, token: &str) -> Result<Introspection, IntrospectError>;
}
