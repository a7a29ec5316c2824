/*
 * Responsibility
 * - Bearer トークンの認可 (introspection → claims 検証 → resource/role チェック)
 * - 認可の結果として handler に渡る Identity の型
 */
pub mod authorizer;
pub mod claims;
pub mod error;
pub mod factory;
pub mod introspector;

use axum::http::Extensions;

use crate::types::UserId;

pub use authorizer::TokenAuthorizer;
pub use error::{AuthError, ClaimsViolation};
pub use factory::build_token_authorizer;
pub use introspector::{IntrospectError, Introspection, Introspector};

/// Resource/role pair a caller's token must carry. Fixed per route at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequirement {
    pub resource: String,
    pub role: String,
}

impl AuthorizationRequirement {
    pub fn new(resource: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            role: role.into(),
        }
    }
}

/// Verified caller. Only produced by [`TokenAuthorizer::authorize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    subject: String,
}

impl Identity {
    pub(crate) fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Subject as a user id; `None` when the provider does not use UUID subjects.
    pub fn user_id(&self) -> Option<UserId> {
        self.subject.parse().ok()
    }

    /// Identity attached by the auth middleware.
    ///
    /// # Panics
    /// When the route is not behind the auth middleware. That is a wiring bug,
    /// not something a client can trigger.
    pub fn require(extensions: &Extensions) -> &Identity {
        extensions
            .get::<Identity>()
            .expect("no identity in request extensions: route is not behind auth middleware")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_returns_attached_identity() {
        let mut ext = Extensions::new();
        ext.insert(Identity::new("5cb40dc0-a249-4783-a301-9e1f3cf3ea41"));
        assert_eq!(
            Identity::require(&ext).subject(),
            "5cb40dc0-a249-4783-a301-9e1f3cf3ea41"
        );
    }

    #[test]
    #[should_panic(expected = "no identity")]
    fn require_panics_without_identity() {
        let ext = Extensions::new();
        let _ = Identity::require(&ext);
    }
}
