use std::sync::Arc;
use std::time::Duration;

use crate::services::auth::claims::TokenClaims;
use crate::services::auth::error::AuthError;
use crate::services::auth::introspector::{IntrospectError, Introspector};
use crate::services::auth::{AuthorizationRequirement, Identity};

/// Gate for protected routes: active token + valid claims + required role.
///
/// Stateless apart from its configuration, so one instance is shared by every
/// request through an `Arc`.
#[derive(Clone)]
pub struct TokenAuthorizer {
    introspector: Arc<dyn Introspector>,
    introspect_timeout: Duration,
    leeway_seconds: i64,
}

impl std::fmt::Debug for TokenAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthorizer")
            .field("introspect_timeout", &self.introspect_timeout)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl TokenAuthorizer {
    pub fn new(
        introspector: Arc<dyn Introspector>,
        introspect_timeout: Duration,
        leeway_seconds: i64,
    ) -> Self {
        Self {
            introspector,
            introspect_timeout,
            leeway_seconds,
        }
    }

    /// Runs every check in order; the first failure is returned.
    ///
    /// 1. introspect (the only I/O, bounded by `introspect_timeout`)
    /// 2. token must be active
    /// 3. decode claims (no signature check: introspection already vouched for it)
    /// 4. exp / iat / nbf
    /// 5. subject defined
    /// 6. at least one resource granted
    /// 7. required role on the required resource
    pub async fn authorize(
        &self,
        raw_token: &str,
        requirement: &AuthorizationRequirement,
    ) -> Result<Identity, AuthError> {
        let introspection = tokio::time::timeout(
            self.introspect_timeout,
            self.introspector.introspect(raw_token),
        )
        .await
        .map_err(|_| AuthError::IntrospectionFailed(IntrospectError::DeadlineExceeded))?
        .map_err(AuthError::IntrospectionFailed)?;

        if !introspection.active {
            return Err(AuthError::TokenNotActive);
        }

        let claims = TokenClaims::decode(raw_token).map_err(AuthError::MalformedClaims)?;

        claims
            .validate_times(chrono::Utc::now().timestamp(), self.leeway_seconds)
            .map_err(AuthError::ClaimsInvalid)?;

        let subject = claims
            .defined_subject()
            .ok_or(AuthError::SubjectNotDefined)?;

        if !claims.has_resources() {
            return Err(AuthError::NoAllowedResources);
        }

        if !claims.has_resource_role(&requirement.resource, &requirement.role) {
            return Err(AuthError::NoRequiredResourceRole);
        }

        Ok(Identity::new(subject))
    }
}
