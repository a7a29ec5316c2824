use thiserror::Error;

use crate::services::auth::introspector::IntrospectError;

/// Which timestamp check rejected the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimsViolation {
    Expired,
    IssuedInFuture,
    NotYetValid,
}

impl std::fmt::Display for ClaimsViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expired => write!(f, "token is expired"),
            Self::IssuedInFuture => write!(f, "token used before issued"),
            Self::NotYetValid => write!(f, "token is not valid yet"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClaimsDecodeError {
    #[error("token is not a jwt (expected header.payload.signature)")]
    NotJwt,
    #[error("payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not valid claims json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Every reason a bearer token can be refused.
///
/// All variants end up as 401; the variant itself is only for logs and tests.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token introspection failed: {0}")]
    IntrospectionFailed(#[source] IntrospectError),
    #[error("token is not active")]
    TokenNotActive,
    #[error("malformed token claims: {0}")]
    MalformedClaims(#[source] ClaimsDecodeError),
    #[error("invalid token claims: {0}")]
    ClaimsInvalid(ClaimsViolation),
    #[error("\"sub\" is not defined")]
    SubjectNotDefined,
    #[error("no allowed resources")]
    NoAllowedResources,
    #[error("no required resource role")]
    NoRequiredResourceRole,
}
