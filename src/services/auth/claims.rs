//! Keycloak access-token claims, decoded without signature verification.
//!
//! Only call [`TokenClaims::decode`] after the token has been introspected as
//! active: the payload is untrusted until then.

use std::collections::{HashMap, HashSet};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::services::auth::error::{ClaimsDecodeError, ClaimsViolation};

/// Roles granted for one resource (`resource_access.<client>.roles`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceRoles {
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: HashSet<String>,
}

// `null` reads as an empty value, the same as an absent key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,

    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub nbf: Option<i64>,

    // `null` and a missing key both mean "no resources"; a `null` entry is a
    // resource granted with no roles
    #[serde(default)]
    pub resource_access: Option<HashMap<String, Option<ResourceRoles>>>,
}

impl TokenClaims {
    /// Decode the payload segment of a compact JWT.
    pub fn decode(token: &str) -> Result<Self, ClaimsDecodeError> {
        let mut parts = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ClaimsDecodeError::NotJwt);
        };

        // compact serialization drops the padding, but tolerate it
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Checks `exp`, `iat` and `nbf` (in that order) against `now`.
    ///
    /// Absent claims are not checked. `leeway` widens every bound by that many
    /// seconds to tolerate clock skew between us and the identity provider.
    pub fn validate_times(&self, now: i64, leeway: i64) -> Result<(), ClaimsViolation> {
        if let Some(exp) = self.exp
            && now > exp.saturating_add(leeway)
        {
            return Err(ClaimsViolation::Expired);
        }
        if let Some(iat) = self.iat
            && now < iat.saturating_sub(leeway)
        {
            return Err(ClaimsViolation::IssuedInFuture);
        }
        if let Some(nbf) = self.nbf
            && now < nbf.saturating_sub(leeway)
        {
            return Err(ClaimsViolation::NotYetValid);
        }
        Ok(())
    }

    /// Subject, if it is non-empty and not the nil UUID placeholder.
    pub fn defined_subject(&self) -> Option<&str> {
        let sub = self.sub.as_deref()?;
        if sub.trim().is_empty() {
            return None;
        }
        match Uuid::parse_str(sub.trim()) {
            Ok(id) if id.is_nil() => None,
            _ => Some(sub),
        }
    }

    pub fn has_resources(&self) -> bool {
        self.resource_access.as_ref().is_some_and(|m| !m.is_empty())
    }

    pub fn has_resource_role(&self, resource: &str, role: &str) -> bool {
        self.resource_access
            .as_ref()
            .and_then(|m| m.get(resource))
            .and_then(Option::as_ref)
            .is_some_and(|r| r.roles.contains(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE;
    use serde_json::json;

    fn token_with(payload: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.we-dont-check-signature")
    }

    #[test]
    fn decodes_keycloak_payload() {
        let token = token_with(json!({
            "exp": 2667199580i64,
            "iat": 1667199280,
            "aud": ["account", "chat-ui-client"],
            "sub": "5cb40dc0-a249-4783-a301-9e1f3cf3ea41",
            "realm_access": {"roles": ["offline_access"]},
            "resource_access": {
                "chat-ui-client": {"roles": ["support-chat-client"]},
                "account": {"roles": ["manage-account", "view-profile"]}
            },
            "scope": "openid profile email"
        }));

        let claims = TokenClaims::decode(&token).unwrap();
        assert_eq!(claims.defined_subject(), Some("5cb40dc0-a249-4783-a301-9e1f3cf3ea41"));
        assert!(claims.has_resource_role("chat-ui-client", "support-chat-client"));
        assert!(claims.has_resource_role("account", "view-profile"));
        assert!(!claims.has_resource_role("account", "support-chat-client"));
        assert!(!claims.has_resource_role("unknown", "view-profile"));
    }

    #[test]
    fn null_roles_mean_no_roles() {
        for resource_access in [
            json!({"chat-ui-client": null}),
            json!({"chat-ui-client": {"roles": null}}),
            json!({"chat-ui-client": {}}),
        ] {
            let token = token_with(json!({"sub": "a", "resource_access": resource_access}));
            let claims = TokenClaims::decode(&token).unwrap();
            assert!(claims.has_resources(), "{resource_access}");
            assert!(
                !claims.has_resource_role("chat-ui-client", "support-chat-client"),
                "{resource_access}"
            );
        }
    }

    #[test]
    fn null_resource_access_means_no_resources() {
        let token = token_with(json!({"sub": "a", "resource_access": null}));
        assert!(!TokenClaims::decode(&token).unwrap().has_resources());
    }

    #[test]
    fn accepts_padded_payload() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let body = URL_SAFE.encode(json!({"sub": "a"}).to_string());
        let claims = TokenClaims::decode(&format!("{header}.{body}.")).unwrap();
        assert_eq!(claims.defined_subject(), Some("a"));
    }

    #[test]
    fn rejects_non_jwt_shapes() {
        assert!(matches!(
            TokenClaims::decode("opaque-token"),
            Err(ClaimsDecodeError::NotJwt)
        ));
        assert!(matches!(
            TokenClaims::decode("a.b.c.d"),
            Err(ClaimsDecodeError::NotJwt)
        ));
        assert!(matches!(
            TokenClaims::decode("a.!!!.c"),
            Err(ClaimsDecodeError::Base64(_))
        ));

        let not_json = URL_SAFE_NO_PAD.encode("hello");
        assert!(matches!(
            TokenClaims::decode(&format!("h.{not_json}.s")),
            Err(ClaimsDecodeError::Json(_))
        ));

        let bad_type = URL_SAFE_NO_PAD.encode(json!({"exp": "tomorrow"}).to_string());
        assert!(matches!(
            TokenClaims::decode(&format!("h.{bad_type}.s")),
            Err(ClaimsDecodeError::Json(_))
        ));
    }

    #[test]
    fn subject_placeholders_are_undefined() {
        let mut claims: TokenClaims = serde_json::from_value(json!({})).unwrap();
        assert_eq!(claims.defined_subject(), None);

        claims.sub = Some("   ".into());
        assert_eq!(claims.defined_subject(), None);

        claims.sub = Some("00000000-0000-0000-0000-000000000000".into());
        assert_eq!(claims.defined_subject(), None);

        claims.sub = Some("service-account-chat".into());
        assert_eq!(claims.defined_subject(), Some("service-account-chat"));
    }

    #[test]
    fn time_checks_run_in_order_with_leeway() {
        let now = 1_700_000_000;
        let claims: TokenClaims = serde_json::from_value(json!({
            "exp": now - 10,
            "iat": now + 10,
            "nbf": now + 10,
        }))
        .unwrap();

        // expiry wins over the other violations
        assert_eq!(claims.validate_times(now, 0), Err(ClaimsViolation::Expired));
        // within skew, all three pass
        assert_eq!(claims.validate_times(now, 10), Ok(()));

        let future: TokenClaims = serde_json::from_value(json!({
            "exp": now + 60,
            "iat": now + 5,
        }))
        .unwrap();
        assert_eq!(future.validate_times(now, 0), Err(ClaimsViolation::IssuedInFuture));
        assert_eq!(future.validate_times(now, 5), Ok(()));

        let not_yet: TokenClaims = serde_json::from_value(json!({
            "exp": now + 60,
            "iat": now,
            "nbf": now + 30,
        }))
        .unwrap();
        assert_eq!(not_yet.validate_times(now, 0), Err(ClaimsViolation::NotYetValid));
    }

    #[test]
    fn missing_timestamps_are_not_checked() {
        let claims: TokenClaims = serde_json::from_value(json!({"sub": "x"})).unwrap();
        assert_eq!(claims.validate_times(i64::MAX, 0), Ok(()));
    }
}
