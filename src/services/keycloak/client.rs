use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::services::auth::introspector::{IntrospectError, Introspection, Introspector};

#[derive(Debug, Error)]
pub enum KeycloakError {
    #[error("invalid keycloak base path: {0}")]
    InvalidBasePath(#[from] url::ParseError),
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct KeycloakOptions {
    pub base_path: String,
    pub realm: String,
    pub client_id: String,
    pub client_secret: String,
    // Logs outgoing URLs and raw response bodies at debug level.
    pub debug_mode: bool,
}

#[derive(Debug, Deserialize)]
struct IntrospectTokenResult {
    active: bool,
}

/// Keycloak OAuth2 token-introspection client.
///
/// - Authenticates itself with the confidential client's id/secret (basic auth).
/// - Cheap to share: `reqwest::Client` pools connections internally.
#[derive(Clone)]
pub struct KeycloakClient {
    http: Client,
    introspect_url: Url,
    client_id: String,
    client_secret: String,
    debug_mode: bool,
}

impl std::fmt::Debug for KeycloakClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the client secret
        f.debug_struct("KeycloakClient")
            .field("introspect_url", &self.introspect_url.as_str())
            .field("client_id", &self.client_id)
            .field("debug_mode", &self.debug_mode)
            .finish()
    }
}

impl KeycloakClient {
    pub fn new(opts: KeycloakOptions) -> Result<Self, KeycloakError> {
        let introspect_url = Self::introspect_url(&opts.base_path, &opts.realm)?;
        let http = Client::builder().build()?;

        Ok(Self {
            http,
            introspect_url,
            client_id: opts.client_id,
            client_secret: opts.client_secret,
            debug_mode: opts.debug_mode,
        })
    }

    // {base}/realms/{realm}/protocol/openid-connect/token/introspect
    fn introspect_url(base_path: &str, realm: &str) -> Result<Url, url::ParseError> {
        let base = format!("{}/", base_path.trim_end_matches('/'));
        Url::parse(&base)?.join(&format!(
            "realms/{realm}/protocol/openid-connect/token/introspect"
        ))
    }
}

#[async_trait]
impl Introspector for KeycloakClient {
    async fn introspect(&self, token: &str) -> Result<Introspection, IntrospectError> {
        if self.debug_mode {
            tracing::debug!(url = %self.introspect_url, "keycloak introspect request");
        }

        let resp = self
            .http
            .post(self.introspect_url.clone())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("token", token)])
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    IntrospectError::DeadlineExceeded
                } else {
                    IntrospectError::Transport(err)
                }
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(IntrospectError::Transport)?;

        if self.debug_mode {
            tracing::debug!(%status, body = %body, "keycloak introspect response");
        }

        if !status.is_success() {
            tracing::warn!(%status, "keycloak returned non-success");
            return Err(IntrospectError::Status(status));
        }

        let result: IntrospectTokenResult =
            serde_json::from_str(&body).map_err(IntrospectError::Decode)?;

        Ok(Introspection {
            active: result.active,
        })
    }
}
