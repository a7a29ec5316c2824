/// Factory: build `TokenAuthorizer` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::TokenAuthorizer;
use crate::services::keycloak::{KeycloakClient, KeycloakError, KeycloakOptions};

pub fn build_token_authorizer(config: &Config) -> Result<Arc<TokenAuthorizer>, KeycloakError> {
    let keycloak = &config.keycloak;

    if keycloak.debug_mode && config.app_env.is_production() {
        tracing::warn!("keycloak client is running in debug mode in production environment");
    }

    let client = KeycloakClient::new(KeycloakOptions {
        base_path: keycloak.base_path.clone(),
        realm: keycloak.realm.clone(),
        client_id: keycloak.client_id.clone(),
        client_secret: keycloak.client_secret.clone(),
        debug_mode: keycloak.debug_mode,
    })?;

    Ok(Arc::new(TokenAuthorizer::new(
        Arc::new(client),
        config.auth.introspect_timeout,
        config.auth.clock_skew_seconds,
    )))
}
