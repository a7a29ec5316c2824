/*
 * Responsibility
 * - client server の Router に紐づける共有コンテキスト (AppState)
 *   - authorizer: Keycloak introspection を行う TokenAuthorizer
 *   - requirement: 保護ルートが要求する resource / role
 * - Clone 前提で持つ (内部は Arc で Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::{AuthorizationRequirement, TokenAuthorizer};

#[derive(Clone, Debug)]
pub struct AppState {
    pub authorizer: Arc<TokenAuthorizer>,
    pub requirement: Arc<AuthorizationRequirement>,
}

impl AppState {
    pub fn new(authorizer: Arc<TokenAuthorizer>, requirement: AuthorizationRequirement) -> Self {
        Self {
            authorizer,
            requirement: Arc::new(requirement),
        }
    }
}
