/*
 * Responsibility
 * - client API サーバの Router 組み立て
 *   - /v1 配下 (health は公開, getHistory は認可必須)
 *   - CORS / request-id / body limit / timeout / access log / panic recovery
 */
use axum::Router;

use crate::api;
use crate::config::ClientServerConfig;
use crate::middleware::{cors, http};
use crate::state::AppState;

pub fn router(config: &ClientServerConfig, state: AppState) -> Router {
    let app = Router::new()
        .nest("/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let app = cors::apply(app, config);
    http::apply(app)
}
