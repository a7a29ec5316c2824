//! Bearer token → TokenAuthorizer → Identity を extensions に入れる
//!
//! - 形式不正 (ヘッダなし / Bearer 以外 / 空) は 400
//! - 認可失敗はすべて 401 (原因はログのみ)
//! - Identity は request と response の両方の extensions に載せる
//!   (response 側は request_logger が user_id を出すため)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::middleware::auth::bearer::token_from_headers;
use crate::state::AppState;

/// 保護したいルート群に認可を掛ける。
///
/// `route_layer` なので、マッチしないパスは 404 のまま (401 にならない)。
///
/// ```ignore
/// let protected = Router::new().route("/getHistory", post(get_history));
/// let protected = middleware::auth::require(protected, state.clone());
/// ```
pub fn require(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = token_from_headers(req.headers())?;

    let identity = state.authorizer.authorize(token, &state.requirement).await?;

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(identity.clone());

    let mut res = next.run(req).await;
    res.extensions_mut().insert(identity);
    Ok(res)
}
