/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 認証が必要な範囲 (getHistory) にだけ route_layer で auth を適用
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{health::health, history::get_history};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new().route("/getHistory", post(get_history));
    let protected = middleware::auth::require(protected, state);

    Router::new().route("/health", get(health)).merge(protected)
}
