/*
 * Responsibility
 * - 開発用のチャット UI (static/) を配信するだけのサーバ
 * - 本番用途ではない
 */
use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_STATIC_DIR: &str = "static";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr: SocketAddr = std::env::var("UI_CLIENT_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .context("invalid UI_CLIENT_ADDR")?;
    let dir = std::env::var("UI_CLIENT_STATIC_DIR").unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string());

    let app = Router::new().fallback_service(ServeDir::new(&dir));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!(dir = %dir, "look at http://localhost:{}/", addr.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(chat_service::shutdown::shutdown_signal())
        .await?;
    Ok(())
}
