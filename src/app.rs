/*
 * Responsibility
 * - Config 読み込み → logger 初期化 → 依存生成 (TokenAuthorizer)
 * - client / debug の 2 サーバを起動し、シグナルで graceful shutdown
 * - 停止待ちは SHUTDOWN_TIMEOUT で打ち切る
 */
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use crate::{
    config::Config,
    logger,
    server,
    services::auth::{AuthorizationRequirement, build_token_authorizer},
    shutdown::{self, shutdown_signal},
    state::AppState,
};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(3);

pub async fn run() -> Result<()> {
    let config = Config::from_env().context("load config")?;
    let log_level = logger::init(&config.log).context("init logger")?;

    tracing::info!(env = ?config.app_env, "starting chat service");

    let authorizer = build_token_authorizer(&config).context("init keycloak client")?;
    let requirement = AuthorizationRequirement::new(
        config.auth.required_resource.clone(),
        config.auth.required_role.clone(),
    );
    let state = AppState::new(authorizer, requirement);

    let client_listener = TcpListener::bind(config.client_server.addr)
        .await
        .with_context(|| format!("bind client server on {}", config.client_server.addr))?;
    let debug_listener = TcpListener::bind(config.debug_server.addr)
        .await
        .with_context(|| format!("bind debug server on {}", config.debug_server.addr))?;

    let (trigger, stopped) = shutdown::channel();

    let servers = async {
        tokio::try_join!(
            server::serve(
                "client",
                client_listener,
                server::client::router(&config.client_server, state),
                stopped.clone(),
            ),
            server::serve(
                "debug",
                debug_listener,
                server::debug::router(log_level),
                stopped,
            ),
        )
    };
    tokio::pin!(servers);

    tokio::select! {
        res = &mut servers => {
            // a server stopped on its own, before any signal
            res.context("serve")?;
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    trigger.fire();

    match tokio::time::timeout(SHUTDOWN_TIMEOUT, servers).await {
        Ok(res) => {
            res.context("serve")?;
            tracing::info!("shutdown complete");
        }
        Err(_) => tracing::warn!(timeout = ?SHUTDOWN_TIMEOUT, "graceful shutdown timed out"),
    }

    Ok(())
}
