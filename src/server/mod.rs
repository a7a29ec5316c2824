/*
 * Responsibility
 * - 2 つの HTTP サーバ (client API / debug) の Router 組み立てと起動
 */
pub mod client;
pub mod debug;

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crate::shutdown::ShutdownListener;

/// Serve `router` until `shutdown` fires, then drain in-flight requests.
pub async fn serve(
    name: &'static str,
    listener: TcpListener,
    router: Router,
    shutdown: ShutdownListener,
) -> std::io::Result<()> {
    tracing::info!(server = name, addr = %listener.local_addr()?, "listen and serve");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown.wait())
    .await
}
