//! CORS policy for the browser chat client.
//!
//! Responsibility:
//! - Allow only the configured origins (exact match), WITHOUT credentials.
//! - The client API is POST-only, so preflight only needs POST/OPTIONS.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::ClientServerConfig;

pub fn layer(config: &ClientServerConfig) -> CorsLayer {
    let allowed: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|s| HeaderValue::from_str(s.trim_end_matches('/')).ok())
        .collect();

    let allow_origin =
        AllowOrigin::predicate(move |origin: &HeaderValue, _req| allowed.iter().any(|v| v == origin));

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("x-request-id"),
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
        ])
        .max_age(std::time::Duration::from_secs(60 * 10))
}

/// Apply CORS policy to the given Router.
pub fn apply<S>(router: Router<S>, config: &ClientServerConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(layer(config))
}
