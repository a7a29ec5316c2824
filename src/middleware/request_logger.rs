//! Access log: one line per request, after the response is produced.
//!
//! 5xx is logged at `error`, 4xx at `warn`, the rest at `info`.
//! OPTIONS (CORS preflight) is not logged. `user_id` is read from the response
//! extensions, where the auth middleware leaves the verified identity.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderMap, Method, Request, header},
    middleware::Next,
    response::Response,
};

use crate::middleware::http::REQUEST_ID_HEADER;
use crate::services::auth::Identity;

pub async fn log_request(req: Request<Body>, next: Next) -> Response {
    if req.method() == Method::OPTIONS {
        return next.run(req).await;
    }

    let start = Instant::now();

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let headers = req.headers();
    let host = header_str(headers, header::HOST.as_str()).to_string();
    let request_id = header_str(headers, REQUEST_ID_HEADER).to_string();
    let user_agent = header_str(headers, header::USER_AGENT.as_str()).to_string();
    let remote_ip = remote_ip(&req);

    let res = next.run(req).await;

    let user_id = res
        .extensions()
        .get::<Identity>()
        .map(|i| i.subject().to_string())
        .unwrap_or_default();

    let latency = start.elapsed();
    let status = res.status();

    macro_rules! access_log {
        ($level:ident, $message:literal) => {
            tracing::$level!(
                latency = ?latency,
                remote_ip = %remote_ip,
                host = %host,
                method = %method,
                path = %path,
                request_id = %request_id,
                user_agent = %user_agent,
                status = status.as_u16(),
                user_id = %user_id,
                $message
            )
        };
    }

    if status.is_server_error() {
        access_log!(error, "request completed with error");
    } else if status.is_client_error() {
        access_log!(warn, "request rejected");
    } else {
        access_log!(info, "request completed");
    }

    res
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

// X-Forwarded-For, then X-Real-IP, then the socket peer
fn remote_ip(req: &Request<Body>) -> String {
    let headers = req.headers();

    if let Some(first) = header_str(headers, "x-forwarded-for")
        .split(',')
        .map(str::trim)
        .find(|s| !s.is_empty())
    {
        return first.to_string();
    }

    let real_ip = header_str(headers, "x-real-ip");
    if !real_ip.is_empty() {
        return real_ip.to_string();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn remote_ip_prefers_forwarded_header() {
        let mut req = Request::new(Body::empty());
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 1], 4000))));
        assert_eq!(remote_ip(&req), "10.0.0.1");

        req.headers_mut()
            .insert("x-real-ip", HeaderValue::from_static("192.0.2.7"));
        assert_eq!(remote_ip(&req), "192.0.2.7");

        req.headers_mut().insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.5, 10.0.0.2"),
        );
        assert_eq!(remote_ip(&req), "203.0.113.5");
    }

    #[test]
    fn remote_ip_is_empty_without_any_source() {
        assert_eq!(remote_ip(&Request::new(Body::empty())), "");
    }
}
