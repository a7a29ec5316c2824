/*
 * Responsibility
 * - debug サーバの Router 組み立て
 *   - GET /            : index (リンク一覧 + log level 変更フォーム)
 *   - GET /version     : ビルド情報
 *   - GET|PUT /log/level : 実行中のログレベル参照 / 変更
 * - 外部公開しない前提 (認証なし)
 */
mod index;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::logger::{LogLevel, LogLevelHandle};
use crate::middleware::http;

pub use index::IndexPage;

#[derive(Clone, Debug)]
struct DebugState {
    log_level: LogLevelHandle,
    index: Arc<IndexPage>,
}

#[derive(Debug, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
}

pub const BUILD_INFO: BuildInfo = BuildInfo {
    name: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
};

#[derive(Debug, Deserialize)]
struct LevelForm {
    level: Option<String>,
}

pub fn router(log_level: LogLevelHandle) -> Router {
    let mut index = IndexPage::default();
    index.add_page("/version", "Get build information");
    index.add_page("/log/level", "Get log level");

    let state = DebugState {
        log_level,
        index: Arc::new(index),
    };

    let app = Router::new()
        .route("/", get(index_page))
        .route("/version", get(version))
        .route("/log/level", get(get_log_level).put(set_log_level))
        .with_state(state);

    http::apply(app)
}

async fn index_page(State(state): State<DebugState>) -> Html<String> {
    Html(state.index.render(state.log_level.level().ok()))
}

async fn version() -> Json<BuildInfo> {
    Json(BUILD_INFO)
}

async fn get_log_level(State(state): State<DebugState>) -> Response {
    match state.log_level.level() {
        Ok(level) => level_response(level),
        Err(err) => {
            tracing::error!(error = %err, "failed to read log level");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn set_log_level(State(state): State<DebugState>, Form(form): Form<LevelForm>) -> Response {
    let Some(raw) = form.level.filter(|l| !l.is_empty()) else {
        return (StatusCode::BAD_REQUEST, Json("level is required")).into_response();
    };

    let level = match raw.parse::<LogLevel>() {
        Ok(level) => level,
        Err(err) => return (StatusCode::BAD_REQUEST, Json(err.to_string())).into_response(),
    };

    if let Err(err) = state.log_level.set_level(level) {
        tracing::error!(error = %err, "failed to change log level");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    tracing::info!(level = %level, "log level changed");
    level_response(level)
}

fn level_response(level: LogLevel) -> Response {
    Json(HashMap::from([("level", level.as_str())])).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use serde_json::json;
    use tower::ServiceExt;
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;

    // The handle only works while the subscriber owning its layer is alive.
    fn app() -> (Router, LogLevelHandle, Box<dyn tracing::Subscriber + Send + Sync>) {
        let (layer, handle) = LogLevelHandle::layer(LogLevel::Info);
        let subscriber = tracing_subscriber::registry().with(layer);
        (router(handle.clone()), handle, Box::new(subscriber))
    }

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn put_level(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri("/log/level")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn version_reports_package() {
        let (app, _handle, _sub) = app();
        let res = app
            .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            body_json(res).await,
            json!({"name": env!("CARGO_PKG_NAME"), "version": env!("CARGO_PKG_VERSION")})
        );
    }

    #[tokio::test]
    async fn get_log_level_returns_current() {
        let (app, _handle, _sub) = app();
        let res = app
            .oneshot(Request::builder().uri("/log/level").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, json!({"level": "info"}));
    }

    #[tokio::test]
    async fn put_log_level_changes_level() {
        let (app, handle, _sub) = app();
        let res = app.oneshot(put_level("level=debug")).await.unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, json!({"level": "debug"}));
        assert_eq!(handle.level().unwrap(), LogLevel::Debug);
    }

    #[tokio::test]
    async fn put_log_level_rejects_missing_or_unknown() {
        let (app, handle, _sub) = app();

        for body in ["", "level=", "level=verbose"] {
            let res = app.clone().oneshot(put_level(body)).await.unwrap();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {body:?}");
        }
        assert_eq!(handle.level().unwrap(), LogLevel::Info);
    }

    #[tokio::test]
    async fn index_lists_pages() {
        let (app, _handle, _sub) = app();
        let res = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/version"));
        assert!(html.contains("/log/level"));
        assert!(html.contains(r#"<option value="info" selected>"#));
    }
}
