/*
 * Responsibility
 * - POST /v1/getHistory
 * - body の形式チェック → (現状は固定の) メッセージ履歴を返す
 * - 認可は middleware 側で済んでいる前提 (AuthIdentity)
 */
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::HeaderMap,
};
use chrono::{Duration, Utc};

use crate::{
    api::v1::dto::history::{GetHistoryRequest, GetHistoryResponse, Message, MessagesPage},
    api::v1::extractors::AuthIdentity,
    error::AppError,
    middleware::http::REQUEST_ID_HEADER,
    types::{MessageId, UserId},
};

pub async fn get_history(
    AuthIdentity(identity): AuthIdentity,
    headers: HeaderMap,
    payload: Result<Json<GetHistoryRequest>, JsonRejection>,
) -> Result<Json<GetHistoryResponse>, AppError> {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    tracing::info!(request_id, "received getHistory request");

    let Json(req) = payload.map_err(|err| {
        tracing::warn!(request_id, error = %err, "failed to bind request");
        AppError::bad_request("INVALID_REQUEST", "invalid request format")
    })?;
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_REQUEST", msg))?;

    let client_id = identity.user_id().unwrap_or_default();

    Ok(Json(GetHistoryResponse {
        data: stub_page(client_id),
    }))
}

// Placeholder history until messages are served from the store.
fn stub_page(client_id: UserId) -> MessagesPage {
    let now = Utc::now();

    MessagesPage {
        messages: vec![
            Message {
                id: MessageId::new(),
                author_id: UserId::new(),
                body: "Hello! Let's sort this out.".to_string(),
                created_at: now,
            },
            Message {
                id: MessageId::new(),
                author_id: client_id,
                body: "Hi! I can't withdraw money from my card,\nit says 'card is blocked'"
                    .to_string(),
                created_at: now - Duration::minutes(1),
            },
        ],
        next: String::new(),
    }
}
