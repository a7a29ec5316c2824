/*
 * Responsibility
 * - messages テーブル向け SQLx 操作
 * - 保存前の値チェック (空 body / nil author は DB に投げる前に弾く)
 * - 可視性フラグの既定値は MessageCreate::new に集約
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::store::error::RepoError;
use crate::types::{ChatId, MessageId, ProblemId, UserId};

#[derive(Debug, Clone, FromRow)]
pub struct MessageRow {
    pub id: MessageId,
    pub chat_id: ChatId,
    pub problem_id: Option<ProblemId>,
    pub author_id: UserId,
    pub body: String,
    pub is_visible_for_client: bool,
    pub is_visible_for_manager: bool,
    pub is_blocked: bool,
    pub is_service: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct MessageCreate {
    chat_id: ChatId,
    author_id: UserId,
    body: String,
    problem_id: Option<ProblemId>,
    is_visible_for_client: bool,
    is_visible_for_manager: bool,
    is_blocked: bool,
    is_service: bool,
}

impl MessageCreate {
    pub fn new(chat_id: ChatId, author_id: UserId, body: impl Into<String>) -> Self {
        Self {
            chat_id,
            author_id,
            body: body.into(),
            problem_id: None,
            is_visible_for_client: true,
            is_visible_for_manager: true,
            is_blocked: false,
            is_service: false,
        }
    }

    pub fn problem(mut self, problem_id: ProblemId) -> Self {
        self.problem_id = Some(problem_id);
        self
    }

    pub fn visible_for_client(mut self, visible: bool) -> Self {
        self.is_visible_for_client = visible;
        self
    }

    pub fn visible_for_manager(mut self, visible: bool) -> Self {
        self.is_visible_for_manager = visible;
        self
    }

    pub fn blocked(mut self, blocked: bool) -> Self {
        self.is_blocked = blocked;
        self
    }

    /// Service messages are system notices, not authored text.
    pub fn service(mut self, service: bool) -> Self {
        self.is_service = service;
        self
    }

    pub fn check(&self) -> Result<(), RepoError> {
        if self.body.is_empty() {
            return Err(RepoError::Validation("message body cannot be empty"));
        }
        if self.author_id.is_nil() {
            return Err(RepoError::Validation("author_id cannot be nil"));
        }
        if self.problem_id.is_some_and(|p| p.is_nil()) {
            return Err(RepoError::Validation("problem_id cannot be nil"));
        }
        Ok(())
    }
}

pub async fn save(db: &PgPool, msg: MessageCreate) -> Result<MessageRow, RepoError> {
    msg.check()?;

    let row = sqlx::query_as::<_, MessageRow>(
        r#"
        INSERT INTO messages (
            id, chat_id, problem_id, author_id, body,
            is_visible_for_client, is_visible_for_manager, is_blocked, is_service
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING
            id, chat_id, problem_id, author_id, body,
            is_visible_for_client, is_visible_for_manager, is_blocked, is_service,
            created_at
        "#,
    )
    .bind(MessageId::new())
    .bind(msg.chat_id)
    .bind(msg.problem_id)
    .bind(msg.author_id)
    .bind(msg.body)
    .bind(msg.is_visible_for_client)
    .bind(msg.is_visible_for_manager)
    .bind(msg.is_blocked)
    .bind(msg.is_service)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn get(db: &PgPool, message_id: MessageId) -> Result<Option<MessageRow>, RepoError> {
    let row = sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT
            id, chat_id, problem_id, author_id, body,
            is_visible_for_client, is_visible_for_manager, is_blocked, is_service,
            created_at
        FROM messages
        WHERE id = $1
        "#,
    )
    .bind(message_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Messages of a chat visible to its client, newest first.
pub async fn list_for_client(
    db: &PgPool,
    chat_id: ChatId,
    limit: i64,
    before: Option<DateTime<Utc>>,
) -> Result<Vec<MessageRow>, RepoError> {
    let rows = sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT
            id, chat_id, problem_id, author_id, body,
            is_visible_for_client, is_visible_for_manager, is_blocked, is_service,
            created_at
        FROM messages
        WHERE chat_id = $1
          AND is_visible_for_client
          AND ($3::timestamptz IS NULL OR created_at < $3)
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(chat_id)
    .bind(limit)
    .bind(before)
    .fetch_all(db)
    .await?;

    Ok(rows)
}
