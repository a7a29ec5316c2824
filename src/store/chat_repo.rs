/*
 * Responsibility
 * - chats テーブル向け SQLx 操作
 * - client_id (= Keycloak の sub) ごとにチャットは 1 つ
 * - 削除は messages / problems へ ON DELETE CASCADE
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::store::error::RepoError;
use crate::types::{ChatId, UserId};

#[derive(Debug, Clone, FromRow)]
pub struct ChatRow {
    pub id: ChatId,
    pub client_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn check_client_id(client_id: UserId) -> Result<(), RepoError> {
    if client_id.is_nil() {
        return Err(RepoError::Validation("client_id cannot be nil"));
    }
    Ok(())
}

pub async fn create(db: &PgPool, client_id: UserId) -> Result<ChatRow, RepoError> {
    check_client_id(client_id)?;

    let row = sqlx::query_as::<_, ChatRow>(
        r#"
        INSERT INTO chats (id, client_id)
        VALUES ($1, $2)
        RETURNING id, client_id, created_at, updated_at
        "#,
    )
    .bind(ChatId::new())
    .bind(client_id)
    .fetch_one(db)
    .await?;

    Ok(row)
}

/// Chat of `client_id`, created on first use.
pub async fn get_or_create(db: &PgPool, client_id: UserId) -> Result<ChatRow, RepoError> {
    check_client_id(client_id)?;

    // no-op update so RETURNING also yields the existing row
    let row = sqlx::query_as::<_, ChatRow>(
        r#"
        INSERT INTO chats (id, client_id)
        VALUES ($1, $2)
        ON CONFLICT (client_id) DO UPDATE SET client_id = EXCLUDED.client_id
        RETURNING id, client_id, created_at, updated_at
        "#,
    )
    .bind(ChatId::new())
    .bind(client_id)
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn get(db: &PgPool, chat_id: ChatId) -> Result<Option<ChatRow>, RepoError> {
    let row = sqlx::query_as::<_, ChatRow>(
        r#"
        SELECT id, client_id, created_at, updated_at
        FROM chats
        WHERE id = $1
        "#,
    )
    .bind(chat_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn get_by_client(db: &PgPool, client_id: UserId) -> Result<Option<ChatRow>, RepoError> {
    let row = sqlx::query_as::<_, ChatRow>(
        r#"
        SELECT id, client_id, created_at, updated_at
        FROM chats
        WHERE client_id = $1
        "#,
    )
    .bind(client_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn touch(db: &PgPool, chat_id: ChatId) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        UPDATE chats
        SET updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(chat_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(db: &PgPool, chat_id: ChatId) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM chats
        WHERE id = $1
        "#,
    )
    .bind(chat_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
