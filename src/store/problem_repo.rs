/*
 * Responsibility
 * - problems テーブル向け SQLx 操作
 * - status は Postgres の problem_status enum に対応
 */
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::store::error::RepoError;
use crate::types::{ChatId, ProblemId, UserId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "problem_status", rename_all = "snake_case")]
pub enum ProblemStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl ProblemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for ProblemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProblemStatus {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(RepoError::Validation("unknown problem status")),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ProblemRow {
    pub id: ProblemId,
    pub chat_id: ChatId,
    pub manager_id: UserId,
    pub status: ProblemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn create(
    db: &PgPool,
    chat_id: ChatId,
    manager_id: UserId,
) -> Result<ProblemRow, RepoError> {
    if manager_id.is_nil() {
        return Err(RepoError::Validation("manager_id cannot be nil"));
    }

    let row = sqlx::query_as::<_, ProblemRow>(
        r#"
        INSERT INTO problems (id, chat_id, manager_id, status)
        VALUES ($1, $2, $3, $4)
        RETURNING id, chat_id, manager_id, status, created_at, updated_at
        "#,
    )
    .bind(ProblemId::new())
    .bind(chat_id)
    .bind(manager_id)
    .bind(ProblemStatus::default())
    .fetch_one(db)
    .await?;

    Ok(row)
}

pub async fn get(db: &PgPool, problem_id: ProblemId) -> Result<Option<ProblemRow>, RepoError> {
    let row = sqlx::query_as::<_, ProblemRow>(
        r#"
        SELECT id, chat_id, manager_id, status, created_at, updated_at
        FROM problems
        WHERE id = $1
        "#,
    )
    .bind(problem_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn list_by_chat(db: &PgPool, chat_id: ChatId) -> Result<Vec<ProblemRow>, RepoError> {
    let rows = sqlx::query_as::<_, ProblemRow>(
        r#"
        SELECT id, chat_id, manager_id, status, created_at, updated_at
        FROM problems
        WHERE chat_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(chat_id)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn set_status(
    db: &PgPool,
    problem_id: ProblemId,
    status: ProblemStatus,
) -> Result<Option<ProblemRow>, RepoError> {
    let row = sqlx::query_as::<_, ProblemRow>(
        r#"
        UPDATE problems
        SET status = $2, updated_at = now()
        WHERE id = $1
        RETURNING id, chat_id, manager_id, status, created_at, updated_at
        "#,
    )
    .bind(problem_id)
    .bind(status)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
