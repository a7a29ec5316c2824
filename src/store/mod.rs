/*
 * Responsibility
 * - chats / messages / problems テーブル向け SQLx 操作
 * - マイグレーション (migrations/)
 */
pub mod chat_repo;
pub mod error;
pub mod message_repo;
pub mod problem_repo;

use sqlx::PgPool;

pub async fn migrate(db: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(db).await
}
