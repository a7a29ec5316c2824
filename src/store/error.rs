/**
 * Responsibility
 * - store が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("invalid entity: {0}")]
    Validation(&'static str),
}
