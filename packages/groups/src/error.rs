use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum GroupsError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("group not found: {0}")]
    GroupNotFound(Uuid),

    #[error("member not found: {0}")]
    MemberNotFound(Uuid),

    #[error("membership not found: {0}")]
    MembershipNotFound(Uuid),

    #[error("invalid rule configuration: {0}")]
    Rule(#[from] flock_engine::EngineError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GroupsError>;
