use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Credentials or session token did not match.
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    KeyNotFound(String),
    #[error("{0}")]
    ExistingKey(String),
    #[error("{0}")]
    InvalidAmount(String),
    #[error("{0}")]
    InvalidName(String),
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}
