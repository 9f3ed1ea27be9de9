use thiserror::Error;

/// Store layer errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error(transparent)]
    CoreError(#[from] courtside_core::error::CoreError),
}

pub type DbResult<T> = std::result::Result<T, DbError>;
