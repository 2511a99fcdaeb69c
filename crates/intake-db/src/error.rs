use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Failure of the underlying storage medium. Callers report these to users
/// as a generic internal error; details only go to the log.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database lock poisoned")]
    Poisoned,
}
