use thiserror::Error;

use crate::schema::Table;

/// Errors produced by the store layer.
///
/// Absent rows on reads are not errors; those calls return `Option`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("No {table} with id {id}")]
    NotFound { table: Table, id: i64 },

    #[error("Author not found: {0}")]
    AuthorNotFound(i64),

    #[error("Blog not found: {0}")]
    BlogNotFound(i64),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Database lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;
