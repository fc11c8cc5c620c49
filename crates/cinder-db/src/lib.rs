//! # cinder-db
//!
//! Database access layer for the Cinder daemon.
//! Manages the single SQLite database at `$CINDER_DATA_DIR/cinder.db`.
//!
//! ## Conventions
//!
//! - WAL mode mandatory
//! - Foreign keys enforced
//! - Timestamps are Unix epoch seconds (i64)
//! - Calendar dates are ISO `YYYY-MM-DD` TEXT columns
//! - Schema version stored in `PRAGMA user_version`

pub mod migrations;
pub mod queries;
pub mod schema;

use std::path::Path;

use rusqlite::Connection;

use cinder_types::EngineError;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Database error types.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Unique and check violations get their own variant so engines can treat
/// them as conflicts rather than opaque store failures.
impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(err, msg)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                DbError::Constraint(msg.unwrap_or_else(|| err.to_string()))
            }
            other => DbError::Sqlite(other),
        }
    }
}

impl From<DbError> for EngineError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(what) => EngineError::NotFound(what),
            DbError::Constraint(what) => EngineError::Conflict(what),
            other => EngineError::Store(other.to_string()),
        }
    }
}

/// Open or create the Cinder database at the given path.
///
/// Configures WAL mode, foreign keys, and runs any pending migrations.
pub fn open(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing).
pub fn open_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure(&conn)?;
    migrations::run(&conn)?;
    Ok(conn)
}

/// Configure SQLite pragmas.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;
         PRAGMA synchronous = NORMAL;
         PRAGMA cache_size = -8000;",
    )?;
    Ok(())
}
