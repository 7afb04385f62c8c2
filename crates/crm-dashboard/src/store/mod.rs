//! Connection provider and query executor over the CRM database.
//!
//! A [`SqliteStore`] is opened once at process start and handed to every
//! report and mutation. Each statement locks the connection only for its own
//! duration, so concurrent callers run one statement at a time.

mod schema;
mod value;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params_from_iter, Connection, ErrorCode, OpenFlags};
use tracing::debug;

use crate::config::DatabaseConfig;

pub use schema::{bootstrap_schema, seed_demo_data};
pub use value::{ResultSet, SqlValue, WriteAck};

/// Storage abstraction so reports and mutations can run against any backend.
pub trait QueryExecutor: Send + Sync {
    /// Runs a read statement and returns its rows with column names.
    fn fetch(&self, sql: &str, params: &[SqlValue]) -> Result<ResultSet, StoreError>;

    /// Runs a write statement and acknowledges how many rows it touched.
    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<WriteAck, StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database unavailable: {0}")]
    Connection(String),
    #[error("query failed: {0}")]
    Query(String),
    #[error("constraint violated: {0}")]
    Constraint(String),
}

impl StoreError {
    fn from_statement(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                Self::Constraint(message.unwrap_or_else(|| failure.to_string()))
            }
            other => Self::Query(other.to_string()),
        }
    }
}

/// Single-connection SQLite store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens the configured database and checks that it answers `SELECT 1`.
    pub fn open(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if config.create_if_missing {
            flags |= OpenFlags::SQLITE_OPEN_CREATE;
        }

        let conn = Connection::open_with_flags(&config.path, flags).map_err(|err| {
            StoreError::Connection(format!("{}: {err}", display_path(&config.path)))
        })?;
        Self::from_connection(conn)
    }

    /// Opens a private in-memory database.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|err| StoreError::Connection(err.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|err| StoreError::Connection(err.to_string()))?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|err| StoreError::Connection(err.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn acquire(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Connection("connection lock poisoned".to_string()))
    }

    /// Runs a batch of statements without parameters, e.g. schema DDL.
    pub fn execute_batch(&self, sql: &str) -> Result<(), StoreError> {
        let conn = self.acquire()?;
        conn.execute_batch(sql).map_err(StoreError::from_statement)
    }
}

impl QueryExecutor for SqliteStore {
    fn fetch(&self, sql: &str, params: &[SqlValue]) -> Result<ResultSet, StoreError> {
        debug!(sql = %compact(sql), params = params.len(), "fetch");
        let conn = self.acquire()?;
        let mut stmt = conn.prepare(sql).map_err(StoreError::from_statement)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = stmt
            .query(params_from_iter(params.iter()))
            .map_err(StoreError::from_statement)?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next().map_err(StoreError::from_statement)? {
            let values = (0..width)
                .map(|index| row.get::<_, SqlValue>(index))
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(StoreError::from_statement)?;
            collected.push(values);
        }

        Ok(ResultSet::new(columns, collected))
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<WriteAck, StoreError> {
        debug!(sql = %compact(sql), params = params.len(), "execute");
        let conn = self.acquire()?;
        let affected_rows = conn
            .execute(sql, params_from_iter(params.iter()))
            .map_err(StoreError::from_statement)?;
        let last_insert_id = if sql.trim_start().to_ascii_uppercase().starts_with("INSERT") {
            Some(conn.last_insert_rowid())
        } else {
            None
        };

        Ok(WriteAck {
            affected_rows,
            last_insert_id,
        })
    }
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn compact(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}
