// src/db/connection.rs
//
// Database connection management
//
// PRINCIPLES:
// - Explicit connection pooling
// - No hidden connection creation
// - Clear error propagation
// - Thread-safe access

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::config::EngineConfig;
use crate::error::{AppError, AppResult};

/// Type alias for connection pool
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled connection
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Collation used by the identifier columns. Folds case with full Unicode
/// lowercase mapping, so "MÁY-Đ1" and "máy-đ1" compare equal.
pub const IDENTIFIER_COLLATION: &str = "UNICASE";

/// Case-insensitive comparison over Unicode lowercase mappings
pub fn unicase_compare(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Registers the ledger's collations on a connection.
///
/// Must run before the schema is touched: tables and unique indexes are
/// declared with `COLLATE UNICASE`.
pub fn register_collations(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_collation(IDENTIFIER_COLLATION, unicase_compare)
}

/// Get the database file path
///
/// An explicit path from the config wins. Otherwise the database lives in
/// the application data directory: {APP_DATA}/assetledger/assets.db
pub fn get_database_path(config: &EngineConfig) -> AppResult<PathBuf> {
    if let Some(path) = &config.database_path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        return Ok(path.clone());
    }

    let app_data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::Config("Could not determine app data directory".to_string()))?;

    let ledger_dir = app_data_dir.join("assetledger");

    // Ensure directory exists
    std::fs::create_dir_all(&ledger_dir)?;

    Ok(ledger_dir.join("assets.db"))
}

/// Create a connection pool from the engine config
pub fn create_connection_pool(config: &EngineConfig) -> AppResult<ConnectionPool> {
    let db_path = get_database_path(config)?;
    create_pool_at(&db_path, config.pool_max_size, config.busy_timeout_ms)
}

/// Create a connection pool for a database file
///
/// Every connection gets:
/// - Foreign keys enabled (cascading deletes depend on it)
/// - WAL journal for concurrent readers
/// - Busy timeout so writers queue instead of failing immediately
/// - The UNICASE identifier collation
pub fn create_pool_at(db_path: &Path, max_size: u32, busy_timeout_ms: u32) -> AppResult<ConnectionPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(move |conn| {
        register_collations(conn)?;
        conn.execute_batch(&format!(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = {};",
            busy_timeout_ms
        ))?;
        Ok(())
    });

    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| AppError::Pool(format!("Failed to create connection pool: {}", e)))?;

    log::debug!("connection pool ready at {} (max {})", db_path.display(), max_size);
    Ok(pool)
}

/// Get a connection from the pool
///
/// This is a convenience wrapper that provides better error messages.
pub fn get_connection(pool: &ConnectionPool) -> AppResult<PooledConn> {
    pool.get()
        .map_err(|e| AppError::Pool(format!("Failed to get database connection: {}", e)))
}

/// Create a standalone connection (for testing)
///
/// This creates an in-memory database, useful for unit tests.
pub fn create_test_connection() -> AppResult<Connection> {
    let conn = Connection::open_in_memory()?;
    register_collations(&conn)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

/// Temporary on-disk database with the schema applied.
///
/// The directory guard must outlive the pool.
#[cfg(test)]
pub(crate) fn create_test_pool() -> (tempfile::TempDir, std::sync::Arc<ConnectionPool>) {
    let dir = tempfile::tempdir().expect("temp dir");
    let pool = create_pool_at(&dir.path().join("assets.db"), 4, 5000).expect("pool");
    {
        let conn = pool.get().expect("connection");
        crate::db::initialize_database(&conn).expect("schema");
    }
    (dir, std::sync::Arc::new(pool))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_database_path() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            database_path: Some(dir.path().join("nested").join("ledger.db")),
            ..EngineConfig::default()
        };
        let path = get_database_path(&config).unwrap();
        assert!(path.ends_with("nested/ledger.db"));
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn test_connection_pool_creation() {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_pool_at(&dir.path().join("assets.db"), 2, 1000).unwrap();
        let conn = get_connection(&pool).unwrap();

        // Verify foreign keys are enabled
        let fk_enabled: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk_enabled, 1);
    }

    #[test]
    fn test_test_connection() {
        let conn = create_test_connection().unwrap();

        let result: i32 = conn
            .query_row("SELECT 1 + 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(result, 2);

        let fk_enabled: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk_enabled, 1);
    }

    #[test]
    fn test_unicase_compare_folds_non_ascii() {
        assert_eq!(unicase_compare("MÁY-Đ1", "máy-đ1"), Ordering::Equal);
        assert_eq!(unicase_compare("ÄRM", "ärm"), Ordering::Equal);
        assert_ne!(unicase_compare("máy-đ1", "may-d1"), Ordering::Equal);
        assert_eq!(unicase_compare("a", "B"), Ordering::Less);
    }

    #[test]
    fn test_pooled_connections_know_the_collation() {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_pool_at(&dir.path().join("assets.db"), 2, 1000).unwrap();
        let conn = get_connection(&pool).unwrap();

        let equal: bool = conn
            .query_row("SELECT 'ĐÔ' = 'đô' COLLATE UNICASE", [], |row| row.get(0))
            .unwrap();
        assert!(equal);
    }
}
