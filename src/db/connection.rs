use rusqlite::Connection;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ServerError;

// Thread-local connection slot, remembered together with the file it points at.
thread_local! {
    static DB_CONN: RefCell<Option<(PathBuf, Connection)>> = const { RefCell::new(None) };
}

#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Provides this thread's connection to the closure, opening it on first use.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ServerError>,
    {
        DB_CONN
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                let stale = match slot.as_ref() {
                    Some((path, _)) => path != &self.path,
                    None => true,
                };
                if stale {
                    *slot = Some((self.path.clone(), open_connection(&self.path)?));
                }
                match slot.as_mut() {
                    Some((_, conn)) => f(conn),
                    None => Err(ServerError::InternalError),
                }
            })
            .map_err(|_| ServerError::InternalError)?
    }
}

fn open_connection(path: &Path) -> Result<Connection, ServerError> {
    let conn = Connection::open(path)
        .map_err(|e| ServerError::DbError(format!("Open DB failed: {e}")))?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| ServerError::DbError(format!("Enable foreign keys failed: {e}")))?;
    log::debug!("opened sqlite connection to {}", path.display());
    Ok(conn)
}

/// Initialize database from a SQL schema file
pub fn init_db(db: &Database, schema_path: impl AsRef<Path>) -> Result<(), ServerError> {
    let schema_path = schema_path.as_ref();
    let schema_sql = fs::read_to_string(schema_path).map_err(|e| {
        ServerError::DbError(format!(
            "Failed to read schema file {}: {e}",
            schema_path.display()
        ))
    })?;

    db.with_conn(|conn| {
        conn.execute_batch(&schema_sql)
            .map_err(|e| ServerError::DbError(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })?;

    log::info!("database initialized from {}", schema_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reopens_when_path_changes_on_same_thread() {
        let dir = tempfile::tempdir().unwrap();
        let a = Database::new(dir.path().join("a.sqlite"));
        let b = Database::new(dir.path().join("b.sqlite"));

        a.with_conn(|c| {
            c.execute_batch("create table only_in_a (x integer);")
                .map_err(|e| ServerError::DbError(e.to_string()))
        })
        .unwrap();

        let seen_in_b: i64 = b
            .with_conn(|c| {
                c.query_row(
                    "select count(*) from sqlite_master where name = 'only_in_a'",
                    [],
                    |r| r.get(0),
                )
                .map_err(|e| ServerError::DbError(e.to_string()))
            })
            .unwrap();
        assert_eq!(seen_in_b, 0);
    }

    #[test]
    fn init_db_applies_schema() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("schema.sqlite"));
        init_db(&db, "sql/schema.sql").unwrap();

        let tables: i64 = db
            .with_conn(|c| {
                c.query_row(
                    "select count(*) from sqlite_master where type = 'table' and name in ('programs', 'favorites', 'suggestions')",
                    [],
                    |r| r.get(0),
                )
                .map_err(|e| ServerError::DbError(e.to_string()))
            })
            .unwrap();
        assert_eq!(tables, 3);
    }

    #[test]
    fn missing_schema_file_is_a_db_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("x.sqlite"));
        let err = init_db(&db, dir.path().join("nope.sql")).unwrap_err();
        assert!(matches!(err, ServerError::DbError(_)));
    }
}
