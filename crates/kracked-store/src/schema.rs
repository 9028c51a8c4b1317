//! Schema bootstrap.
//!
//! Tables are only ever created if absent. New columns or tables must arrive
//! as additional `CREATE ... IF NOT EXISTS` statements, never as destructive
//! changes to the ones below.

use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use crate::StoreError;

/// DDL for all tables, in dependency order.
///
/// `memory.project_id` declares a reference to `projects(id)` without any
/// cascade, and foreign key enforcement stays off for the connection.
pub const SCHEMA: &str = "
PRAGMA foreign_keys = OFF;

CREATE TABLE IF NOT EXISTS agents (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    role TEXT NOT NULL,
    level INTEGER DEFAULT 1,
    xp INTEGER DEFAULT 0
);

CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    status TEXT DEFAULT 'setup',
    scale TEXT DEFAULT 'STANDARD',
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS memory (
    id TEXT PRIMARY KEY,
    project_id TEXT,
    key TEXT NOT NULL,
    value TEXT,
    type TEXT DEFAULT 'local',
    FOREIGN KEY(project_id) REFERENCES projects(id)
);
";

/// Opens the database file, creating its parent directory if needed.
pub fn open(path: impl AsRef<Path>) -> Result<Connection, StoreError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent.display().to_string(), e))?;
    }
    let conn = Connection::open(path)?;
    info!("Database connection established at {}", path.display());
    Ok(conn)
}

/// Ensures the `agents`, `projects` and `memory` tables exist.
///
/// Safe to call on every start; existing tables and their rows are left alone.
pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(SCHEMA)?;
    info!("Database tables initialized");
    Ok(())
}

/// Opens the database at `path` and bootstraps its schema.
pub fn init_db(path: impl AsRef<Path>) -> Result<Connection, StoreError> {
    let conn = open(path)?;
    init_schema(&conn)?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_sql(conn: &Connection) -> Vec<(String, String)> {
        let mut stmt = conn
            .prepare("SELECT name, sql FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn creates_all_three_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let names: Vec<String> = table_sql(&conn).into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["agents", "memory", "projects"]);
    }

    #[test]
    fn bootstrap_twice_on_same_file_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("kracked.db");

        let first = init_db(&path).unwrap();
        first
            .execute("INSERT INTO agents (id, name, role) VALUES ('a1', 'Scout', 'recon')", [])
            .unwrap();
        let after_first = table_sql(&first);
        drop(first);

        let second = init_db(&path).unwrap();
        init_schema(&second).unwrap();
        assert_eq!(table_sql(&second), after_first);

        let count: i64 = second
            .query_row("SELECT COUNT(*) FROM agents", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn column_defaults_apply() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        conn.execute("INSERT INTO agents (id, name, role) VALUES ('a1', 'Scout', 'recon')", [])
            .unwrap();
        let (level, xp): (i64, i64) = conn
            .query_row("SELECT level, xp FROM agents WHERE id = 'a1'", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!((level, xp), (1, 0));

        conn.execute("INSERT INTO projects (id, name) VALUES ('p1', 'Alpha')", [])
            .unwrap();
        let (status, scale, created_at): (String, String, Option<String>) = conn
            .query_row("SELECT status, scale, created_at FROM projects", [], |r| {
                Ok((r.get(0)?, r.get(1)?, r.get(2)?))
            })
            .unwrap();
        assert_eq!(status, "setup");
        assert_eq!(scale, "STANDARD");
        assert!(created_at.is_some());
    }

    #[test]
    fn duplicate_primary_key_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let insert = "INSERT INTO agents (id, name, role) VALUES ('a1', 'Scout', 'recon')";
        conn.execute(insert, []).unwrap();
        let err = conn.execute(insert, []).unwrap_err();
        assert_eq!(
            err.sqlite_error_code(),
            Some(rusqlite::ErrorCode::ConstraintViolation)
        );
    }

    #[test]
    fn memory_foreign_key_is_declared_but_not_enforced() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let fk_target: String = conn
            .query_row("SELECT \"table\" FROM pragma_foreign_key_list('memory')", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(fk_target, "projects");

        conn.execute(
            "INSERT INTO memory (id, project_id, key) VALUES ('m1', 'no-such-project', 'k')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn open_fails_for_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = init_db(blocker.join("kracked.db")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
