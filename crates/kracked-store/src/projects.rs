//! Project records.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{query_records, StoreError};

/// Scale used when a project is created without one.
pub const DEFAULT_SCALE: &str = "STANDARD";

/// One row of the `projects` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub status: String,
    pub scale: String,
    /// `YYYY-MM-DD HH:MM:SS` in UTC, set by the column default.
    pub created_at: String,
}

impl Project {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            status: row.get(2)?,
            scale: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

/// Lists projects, newest first.
pub fn list_projects(conn: &Connection) -> Result<Vec<Project>, StoreError> {
    query_records(
        conn,
        "SELECT id, name, status, scale, created_at FROM projects
         ORDER BY created_at DESC, rowid DESC",
        [],
        "projects",
        Project::from_row,
    )
}

/// Creates a project with a fresh id and returns the stored row.
pub fn create_project(
    conn: &Connection,
    name: &str,
    scale: Option<&str>,
) -> Result<Project, StoreError> {
    let id = Uuid::new_v4().to_string();
    let scale = scale.unwrap_or(DEFAULT_SCALE);
    let project = conn.query_row(
        "INSERT INTO projects (id, name, scale) VALUES (?1, ?2, ?3)
         RETURNING id, name, status, scale, created_at",
        params![id, name, scale],
        Project::from_row,
    )?;
    info!("Created project: {} ({})", project.name, project.id);
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::init_schema;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn create_applies_defaults() {
        let conn = conn();
        let project = create_project(&conn, "Alpha", None).unwrap();

        assert_eq!(project.name, "Alpha");
        assert_eq!(project.status, "setup");
        assert_eq!(project.scale, DEFAULT_SCALE);
        assert_eq!(project.created_at.len(), "2026-01-01 00:00:00".len());
        assert!(Uuid::parse_str(&project.id).is_ok());
    }

    #[test]
    fn list_is_newest_first() {
        let conn = conn();
        conn.execute_batch(
            "INSERT INTO projects (id, name, created_at) VALUES ('old', 'Old', '2024-01-01 00:00:00');
             INSERT INTO projects (id, name, created_at) VALUES ('new', 'New', '2025-01-01 00:00:00');",
        )
        .unwrap();
        let created = create_project(&conn, "Latest", Some("ENTERPRISE")).unwrap();

        let ids: Vec<String> = list_projects(&conn).unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![created.id, "new".to_string(), "old".to_string()]);
    }

    #[test]
    fn project_with_null_status_is_skipped() {
        let conn = conn();
        conn.execute(
            "INSERT INTO projects (id, name, status) VALUES ('p0', 'Broken', NULL)",
            [],
        )
        .unwrap();
        create_project(&conn, "Alpha", None).unwrap();

        let projects = list_projects(&conn).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Alpha");
    }
}
