//! Project memory entries.
//!
//! `project_id` is a soft reference: entries may point at a project that does
//! not exist, or at none at all.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{query_records, StoreError};

/// Memory type used when none is given.
pub const DEFAULT_MEMORY_TYPE: &str = "local";

/// One row of the `memory` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub id: String,
    pub project_id: Option<String>,
    pub key: String,
    pub value: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

impl MemoryEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            project_id: row.get(1)?,
            key: row.get(2)?,
            value: row.get(3)?,
            kind: row.get(4)?,
        })
    }
}

/// A memory entry to be stored.
#[derive(Debug, Clone, Default)]
pub struct NewMemory {
    pub project_id: Option<String>,
    pub key: String,
    pub value: Option<String>,
    pub kind: Option<String>,
}

/// Lists the memory entries attached to `project_id`.
pub fn list_memory(conn: &Connection, project_id: &str) -> Result<Vec<MemoryEntry>, StoreError> {
    query_records(
        conn,
        "SELECT id, project_id, key, value, type FROM memory WHERE project_id = ?1",
        params![project_id],
        "memory",
        MemoryEntry::from_row,
    )
}

/// Stores a memory entry under a fresh id.
///
/// A missing value is stored as the empty string.
pub fn store_memory(conn: &Connection, entry: NewMemory) -> Result<MemoryEntry, StoreError> {
    let stored = MemoryEntry {
        id: Uuid::new_v4().to_string(),
        project_id: entry.project_id,
        key: entry.key,
        value: Some(entry.value.unwrap_or_default()),
        kind: entry.kind.unwrap_or_else(|| DEFAULT_MEMORY_TYPE.to_string()),
    };
    conn.execute(
        "INSERT INTO memory (id, project_id, key, value, type) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![stored.id, stored.project_id, stored.key, stored.value, stored.kind],
    )?;
    info!("Stored memory '{}' ({})", stored.key, stored.id);
    Ok(stored)
}
