//! SQLite persistence for the Kracked_Skills agent backend.
//!
//! This crate owns the on-disk contract shared by every endpoint:
//!
//! - [`schema`]: idempotent bootstrap of the `agents`, `projects` and `memory` tables
//! - [`agents`]: agent listing, lookup and XP awards
//! - [`projects`]: project listing and creation
//! - [`memory`]: per-project memory entries
//! - [`roster`]: loading the seed roster from `.kracked/` and syncing it into `agents`
//!
//! All functions take a borrowed [`rusqlite::Connection`]; the caller decides
//! how the handle is shared.
//!
//! # Example
//!
//! ```rust
//! use kracked_store::{agents, schema};
//!
//! let conn = rusqlite::Connection::open_in_memory()?;
//! schema::init_schema(&conn)?;
//! assert!(agents::list_agents(&conn)?.is_empty());
//! # Ok::<(), kracked_store::StoreError>(())
//! ```

pub mod agents;
pub mod memory;
pub mod projects;
pub mod roster;
pub mod schema;

use rusqlite::{Connection, Params, Row};
use tracing::warn;

pub use agents::{Agent, XpAward};
pub use memory::{MemoryEntry, NewMemory};
pub use projects::Project;
pub use roster::RosterSync;

/// Errors returned by the store.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The database engine rejected a statement or could not be reached.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to prepare the directory holding the database file.
    #[error("failed to prepare database location '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Creates an IO error with path context.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Runs a read query and decodes every row with `decode`.
///
/// Failing to execute the statement or to step the cursor is an error for the
/// whole call. A row that does not decode is logged and dropped.
pub(crate) fn query_records<T, P, F>(
    conn: &Connection,
    sql: &str,
    params: P,
    table: &str,
    decode: F,
) -> Result<Vec<T>, StoreError>
where
    P: Params,
    F: Fn(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;

    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        match decode(row) {
            Ok(record) => records.push(record),
            Err(e) => {
                let id = row.get::<_, String>(0).ok();
                warn!(table, id = ?id, "Skipping row that failed to decode: {}", e);
            }
        }
    }
    Ok(records)
}
