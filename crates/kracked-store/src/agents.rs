//! Agent records: listing, lookup and XP awards.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{query_records, StoreError};

/// XP needed per level.
pub const XP_PER_LEVEL: i64 = 200;

/// One row of the `agents` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub role: String,
    pub level: i64,
    pub xp: i64,
}

impl Agent {
    /// Decodes `id, name, role, level, xp` without coercing column types.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            role: row.get(2)?,
            level: row.get(3)?,
            xp: row.get(4)?,
        })
    }
}

/// Result of [`award_xp`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XpAward {
    pub id: String,
    pub xp: i64,
    pub level: i64,
    pub added: i64,
}

/// Level reached with `xp` total experience.
pub fn level_for_xp(xp: i64) -> i64 {
    xp.div_euclid(XP_PER_LEVEL) + 1
}

/// Lists every stored agent in the engine's natural order.
///
/// Rows that fail to decode (e.g. text in `level`) are skipped.
pub fn list_agents(conn: &Connection) -> Result<Vec<Agent>, StoreError> {
    query_records(
        conn,
        "SELECT id, name, role, level, xp FROM agents",
        [],
        "agents",
        Agent::from_row,
    )
}

/// Looks up a single agent.
pub fn get_agent(conn: &Connection, id: &str) -> Result<Option<Agent>, StoreError> {
    let agent = conn
        .query_row(
            "SELECT id, name, role, level, xp FROM agents WHERE id = ?1",
            params![id],
            Agent::from_row,
        )
        .optional()?;
    Ok(agent)
}

/// Adds `amount` XP to an agent and recomputes its level.
///
/// Returns `None` when the agent does not exist.
pub fn award_xp(conn: &Connection, id: &str, amount: i64) -> Result<Option<XpAward>, StoreError> {
    let Some(agent) = get_agent(conn, id)? else {
        return Ok(None);
    };

    let xp = agent.xp.saturating_add(amount);
    let level = level_for_xp(xp);
    conn.execute(
        "UPDATE agents SET xp = ?1, level = ?2 WHERE id = ?3",
        params![xp, level, id],
    )?;
    info!("Awarded {} XP to agent {} (xp {}, level {})", amount, id, xp, level);

    Ok(Some(XpAward {
        id: agent.id,
        xp,
        level,
        added: amount,
    }))
}
