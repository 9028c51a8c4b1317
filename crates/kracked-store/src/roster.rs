//! Seed roster: one master agent plus the professional agents.
//!
//! Names come from the workspace's `.kracked/` configuration written by the
//! installer. Existing progress (level/xp) is never overwritten once an agent
//! has been seeded.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rusqlite::{params, Connection};
use serde_json::Value;
use tracing::{info, warn};

use crate::{Agent, StoreError};

/// Id of the master agent.
pub const MAIN_AGENT_ID: &str = "main-agent";

const MAIN_AGENT_ROLE: &str = "Master Agent";
const MAIN_AGENT_NAME: &str = "Amad";
const MAIN_AGENT_LEVEL: i64 = 5;
const MAIN_AGENT_XP: i64 = 1240;

/// A professional seat in the roster: role key, label, starting level and XP.
struct ProfessionalRole {
    key: &'static str,
    label: &'static str,
    level: i64,
    xp: i64,
}

const PROFESSIONAL_ROLES: &[ProfessionalRole] = &[
    ProfessionalRole { key: "analyst", label: "Analyst", level: 3, xp: 620 },
    ProfessionalRole { key: "pm", label: "Product Manager", level: 3, xp: 580 },
    ProfessionalRole { key: "architect", label: "Architect", level: 4, xp: 900 },
    ProfessionalRole { key: "tech-lead", label: "Tech Lead", level: 3, xp: 710 },
    ProfessionalRole { key: "engineer", label: "Engineer", level: 4, xp: 1050 },
    ProfessionalRole { key: "qa", label: "QA", level: 2, xp: 340 },
    ProfessionalRole { key: "security", label: "Security", level: 3, xp: 490 },
    ProfessionalRole { key: "devops", label: "DevOps", level: 2, xp: 280 },
    ProfessionalRole { key: "release-manager", label: "Release Manager", level: 2, xp: 220 },
];

/// Ids seeded by earlier releases. A table holding only these is reseeded.
const LEGACY_DEFAULT_IDS: &[&str] = &[
    "amad-001", "ara-001", "paan-001", "adi-001", "teja-001",
    "ezra-001", "qila-001", "sari-001", "dian-001", "rina-001",
];

/// Outcome of [`sync_roster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RosterSync {
    /// The table was empty or legacy-only and was replaced wholesale.
    pub replaced: bool,
    pub updated: usize,
    pub inserted: usize,
}

/// Reads a JSON file, treating a missing or malformed file as absent.
///
/// Fields are picked out one by one afterwards, so a wrongly typed field only
/// loses that field.
fn read_json(path: &Path) -> Value {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Value::Null,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return Value::Null;
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!("Failed to parse {}: {}", path.display(), e);
        Value::Null
    })
}

/// A trimmed, non-empty string field.
fn text_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// An integer field; whole floats such as `7.0` count.
fn int_field(value: &Value, key: &str) -> Option<i64> {
    let field = value.get(key)?;
    field.as_i64().or_else(|| {
        field
            .as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// Builds the seed roster from the `.kracked/` directory under `root`.
pub fn load_roster(root: &Path) -> Vec<Agent> {
    let kracked = root.join(".kracked");
    let main = read_json(&kracked.join("config/main-agent.json"));
    let agents = read_json(&kracked.join("config/agents.json"));
    let xp = read_json(&kracked.join("security/xp.json"));
    let by_role = agents.get("byRole").cloned().unwrap_or(Value::Null);

    let mut roster = Vec::with_capacity(PROFESSIONAL_ROLES.len() + 1);
    roster.push(Agent {
        id: MAIN_AGENT_ID.to_string(),
        name: text_field(&main, "name").unwrap_or_else(|| MAIN_AGENT_NAME.to_string()),
        role: MAIN_AGENT_ROLE.to_string(),
        level: int_field(&xp, "level").unwrap_or(MAIN_AGENT_LEVEL),
        xp: int_field(&xp, "xp").unwrap_or(MAIN_AGENT_XP),
    });

    roster.extend(PROFESSIONAL_ROLES.iter().map(|role| Agent {
        id: format!("{}-agent", role.key),
        name: text_field(&by_role, role.key).unwrap_or_else(|| role.label.to_string()),
        role: role.label.to_string(),
        level: role.level,
        xp: role.xp,
    }));

    roster
}

/// Writes the roster into `agents` in a single transaction.
pub fn sync_roster(conn: &Connection, roster: &[Agent]) -> Result<RosterSync, StoreError> {
    let tx = conn.unchecked_transaction()?;

    let existing: HashSet<String> = {
        let mut stmt = tx.prepare("SELECT id FROM agents")?;
        let ids = stmt.query_map([], |row| row.get::<_, String>(0))?;
        ids.collect::<Result<_, _>>()?
    };
    let legacy_only = !existing.is_empty()
        && existing.iter().all(|id| LEGACY_DEFAULT_IDS.contains(&id.as_str()));

    let mut outcome = RosterSync::default();
    {
        let mut insert = tx.prepare(
            "INSERT INTO agents (id, name, role, level, xp) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;

        if existing.is_empty() || legacy_only {
            tx.execute("DELETE FROM agents", [])?;
            for agent in roster {
                insert.execute(params![agent.id, agent.name, agent.role, agent.level, agent.xp])?;
            }
            outcome.replaced = true;
            outcome.inserted = roster.len();
        } else {
            let mut update = tx.prepare("UPDATE agents SET name = ?1, role = ?2 WHERE id = ?3")?;
            for agent in roster {
                if existing.contains(&agent.id) {
                    update.execute(params![agent.name, agent.role, agent.id])?;
                    outcome.updated += 1;
                } else {
                    insert.execute(params![agent.id, agent.name, agent.role, agent.level, agent.xp])?;
                    outcome.inserted += 1;
                }
            }
        }
    }

    tx.commit()?;
    if outcome.replaced {
        info!("Seeded {} agents", outcome.inserted);
    } else {
        info!(
            "Synced roster: {} updated, {} inserted",
            outcome.updated, outcome.inserted
        );
    }
    Ok(outcome)
}
