//! Data transfer objects for HTTP message serialization.

use kracked_store::{Agent, MemoryEntry, Project};
use serde::{Deserialize, Serialize};

// === Health ===

/// Liveness report.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub db_connected: bool,
}

// === Agents ===

#[derive(Debug, Serialize)]
pub struct AgentsResponse {
    pub agents: Vec<Agent>,
}

/// Request to add XP to an agent.
#[derive(Debug, Deserialize)]
pub struct AwardXpRequest {
    #[serde(default)]
    pub amount: Option<i64>,
}

// === Projects ===

#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub projects: Vec<Project>,
}

/// Request to create a project.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub scale: Option<String>,
}

// === Memory ===

#[derive(Debug, Serialize)]
pub struct MemoriesResponse {
    pub memories: Vec<MemoryEntry>,
}

/// Request to store a memory entry.
#[derive(Debug, Deserialize)]
pub struct StoreMemoryRequest {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Response from storing a memory entry.
#[derive(Debug, Serialize)]
pub struct StoreMemoryResponse {
    pub id: String,
    pub key: String,
    #[serde(rename = "type")]
    pub kind: String,
}
