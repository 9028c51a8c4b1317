//! Server configuration from environment variables.
//!
//! `.env` is loaded by `main` before this runs, so values there count as
//! environment.

use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_PORT: u16 = 4891;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_DATABASE_URL: &str = "kracked.db";
const DEFAULT_KRACKED_ROOT: &str = "..";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path of the SQLite file.
    pub database_url: String,
    /// Workspace whose `.kracked/` directory provides the seed roster.
    pub kracked_root: PathBuf,
    pub seed_agents: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid PORT value '{}'", raw))?,
            None => DEFAULT_PORT,
        };

        let seed_agents = var("SEED_AGENTS")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            kracked_root: var("KRACKED_ROOT")
                .unwrap_or_else(|| DEFAULT_KRACKED_ROOT.into())
                .into(),
            seed_agents,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
