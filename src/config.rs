use std::str::FromStr;

use anyhow::{Context, Result};

// ---------------------------------------------------------------------------
// StorageBackend
// ---------------------------------------------------------------------------

/// Where readings are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres { database_url: String, max_connections: u32 },
    /// Process-local store; data is lost on restart.
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackendKind {
    Postgres,
    Memory,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(anyhow::anyhow!("unknown storage backend: {other:?}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: StorageBackend,
    pub server_host: String,
    pub server_port: u16,
    /// Origins allowed by CORS. Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let kind = optional("STORAGE_BACKEND", "postgres")
            .parse::<BackendKind>()
            .context("STORAGE_BACKEND must be 'postgres' or 'memory'")?;

        let storage = match kind {
            BackendKind::Postgres => StorageBackend::Postgres {
                database_url: required("DATABASE_URL")?,
                max_connections: optional("DATABASE_MAX_CONNECTIONS", "10")
                    .parse()
                    .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            },
            BackendKind::Memory => StorageBackend::Memory,
        };

        Ok(Self {
            storage,
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "8000")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            cors_allowed_origins: parse_origins(&optional("CORS_ALLOWED_ORIGINS", "")),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Parse `"https://a.example,https://b.example"` into a list of origins.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("missing required env var: {key}"))
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
