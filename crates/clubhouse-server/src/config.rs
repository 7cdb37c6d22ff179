use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("CLUBHOUSE_PORT") {
            Some(raw) => raw.parse().with_context(|| format!("CLUBHOUSE_PORT is not a port: {raw}"))?,
            None => 8000,
        };
        let max_upload_bytes = match get("CLUBHOUSE_MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("CLUBHOUSE_MAX_UPLOAD_BYTES is not a number: {raw}"))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            host: get("CLUBHOUSE_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: get("CLUBHOUSE_DB_PATH").unwrap_or_else(|| "clubhouse.db".into()).into(),
            max_upload_bytes,
        })
    }
}
