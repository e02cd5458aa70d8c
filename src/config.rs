use anyhow::{Context, Result, anyhow};
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::auth::DEFAULT_TOKEN_TTL_SECS;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    /// Snapshot file for the activity store; memory only when unset.
    pub data_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like `from_env`, but fills gaps from an explicit env file. Variables
    /// already set in the process win over the file.
    pub fn from_env_file(path: &Path) -> Result<Self> {
        let file: HashMap<String, String> = dotenvy::from_path_iter(path)
            .with_context(|| format!("failed to open env file {}", path.display()))?
            .collect::<std::result::Result<_, _>>()
            .with_context(|| format!("failed to parse env file {}", path.display()))?;

        Self::from_lookup(|key| env::var(key).ok().or_else(|| file.get(key).cloned()))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("APP_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("APP_PORT must be a valid u16")?;

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| anyhow!("JWT_SECRET must be set to a non-empty value"))?;

        let token_ttl_secs = lookup("TOKEN_TTL_SECS")
            .map(|raw| raw.parse::<i64>())
            .transpose()
            .context("TOKEN_TTL_SECS must be a whole number of seconds")?
            .unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        if token_ttl_secs <= 0 {
            return Err(anyhow!("TOKEN_TTL_SECS must be positive"));
        }

        let data_file = lookup("DATA_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_ttl_secs,
            data_file,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
