use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Placeholder session secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me", "dev-secret-change-me", "hello"];

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub session_secret: String,
}

impl Config {
    /// Read configuration from the environment. Call after `dotenvy::dotenv()`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Just the database location; `initdb` needs nothing else.
    pub fn db_path_from_env() -> PathBuf {
        db_path(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = db_path(&lookup);
        let host = lookup("QUILL_HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = match lookup("QUILL_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("QUILL_PORT is not a valid port: {raw}"))?,
            None => 3000,
        };

        let session_secret = lookup("QUILL_SESSION_SECRET").unwrap_or_default();
        if session_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&session_secret.as_str()) {
            bail!("QUILL_SESSION_SECRET is unset or still a placeholder");
        }

        Ok(Self {
            db_path,
            host,
            port,
            session_secret,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .with_context(|| format!("invalid listen address {addr}"))
    }
}

fn db_path(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    lookup("QUILL_DB_PATH")
        .unwrap_or_else(|| "quill.db".into())
        .into()
}
