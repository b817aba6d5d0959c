use std::path::PathBuf;

use anyhow::{Result, bail};

/// Where the credential table is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Memory,
    File(PathBuf),
    Sqlite(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend: Backend,
    pub dark_mode: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let kind = lookup("PROCHAT_STORE").unwrap_or_else(|| "file".into());
        let path = lookup("PROCHAT_STORE_PATH").map(PathBuf::from);

        let backend = match kind.to_ascii_lowercase().as_str() {
            "memory" => Backend::Memory,
            "file" => Backend::File(path.unwrap_or_else(|| "prochat-store.json".into())),
            "sqlite" => Backend::Sqlite(path.unwrap_or_else(|| "prochat.db".into())),
            other => bail!("PROCHAT_STORE must be memory, file or sqlite (got {:?})", other),
        };

        let dark_mode = match lookup("PROCHAT_DARK_MODE") {
            None => false,
            Some(v) => parse_bool(&v)
                .ok_or_else(|| anyhow::anyhow!("PROCHAT_DARK_MODE is not a boolean: {:?}", v))?,
        };

        Ok(Self { backend, dark_mode })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
