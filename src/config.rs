use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Environment variable naming an optional YAML config file.
pub const CONFIG_ENV: &str = "WEBWORKER_CONFIG";

/// Runtime settings shared (read-only) by every worker.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the listener binds to
    pub listen_addr: String,
    /// Directory every resolved path is relative to
    pub content_root: PathBuf,
    /// Served for empty and directory-style paths
    pub default_document: String,
    /// Served (with 404) when the requested file does not exist
    pub fallback_document: String,
    /// Used for the `Server:` header and the `<cs371server>` token
    pub server_name: String,
    /// Body streaming chunk size in bytes
    pub chunk_size: usize,
    /// Bound on waiting for request lines; unbounded when unset
    pub read_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            content_root: PathBuf::from("."),
            default_document: "home.html".to_string(),
            fallback_document: "404.html".to_string(),
            server_name: concat!("webworker/", env!("CARGO_PKG_VERSION")).to_string(),
            chunk_size: 64 * 1024,
            read_timeout_secs: None,
        }
    }
}

impl Config {
    /// Loads the config file named by `WEBWORKER_CONFIG` (or defaults), then
    /// applies `LISTEN` and `CONTENT_ROOT` from the environment.
    pub fn load() -> anyhow::Result<Self> {
        let base = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        Ok(base.with_overrides(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(raw)?;
        Ok(cfg.normalized())
    }

    /// Applies overrides looked up by variable name.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(addr) = lookup("LISTEN") {
            self.listen_addr = addr;
        }
        if let Some(root) = lookup("CONTENT_ROOT") {
            self.content_root = PathBuf::from(root);
        }
        self.normalized()
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }

    fn normalized(mut self) -> Self {
        self.chunk_size = self.chunk_size.max(1);
        self
    }
}
