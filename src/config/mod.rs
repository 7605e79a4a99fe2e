//! Configuration management for pagefetch
//!
//! Configuration is loaded from `~/.pagefetch/config.json` with environment
//! variable overrides. CLI flags and `/fetch` query parameters are applied on
//! top by their callers.

mod types;
pub mod validate;

pub use types::*;

use crate::error::Result;
use std::path::{Path, PathBuf};

impl Config {
    /// Returns the pagefetch configuration directory path (~/.pagefetch)
    pub fn dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".pagefetch")
    }

    /// Returns the path to the config file (~/.pagefetch/config.json)
    pub fn path() -> PathBuf {
        Self::dir().join("config.json")
    }

    /// Load configuration from the default path with environment overrides.
    ///
    /// If the config file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::path())
    }

    /// Load configuration from a specific path with environment overrides.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply `FETCH_*` environment variable overrides.
    ///
    /// Unparsable numeric values are ignored and the configured value kept.
    fn apply_env_overrides(&mut self) {
        // Fetch defaults
        if let Some(v) = env_parse("FETCH_MAX_CHARS") {
            self.fetch.max_chars = v;
        }
        if let Ok(val) = std::env::var("FETCH_UA_MODE") {
            self.fetch.user_agent_mode = val;
        }
        if let Ok(val) = std::env::var("FETCH_UA_FAMILY") {
            self.fetch.user_agent_family = val;
        }
        if let Ok(val) = std::env::var("FETCH_USER_AGENT") {
            self.fetch.user_agent = val;
        }
        if let Some(v) = env_parse("FETCH_TIMEOUT_MS") {
            self.fetch.timeout_ms = v;
        }
        if let Some(v) = env_parse("FETCH_ATTEMPT_TIMEOUT_MS") {
            self.fetch.attempt_timeout_ms = Some(v);
        }
        if let Some(v) = env_parse("FETCH_MAX_BYTES") {
            self.fetch.max_bytes = v;
        }
        if let Ok(val) = std::env::var("FETCH_ALLOW_FALLBACKS") {
            self.fetch.allow_fallbacks = val != "false";
        }
        if let Ok(val) = std::env::var("FETCH_PREFER_READABILITY") {
            self.fetch.prefer_readability = val != "false";
        }
        if let Some(v) = env_parse("FETCH_REDIRECT_LIMIT") {
            self.fetch.redirect_limit = v;
        }
        if let Ok(val) = std::env::var("FETCH_DEBUG") {
            self.fetch.debug = val == "true";
        }
        if let Ok(val) = std::env::var("FETCH_MIRROR_PREFIX") {
            self.fetch.mirror_prefix = val;
        }

        // Server
        if let Ok(val) = std::env::var("FETCH_SERVICE_HOST") {
            self.server.host = val;
        }
        if let Some(v) = env_parse("FETCH_SERVICE_PORT") {
            self.server.port = v;
        }

        // Security
        if let Ok(val) = std::env::var("FETCH_ALLOW_PRIVATE") {
            self.security.allow_private = val == "true";
        }
        if let Some(v) = env_parse("FETCH_MAX_URL_LENGTH") {
            self.security.max_url_length = v;
        }
        if let Ok(val) = std::env::var("FETCH_VERIFY_DNS") {
            self.security.verify_dns = val == "true";
        }

        // Cache
        if let Some(v) = env_parse("FETCH_CACHE_CAPACITY") {
            self.cache.capacity = v;
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::path())
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
