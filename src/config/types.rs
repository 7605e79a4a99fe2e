//! Configuration type definitions for pagefetch
//!
//! All types implement serde traits for JSON serialization and have sensible
//! defaults, so a partial config file only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::fetch::{FetchOptions, UserAgentMode};

/// Main configuration struct for pagefetch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-fetch option defaults
    pub fetch: FetchConfig,
    /// HTTP shell bind address
    pub server: ServerConfig,
    /// Target validation policy
    pub security: SecurityConfig,
    /// Strategy cache sizing
    pub cache: CacheConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

// ============================================================================
// Fetch Configuration
// ============================================================================

/// Default orchestration options. Query parameters and CLI flags start from
/// these values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Maximum characters of extracted text.
    pub max_chars: usize,
    /// `"url"` (hash the target into a pool) or `"fixed"`.
    pub user_agent_mode: String,
    /// Pool name: desktop, mobile, tablet.
    pub user_agent_family: String,
    /// Identity used in fixed mode.
    pub user_agent: String,
    /// Deadline for the whole orchestration.
    pub timeout_ms: u64,
    /// Optional bound on each single attempt.
    pub attempt_timeout_ms: Option<u64>,
    /// Hard cap on response body bytes.
    pub max_bytes: usize,
    /// Try mirror URLs when direct fetches fail.
    pub allow_fallbacks: bool,
    /// Run the readability pass before the raw-body fallback.
    pub prefer_readability: bool,
    /// Maximum redirects followed per request.
    pub redirect_limit: usize,
    /// Include title/byline/excerpt/method/via in responses.
    pub include_meta: bool,
    /// Log attempt-level failures.
    pub debug: bool,
    /// Prefix of the fetch-relay service used for mirror URLs.
    pub mirror_prefix: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_chars: 15_000,
            user_agent_mode: "url".to_string(),
            user_agent_family: "desktop".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            timeout_ms: 15_000,
            attempt_timeout_ms: None,
            max_bytes: 2_000_000,
            allow_fallbacks: true,
            prefer_readability: true,
            redirect_limit: 3,
            include_meta: false,
            debug: false,
            mirror_prefix: crate::fetch::DEFAULT_MIRROR_PREFIX.to_string(),
        }
    }
}

impl FetchConfig {
    /// Build the per-request option set these defaults describe.
    pub fn to_options(&self) -> FetchOptions {
        FetchOptions {
            max_chars: self.max_chars,
            user_agent_mode: UserAgentMode::parse(&self.user_agent_mode),
            user_agent_family: self.user_agent_family.clone(),
            user_agent: self.user_agent.clone(),
            timeout_ms: self.timeout_ms,
            attempt_timeout_ms: self.attempt_timeout_ms,
            max_bytes: self.max_bytes,
            allow_fallbacks: self.allow_fallbacks,
            prefer_readability: self.prefer_readability,
            redirect_limit: self.redirect_limit,
            include_meta: self.include_meta,
            debug: self.debug,
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// HTTP shell configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8787,
        }
    }
}

// ============================================================================
// Security Configuration
// ============================================================================

/// Target validation policy applied before any network call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Skip the private/loopback/link-local host filter entirely.
    pub allow_private: bool,
    /// Longest accepted target URL, in characters.
    pub max_url_length: usize,
    /// Resolve hostnames and reject those pointing at blocked addresses.
    pub verify_dns: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allow_private: false,
            max_url_length: 2048,
            verify_dns: false,
        }
    }
}

// ============================================================================
// Cache Configuration
// ============================================================================

/// Strategy cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of hosts remembered before LRU eviction.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output
    Pretty,
    /// Compact single-line output with component tags
    #[default]
    Component,
    /// JSON lines for log aggregators
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Append logs to this file instead of stderr.
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Component,
            level: "info".to_string(),
            file: None,
        }
    }
}
