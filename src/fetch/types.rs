//! Shared types for the fetch pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::extract::ExtractionMethod;

/// How the request identity string is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserAgentMode {
    /// Always send the configured fixed identity.
    Fixed,
    /// Pick from a pool by hashing the target URL.
    #[default]
    Url,
}

impl UserAgentMode {
    /// Parse a mode name. Only `"fixed"` selects [`UserAgentMode::Fixed`].
    pub fn parse(value: &str) -> Self {
        if value == "fixed" {
            UserAgentMode::Fixed
        } else {
            UserAgentMode::Url
        }
    }
}

/// Options for a single orchestrated fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    pub max_chars: usize,
    pub user_agent_mode: UserAgentMode,
    pub user_agent_family: String,
    pub user_agent: String,
    /// Deadline for the whole orchestration.
    pub timeout_ms: u64,
    /// Bound on each attempt; expiry moves on to the next candidate.
    pub attempt_timeout_ms: Option<u64>,
    pub max_bytes: usize,
    pub allow_fallbacks: bool,
    pub prefer_readability: bool,
    pub redirect_limit: usize,
    pub include_meta: bool,
    pub debug: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        crate::config::FetchConfig::default().to_options()
    }
}

/// Which URL an attempt goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// The caller's URL, unchanged.
    Direct,
    /// A mirror URL built from the caller's URL.
    Proxy,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Direct => "direct",
            Channel::Proxy => "proxy",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One way of attempting a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Strategy {
    pub channel: Channel,
    pub prefer_extraction: bool,
}

impl Strategy {
    pub const fn new(channel: Channel, prefer_extraction: bool) -> Self {
        Self {
            channel,
            prefer_extraction,
        }
    }
}

/// The four strategies in default precedence order. This set is closed:
/// the cache only ever stores one of these.
pub const DEFAULT_STRATEGIES: [Strategy; 4] = [
    Strategy::new(Channel::Direct, true),
    Strategy::new(Channel::Direct, false),
    Strategy::new(Channel::Proxy, true),
    Strategy::new(Channel::Proxy, false),
];

/// Successful result of an orchestrated fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchOutcome {
    pub text: String,
    pub title: String,
    pub byline: String,
    pub excerpt: String,
    pub method: ExtractionMethod,
    pub via: Channel,
}

impl FetchOutcome {
    /// Metadata block returned next to the text when `includeMeta` is set.
    pub fn meta(&self) -> FetchMeta {
        FetchMeta {
            title: self.title.clone(),
            byline: self.byline.clone(),
            excerpt: self.excerpt.clone(),
            method: self.method,
            via: self.via,
        }
    }
}

/// Page metadata returned alongside the text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchMeta {
    pub title: String,
    pub byline: String,
    pub excerpt: String,
    pub method: ExtractionMethod,
    pub via: Channel,
}
