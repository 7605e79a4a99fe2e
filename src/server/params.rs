//! Query-string parsing for `GET /fetch`.
//!
//! Booleans are true only for `"true"` or `"1"`. Numbers that do not parse
//! (or are negative or not finite) fall back to the default.

use std::collections::HashMap;

use crate::chunk::{DEFAULT_CHUNK_OVERLAP, DEFAULT_MAX_CHUNKS};
use crate::fetch::{FetchOptions, UserAgentMode};

/// Options for one `/fetch` request plus the optional chunking step.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
    pub options: FetchOptions,
    /// Chunking runs only when this is set to a non-zero size.
    pub chunk_size: Option<usize>,
    pub chunk_overlap: usize,
    pub max_chunks: usize,
}

impl RequestParams {
    pub fn from_query(query: &HashMap<String, String>, defaults: &FetchOptions) -> Self {
        let get = |key: &str| query.get(key).map(String::as_str);

        let user_agent_mode = get("userAgentMode")
            .filter(|v| !v.is_empty())
            .map(UserAgentMode::parse)
            .unwrap_or(defaults.user_agent_mode);
        let user_agent_family = get("userAgentFamily")
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| defaults.user_agent_family.clone());

        let options = FetchOptions {
            max_chars: parse_number(get("maxChars"), defaults.max_chars),
            user_agent_mode,
            user_agent_family,
            user_agent: defaults.user_agent.clone(),
            timeout_ms: parse_number(get("timeoutMs"), defaults.timeout_ms),
            attempt_timeout_ms: defaults.attempt_timeout_ms,
            max_bytes: parse_number(get("maxBytes"), defaults.max_bytes),
            allow_fallbacks: parse_bool(get("allowFallbacks"), defaults.allow_fallbacks),
            prefer_readability: parse_bool(get("preferReadability"), defaults.prefer_readability),
            redirect_limit: parse_number(get("redirectLimit"), defaults.redirect_limit),
            include_meta: parse_bool(get("includeMeta"), defaults.include_meta),
            debug: defaults.debug,
        };

        Self {
            options,
            chunk_size: Some(parse_number(get("chunkSize"), 0usize)).filter(|size| *size > 0),
            chunk_overlap: parse_number(get("chunkOverlap"), DEFAULT_CHUNK_OVERLAP),
            max_chunks: parse_number(get("maxChunks"), DEFAULT_MAX_CHUNKS),
        }
    }
}

pub fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value {
        Some(v) => v == "true" || v == "1",
        None => default,
    }
}

/// Parse a non-negative number, truncating any fraction (`"1e3"` is 1000).
pub fn parse_number<T: TryFrom<u64>>(value: Option<&str>, default: T) -> T {
    let Some(raw) = value else {
        return default;
    };
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 && n <= u64::MAX as f64 => {
            T::try_from(n as u64).unwrap_or(default)
        }
        _ => default,
    }
}
