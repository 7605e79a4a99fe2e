//! Configuration validation with unknown field detection.

use serde_json::Value;
use std::collections::HashSet;

/// Known top-level config field names.
const KNOWN_TOP_LEVEL: &[&str] = &["fetch", "server", "security", "cache", "logging"];

/// Known fields for each section.
const KNOWN_FETCH: &[&str] = &[
    "max_chars",
    "user_agent_mode",
    "user_agent_family",
    "user_agent",
    "timeout_ms",
    "attempt_timeout_ms",
    "max_bytes",
    "allow_fallbacks",
    "prefer_readability",
    "redirect_limit",
    "include_meta",
    "debug",
    "mirror_prefix",
];
const KNOWN_SERVER: &[&str] = &["host", "port"];
const KNOWN_SECURITY: &[&str] = &["allow_private", "max_url_length", "verify_dns"];
const KNOWN_CACHE: &[&str] = &["capacity"];
const KNOWN_LOGGING: &[&str] = &["format", "level", "file"];

/// A validation diagnostic.
#[derive(Debug)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub path: String,
    pub message: String,
}

#[derive(Debug, PartialEq)]
pub enum DiagnosticLevel {
    Ok,
    Warn,
    Error,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.level {
            DiagnosticLevel::Ok => "[OK]",
            DiagnosticLevel::Warn => "[WARN]",
            DiagnosticLevel::Error => "[ERROR]",
        };
        if self.path.is_empty() {
            write!(f, "{} {}", prefix, self.message)
        } else {
            write!(f, "{} {}: {}", prefix, self.path, self.message)
        }
    }
}

/// Simple Levenshtein distance for "did you mean?" suggestions.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut matrix = vec![vec![0usize; b.len() + 1]; a.len() + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, val) in matrix[0].iter_mut().enumerate() {
        *val = j;
    }

    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            matrix[i + 1][j + 1] = std::cmp::min(
                std::cmp::min(matrix[i][j + 1] + 1, matrix[i + 1][j] + 1),
                matrix[i][j] + cost,
            );
        }
    }
    matrix[a.len()][b.len()]
}

/// Suggest the closest known field name (if distance <= 3).
pub fn suggest_field(unknown: &str, known: &[&str]) -> Option<String> {
    known
        .iter()
        .map(|k| (k, levenshtein(unknown, k)))
        .filter(|(_, d)| *d <= 3)
        .min_by_key(|(_, d)| *d)
        .map(|(k, _)| format!("did you mean '{}'?", k))
}

fn check_keys(
    obj: &serde_json::Map<String, Value>,
    known: &[&str],
    prefix: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    let known_set: HashSet<&str> = known.iter().copied().collect();
    let mut has_unknown = false;
    for key in obj.keys() {
        if known_set.contains(key.as_str()) {
            continue;
        }
        has_unknown = true;
        let msg = match suggest_field(key, known) {
            Some(suggestion) => format!("Unknown field '{}', {}", key, suggestion),
            None => format!("Unknown field '{}'", key),
        };
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Error,
            path,
            message: msg,
        });
    }
    has_unknown
}

/// Validate a raw JSON config value against known field names.
pub fn validate_config(raw: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let obj = match raw.as_object() {
        Some(o) => o,
        None => {
            diagnostics.push(Diagnostic {
                level: DiagnosticLevel::Error,
                path: String::new(),
                message: "Config must be a JSON object".to_string(),
            });
            return diagnostics;
        }
    };

    diagnostics.push(Diagnostic {
        level: DiagnosticLevel::Ok,
        path: String::new(),
        message: "Valid JSON".to_string(),
    });

    let mut has_unknown = check_keys(obj, KNOWN_TOP_LEVEL, "", &mut diagnostics);

    let sections: [(&str, &[&str]); 5] = [
        ("fetch", KNOWN_FETCH),
        ("server", KNOWN_SERVER),
        ("security", KNOWN_SECURITY),
        ("cache", KNOWN_CACHE),
        ("logging", KNOWN_LOGGING),
    ];
    for (section, known) in sections {
        if let Some(section_obj) = obj.get(section).and_then(|v| v.as_object()) {
            has_unknown |= check_keys(section_obj, known, section, &mut diagnostics);
        }
    }

    if !has_unknown {
        diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Ok,
            path: String::new(),
            message: "All fields recognized".to_string(),
        });
    }

    // Security warnings
    let allow_private = obj
        .get("security")
        .and_then(|s| s.get("allow_private"))
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if allow_private {
        diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Warn,
            path: "security.allow_private".to_string(),
            message: "Enabled, private and loopback targets can be fetched".to_string(),
        });
    }

    let capacity = obj
        .get("cache")
        .and_then(|c| c.get("capacity"))
        .and_then(|v| v.as_u64());
    if capacity == Some(0) {
        diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Warn,
            path: "cache.capacity".to_string(),
            message: "Zero disables strategy memory".to_string(),
        });
    }

    diagnostics
}
