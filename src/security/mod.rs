//! Security module for pagefetch
//!
//! Target validation that runs before any outbound request: scheme checks
//! and the private/loopback/link-local host filter that keeps
//! attacker-supplied URLs away from internal services.

pub mod host;

pub use host::{
    is_blocked_host, is_blocked_ip, normalize_target_url, resolve_and_check_host,
    validate_target_url,
};
