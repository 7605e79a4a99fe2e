//! Host filter for outbound fetches.
//!
//! Rejects URLs whose host is `localhost`, a `.localhost`/`.local` name, or a
//! literal IP inside a private, loopback, or link-local block. Hostnames that
//! are not literal IPs pass unless [`resolve_and_check_host`] is used, which
//! checks what the name resolves to at validation time. A name that resolves
//! differently at connect time (DNS rebinding) is not caught by either check.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use reqwest::Url;
use tokio::net::lookup_host;
use tracing::debug;

use crate::config::SecurityConfig;
use crate::error::{FetchError, Result};

/// Returns `true` when `hostname` must not be fetched.
///
/// Always `false` when `allow_private` is set. Accepts bracketed IPv6 hosts
/// as produced by `Url::host_str()` (e.g. `[::1]`).
pub fn is_blocked_host(hostname: &str, allow_private: bool) -> bool {
    if allow_private {
        return false;
    }

    let host = hostname.to_ascii_lowercase();
    if host == "localhost" || host.ends_with(".localhost") || host.ends_with(".local") {
        return true;
    }

    let ip_str = host
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(&host);
    match ip_str.parse::<IpAddr>() {
        Ok(ip) => is_blocked_ip(ip),
        Err(_) => false,
    }
}

/// Returns `true` for addresses in the blocked ranges.
pub fn is_blocked_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(addr) => is_blocked_ipv4(addr),
        IpAddr::V6(addr) => is_blocked_ipv6(addr),
    }
}

// 10/8, 172.16/12, 192.168/16, 169.254/16, 127/8
fn is_blocked_ipv4(addr: Ipv4Addr) -> bool {
    addr.is_private() || addr.is_loopback() || addr.is_link_local()
}

// fc00::/7, fe80::/10, ::1, and IPv4-mapped forms of the IPv4 blocks
fn is_blocked_ipv6(addr: Ipv6Addr) -> bool {
    if let Some(v4) = addr.to_ipv4_mapped() {
        return is_blocked_ipv4(v4);
    }
    let first = addr.segments()[0];

    addr.is_loopback() || (first & 0xfe00) == 0xfc00 || (first & 0xffc0) == 0xfe80
}

/// Parse `input` and require an http or https scheme.
pub fn normalize_target_url(input: &str) -> Result<Url> {
    let parsed = Url::parse(input).map_err(|_| FetchError::InvalidUrl("Invalid url".into()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(FetchError::UnsupportedScheme),
    }
}

/// Full pre-flight check for a caller-supplied target.
///
/// Order matters for the error the caller sees: presence, length, parse,
/// scheme, then host.
pub fn validate_target_url(raw: &str, policy: &SecurityConfig) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FetchError::InvalidUrl("Missing url parameter".into()));
    }
    if raw.chars().count() > policy.max_url_length {
        return Err(FetchError::InvalidUrl("URL too long".into()));
    }

    let parsed = normalize_target_url(raw)?;
    let host = parsed
        .host_str()
        .ok_or_else(|| FetchError::InvalidUrl("Invalid url".into()))?;
    if is_blocked_host(host, policy.allow_private) {
        debug!(host, "Rejected blocked target host");
        return Err(FetchError::BlockedHost);
    }

    Ok(parsed)
}

/// Resolve a URL's hostname via DNS and reject it when any resolved address
/// is in a blocked range.
///
/// IP literals are skipped since [`is_blocked_host`] already covers them.
pub async fn resolve_and_check_host(url: &Url, allow_private: bool) -> Result<()> {
    if allow_private {
        return Ok(());
    }

    let host = url
        .host_str()
        .ok_or_else(|| FetchError::InvalidUrl("Invalid url".into()))?;
    let bare = host
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(host);
    if bare.parse::<IpAddr>().is_ok() {
        return Ok(());
    }

    let port = url.port_or_known_default().unwrap_or(443);
    let addrs = lookup_host((bare, port))
        .await
        .map_err(|e| FetchError::Network(format!("DNS lookup failed for '{}': {}", host, e)))?;

    for addr in addrs {
        if is_blocked_ip(addr.ip()) {
            debug!(host, ip = %addr.ip(), "Target resolved to a blocked address");
            return Err(FetchError::BlockedHost);
        }
    }

    Ok(())
}
