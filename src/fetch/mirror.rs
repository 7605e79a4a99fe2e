//! Mirror URL construction for the proxy channel.

use reqwest::Url;

/// Public fetch-relay used when no other prefix is configured.
pub const DEFAULT_MIRROR_PREFIX: &str = "https://r.jina.ai/";

/// Builds the proxy-channel candidates for a target URL.
///
/// Implementations return URLs in the order they should be tried. Returning
/// an empty list disables the proxy channel for that target.
pub trait MirrorBuilder: Send + Sync {
    fn mirror_urls(&self, target: &Url) -> Vec<String>;
}

/// Prefix-rewriting relay: `<prefix>http://<host><path><query>` followed by
/// `<prefix>https://<host><path><query>`.
#[derive(Debug, Clone)]
pub struct RelayMirror {
    prefix: String,
}

impl RelayMirror {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for RelayMirror {
    fn default() -> Self {
        Self::new(DEFAULT_MIRROR_PREFIX)
    }
}

impl MirrorBuilder for RelayMirror {
    fn mirror_urls(&self, target: &Url) -> Vec<String> {
        let Some(host) = target.host_str() else {
            return Vec::new();
        };

        let mut host_and_path = host.to_string();
        if let Some(port) = target.port() {
            host_and_path.push_str(&format!(":{}", port));
        }
        host_and_path.push_str(target.path());
        if let Some(query) = target.query().filter(|q| !q.is_empty()) {
            host_and_path.push('?');
            host_and_path.push_str(query);
        }

        ["http", "https"]
            .iter()
            .map(|scheme| format!("{}{}://{}", self.prefix, scheme, host_and_path))
            .collect()
    }
}
