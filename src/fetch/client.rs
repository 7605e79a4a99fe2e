//! Bounded HTTP fetch.
//!
//! One GET per call with a spoofed identity, an HTML-biased `Accept` header,
//! a redirect cap, and a hard byte cap enforced while the body streams in.
//! Every await observes the caller's deadline.

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONTENT_LENGTH, CONTENT_TYPE, LOCATION, USER_AGENT,
};
use reqwest::{redirect, Client, Response, StatusCode, Url};
use tokio::time::{timeout_at, Instant};
use tracing::debug;

use crate::error::{FetchError, Result};
use crate::security::is_blocked_host;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.9";

/// Parameters for one bounded GET.
#[derive(Debug, Clone)]
pub struct PageRequest<'a> {
    pub url: &'a str,
    pub user_agent: &'a str,
    pub redirect_limit: usize,
    pub max_bytes: usize,
    /// The request is abandoned with [`FetchError::Cancelled`] at this instant.
    pub deadline: Instant,
    /// Refuse to follow redirects into private/loopback/link-local hosts.
    pub block_private_redirects: bool,
}

/// Body and declared content type of a successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub body: String,
    pub content_type: String,
}

/// Transport used by the orchestrator for each attempt.
#[async_trait]
pub trait PageClient: Send + Sync {
    async fn fetch(&self, request: &PageRequest<'_>) -> Result<FetchedPage>;
}

/// reqwest-backed [`PageClient`].
///
/// The underlying client never follows redirects on its own; hops are
/// followed here so each request's `redirect_limit` and host policy apply
/// while every request shares one connection pool.
#[derive(Default)]
pub struct BoundedFetcher {
    client: OnceCell<Client>,
}

impl BoundedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> Result<&Client> {
        self.client.get_or_try_init(|| {
            Client::builder()
                .redirect(redirect::Policy::none())
                .build()
                .map_err(|e| FetchError::Network(format!("HTTP client error: {}", e)))
        })
    }

    async fn fetch_inner(&self, client: &Client, request: &PageRequest<'_>) -> Result<FetchedPage> {
        let mut current = Url::parse(request.url)
            .map_err(|e| FetchError::InvalidUrl(format!("Invalid url: {}", e)))?;
        let mut hops = 0usize;

        let mut response = loop {
            let response = client
                .get(current.clone())
                .header(USER_AGENT, request.user_agent)
                .header(ACCEPT, ACCEPT_HTML)
                .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_EN)
                .send()
                .await?;

            let Some(next) = redirect_target(&response, &current) else {
                break response;
            };
            hops += 1;
            if hops > request.redirect_limit {
                return Err(FetchError::Network(format!(
                    "maximum redirect reached ({})",
                    request.redirect_limit
                )));
            }
            if !matches!(next.scheme(), "http" | "https") {
                return Err(FetchError::Network(format!(
                    "redirect to unsupported scheme '{}'",
                    next.scheme()
                )));
            }
            if request.block_private_redirects
                && next.host_str().map(|h| is_blocked_host(h, false)).unwrap_or(true)
            {
                return Err(FetchError::Network(
                    "redirect destination is a blocked host".to_string(),
                ));
            }
            debug!(from = %current, to = %next, hops, "Following redirect");
            current = next;
        };

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpError {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let declared = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0);
        if declared > request.max_bytes as u64 {
            return Err(FetchError::TooLarge(format!(
                "Response too large ({} bytes)",
                declared
            )));
        }

        // The declared length is optional and can lie, so the running total
        // is what actually bounds memory.
        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if buf.len() + chunk.len() > request.max_bytes {
                return Err(FetchError::TooLarge(format!(
                    "Response exceeded {} bytes",
                    request.max_bytes
                )));
            }
            buf.extend_from_slice(&chunk);
        }

        Ok(FetchedPage {
            body: String::from_utf8_lossy(&buf).into_owned(),
            content_type,
        })
    }
}

/// Where a redirect response points, resolved against the URL that
/// produced it. `None` for anything that is not a followable redirect.
fn redirect_target(response: &Response, current: &Url) -> Option<Url> {
    match response.status() {
        StatusCode::MOVED_PERMANENTLY
        | StatusCode::FOUND
        | StatusCode::SEE_OTHER
        | StatusCode::TEMPORARY_REDIRECT
        | StatusCode::PERMANENT_REDIRECT => {}
        _ => return None,
    }
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    current.join(location).ok()
}

#[async_trait]
impl PageClient for BoundedFetcher {
    async fn fetch(&self, request: &PageRequest<'_>) -> Result<FetchedPage> {
        if Instant::now() >= request.deadline {
            return Err(FetchError::Cancelled);
        }

        let client = self.client()?;
        match timeout_at(request.deadline, self.fetch_inner(client, request)).await {
            Ok(result) => result,
            Err(_) => {
                debug!(url = request.url, "Fetch abandoned at deadline");
                Err(FetchError::Cancelled)
            }
        }
    }
}
