//! Strategy-fallback fetch protocol.
//!
//! One orchestration tries up to four strategies, `(direct|proxy) x
//! (extraction on|off)`, in precedence order, moving the strategy that last
//! worked for the host to the front. `direct` fetches the caller's URL;
//! `proxy` walks the mirror URLs. The first attempt that yields non-empty
//! text wins and is remembered for the host.
//!
//! A single deadline covers the whole orchestration. When it passes, no new
//! attempt starts, the in-flight attempt is abandoned, and the result is
//! [`FetchError::Timeout`]. Every other failure is local to its attempt.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::{
    pick_user_agent, BoundedFetcher, Channel, FetchOptions, FetchOutcome, MirrorBuilder,
    PageClient, PageRequest, RelayMirror, Strategy, StrategyCache, DEFAULT_STRATEGIES,
};
use crate::config::{Config, SecurityConfig};
use crate::error::{FetchError, Result};
use crate::extract::{ExtractOptions, Extracted, Extractor, ReadableExtractor};
use crate::security::{resolve_and_check_host, validate_target_url};
use crate::utils::string::preview;

const EXHAUSTED_MESSAGE: &str = "Unable to fetch page content";

/// Strategy precedence with `cached` moved to the front. The relative order
/// of the other strategies is unchanged.
pub fn strategy_order(cached: Option<Strategy>) -> Vec<Strategy> {
    let mut order = DEFAULT_STRATEGIES.to_vec();
    if let Some(cached) = cached {
        if let Some(index) = order.iter().position(|s| *s == cached) {
            if index > 0 {
                let strategy = order.remove(index);
                order.insert(0, strategy);
            }
        }
    }
    order
}

pub struct FetchOrchestrator {
    client: Arc<dyn PageClient>,
    extractor: Arc<dyn Extractor>,
    cache: Arc<StrategyCache>,
    mirror: Arc<dyn MirrorBuilder>,
    security: SecurityConfig,
}

impl FetchOrchestrator {
    /// Orchestrator using the default relay mirror and security policy.
    pub fn new(
        client: Arc<dyn PageClient>,
        extractor: Arc<dyn Extractor>,
        cache: Arc<StrategyCache>,
    ) -> Self {
        Self {
            client,
            extractor,
            cache,
            mirror: Arc::new(RelayMirror::default()),
            security: SecurityConfig::default(),
        }
    }

    /// Production wiring: reqwest fetcher, scraper extractor, a cache sized
    /// from `cache.capacity`, and the configured mirror prefix.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(BoundedFetcher::new()),
            Arc::new(ReadableExtractor::new()),
            Arc::new(StrategyCache::new(config.cache.capacity)),
        )
        .with_mirror(Arc::new(RelayMirror::new(config.fetch.mirror_prefix.clone())))
        .with_security(config.security.clone())
    }

    pub fn with_mirror(mut self, mirror: Arc<dyn MirrorBuilder>) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    pub fn cache(&self) -> &Arc<StrategyCache> {
        &self.cache
    }

    pub fn security(&self) -> &SecurityConfig {
        &self.security
    }

    /// Check a caller-supplied URL against the security policy.
    ///
    /// Scheme, length, and host checks run before any traffic to the target;
    /// with `verify_dns` the hostname is also resolved and checked.
    pub async fn preflight(&self, raw_url: &str) -> Result<Url> {
        let url = validate_target_url(raw_url, &self.security)?;
        if self.security.verify_dns {
            resolve_and_check_host(&url, self.security.allow_private).await?;
        }
        Ok(url)
    }

    /// [`preflight`](Self::preflight), then [`orchestrate`](Self::orchestrate).
    pub async fn fetch(&self, raw_url: &str, options: &FetchOptions) -> Result<FetchOutcome> {
        let url = self.preflight(raw_url).await?;
        self.orchestrate(&url, options).await
    }

    /// Run the fallback protocol for an already-validated URL.
    ///
    /// Fails only with [`FetchError::Timeout`] or [`FetchError::FetchExhausted`].
    pub async fn orchestrate(&self, url: &Url, options: &FetchOptions) -> Result<FetchOutcome> {
        let deadline = Instant::now() + Duration::from_millis(options.timeout_ms);
        let original = url.as_str();
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();

        let mirrors = if options.allow_fallbacks {
            self.mirror.mirror_urls(url)
        } else {
            Vec::new()
        };
        let identity = pick_user_agent(
            options.user_agent_mode,
            original,
            &options.user_agent_family,
            &options.user_agent,
        );
        let cached = self.cache.get(&host);
        let strategies = strategy_order(cached);

        debug!(
            url = original,
            host = %host,
            cached = ?cached,
            mirrors = mirrors.len(),
            "Starting fetch orchestration"
        );

        let mut last_error: Option<String> = None;

        for strategy in strategies {
            let candidates: Vec<&str> = match strategy.channel {
                Channel::Direct => vec![original],
                Channel::Proxy => mirrors.iter().map(String::as_str).collect(),
            };

            for candidate in candidates {
                if Instant::now() >= deadline {
                    return Err(self.timed_out(original, options));
                }

                let attempt_deadline = match options.attempt_timeout_ms {
                    Some(ms) => deadline.min(Instant::now() + Duration::from_millis(ms)),
                    None => deadline,
                };

                let result = self
                    .attempt(candidate, original, &identity, strategy, options, attempt_deadline)
                    .await;

                match result {
                    Ok(extracted) if !extracted.text.is_empty() => {
                        self.cache.put(&host, strategy);
                        debug!(
                            url = original,
                            candidate,
                            via = %strategy.channel,
                            prefer_extraction = strategy.prefer_extraction,
                            method = extracted.method.as_str(),
                            text = %preview(&extracted.text, 80),
                            "Fetch succeeded"
                        );
                        return Ok(FetchOutcome {
                            text: extracted.text,
                            title: extracted.title,
                            byline: extracted.byline,
                            excerpt: extracted.excerpt,
                            method: extracted.method,
                            via: strategy.channel,
                        });
                    }
                    Ok(_) => {
                        if options.debug {
                            warn!(candidate, ?strategy, "Attempt produced no text");
                        }
                    }
                    Err(FetchError::Cancelled) if Instant::now() >= deadline => {
                        return Err(self.timed_out(original, options));
                    }
                    Err(err) => {
                        if options.debug {
                            warn!(candidate, ?strategy, error = %err, "Fetch attempt failed");
                        }
                        last_error = Some(err.to_string());
                    }
                }
            }
        }

        Err(FetchError::FetchExhausted(
            last_error.unwrap_or_else(|| EXHAUSTED_MESSAGE.to_string()),
        ))
    }

    async fn attempt(
        &self,
        candidate: &str,
        original: &str,
        identity: &str,
        strategy: Strategy,
        options: &FetchOptions,
        deadline: Instant,
    ) -> Result<Extracted> {
        let request = PageRequest {
            url: candidate,
            user_agent: identity,
            redirect_limit: options.redirect_limit,
            max_bytes: options.max_bytes,
            deadline,
            block_private_redirects: !self.security.allow_private,
        };
        let page = self.client.fetch(&request).await?;

        let extract_options = ExtractOptions {
            max_chars: options.max_chars,
            prefer_readability: strategy.prefer_extraction && options.prefer_readability,
        };
        self.extractor.extract(&page.body, original, &extract_options)
    }

    fn timed_out(&self, url: &str, options: &FetchOptions) -> FetchError {
        if options.debug {
            warn!(url, timeout_ms = options.timeout_ms, "Fetch deadline elapsed");
        }
        FetchError::Timeout(options.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractionMethod;
    use crate::fetch::{FetchedPage, UserAgentMode};
    use async_trait::async_trait;
    use mockall::mock;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const ARTICLE: &str =
        "<html><head><title>T</title></head><body><article><p>Hello from the page.</p></article></body></html>";
    const TARGET: &str = "https://news.example.com/story?id=7";
    const MIRROR_HTTP: &str = "https://r.jina.ai/http://news.example.com/story?id=7";
    const MIRROR_HTTPS: &str = "https://r.jina.ai/https://news.example.com/story?id=7";

    #[derive(Clone)]
    enum Reply {
        Html(&'static str),
        Status(u16),
        /// Never answers; returns `Cancelled` once the attempt deadline passes.
        Hang,
    }

    /// In-memory transport keyed by exact URL. Unknown URLs fail as network
    /// errors.
    #[derive(Default)]
    struct ScriptedClient {
        replies: HashMap<String, Reply>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedClient {
        fn with(mut self, url: &str, reply: Reply) -> Self {
            self.replies.insert(url.to_string(), reply);
            self
        }

        fn urls(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(u, _)| u.clone()).collect()
        }

        fn identities(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|(_, a)| a.clone()).collect()
        }
    }

    #[async_trait]
    impl PageClient for ScriptedClient {
        async fn fetch(&self, request: &PageRequest<'_>) -> Result<FetchedPage> {
            self.calls
                .lock()
                .unwrap()
                .push((request.url.to_string(), request.user_agent.to_string()));
            match self.replies.get(request.url) {
                Some(Reply::Html(body)) => Ok(FetchedPage {
                    body: body.to_string(),
                    content_type: "text/html".into(),
                }),
                Some(Reply::Status(status)) => Err(FetchError::HttpError {
                    status: *status,
                    reason: "Forbidden".into(),
                }),
                Some(Reply::Hang) => {
                    tokio::time::sleep_until(request.deadline).await;
                    Err(FetchError::Cancelled)
                }
                None => Err(FetchError::Network("connection refused".into())),
            }
        }
    }

    /// Records the base URL and readability flag of every call.
    #[derive(Default)]
    struct RecordingExtractor {
        calls: Mutex<Vec<(String, bool)>>,
    }

    impl Extractor for RecordingExtractor {
        fn extract(&self, html: &str, base_url: &str, options: &ExtractOptions) -> Result<Extracted> {
            self.calls
                .lock()
                .unwrap()
                .push((base_url.to_string(), options.prefer_readability));
            ReadableExtractor::new().extract(html, base_url, options)
        }
    }

    /// Fails the first `failures` calls, then extracts normally.
    struct FailingExtractor {
        failures: usize,
        calls: Mutex<usize>,
    }

    impl FailingExtractor {
        fn new(failures: usize) -> Self {
            Self {
                failures,
                calls: Mutex::new(0),
            }
        }
    }

    impl Extractor for FailingExtractor {
        fn extract(&self, html: &str, base_url: &str, options: &ExtractOptions) -> Result<Extracted> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls <= self.failures {
                return Err(FetchError::ExtractionFailed("parser choked".into()));
            }
            ReadableExtractor::new().extract(html, base_url, options)
        }
    }

    mock! {
        Mirror {}
        impl MirrorBuilder for Mirror {
            fn mirror_urls(&self, target: &Url) -> Vec<String>;
        }
    }

    fn orchestrator(client: Arc<ScriptedClient>, cache: Arc<StrategyCache>) -> FetchOrchestrator {
        FetchOrchestrator::new(client, Arc::new(ReadableExtractor::new()), cache)
    }

    fn target() -> Url {
        Url::parse(TARGET).unwrap()
    }

    #[test]
    fn test_strategy_order_moves_cached_to_front() {
        let cached = Strategy::new(Channel::Proxy, true);
        let order = strategy_order(Some(cached));
        assert_eq!(
            order,
            vec![
                Strategy::new(Channel::Proxy, true),
                Strategy::new(Channel::Direct, true),
                Strategy::new(Channel::Direct, false),
                Strategy::new(Channel::Proxy, false),
            ]
        );
        assert_eq!(strategy_order(Some(DEFAULT_STRATEGIES[0])), DEFAULT_STRATEGIES.to_vec());
        assert_eq!(strategy_order(None), DEFAULT_STRATEGIES.to_vec());
    }

    #[tokio::test]
    async fn test_direct_success_records_strategy() {
        let client = Arc::new(ScriptedClient::default().with(TARGET, Reply::Html(ARTICLE)));
        let cache = Arc::new(StrategyCache::new(8));
        let orch = orchestrator(client.clone(), cache.clone());

        let outcome = orch.orchestrate(&target(), &FetchOptions::default()).await.unwrap();
        assert_eq!(outcome.text, "Hello from the page.");
        assert_eq!(outcome.via, Channel::Direct);
        assert_eq!(outcome.method, ExtractionMethod::Extraction);
        assert_eq!(client.urls(), vec![TARGET]);
        assert_eq!(
            cache.get("news.example.com"),
            Some(Strategy::new(Channel::Direct, true))
        );
    }

    #[tokio::test]
    async fn test_blocked_direct_falls_back_to_mirror() {
        let client = Arc::new(
            ScriptedClient::default()
                .with(TARGET, Reply::Status(403))
                .with(MIRROR_HTTP, Reply::Html(ARTICLE)),
        );
        let cache = Arc::new(StrategyCache::new(8));
        let orch = orchestrator(client.clone(), cache.clone());

        let outcome = orch.orchestrate(&target(), &FetchOptions::default()).await.unwrap();
        assert_eq!(outcome.via, Channel::Proxy);
        assert_eq!(outcome.text, "Hello from the page.");
        assert_eq!(client.urls(), vec![TARGET, TARGET, MIRROR_HTTP]);
        assert_eq!(
            cache.get("news.example.com"),
            Some(Strategy::new(Channel::Proxy, true))
        );
    }

    #[tokio::test]
    async fn test_second_mirror_tried_after_first_fails() {
        let client = Arc::new(
            ScriptedClient::default()
                .with(TARGET, Reply::Status(403))
                .with(MIRROR_HTTPS, Reply::Html(ARTICLE)),
        );
        let orch = orchestrator(client.clone(), Arc::new(StrategyCache::new(8)));

        let outcome = orch.orchestrate(&target(), &FetchOptions::default()).await.unwrap();
        assert_eq!(outcome.via, Channel::Proxy);
        assert_eq!(client.urls(), vec![TARGET, TARGET, MIRROR_HTTP, MIRROR_HTTPS]);
    }

    #[tokio::test]
    async fn test_cached_strategy_tried_first() {
        let cache = Arc::new(StrategyCache::new(8));
        cache.put("news.example.com", Strategy::new(Channel::Proxy, true));
        let client = Arc::new(
            ScriptedClient::default()
                .with(TARGET, Reply::Status(403))
                .with(MIRROR_HTTP, Reply::Html(ARTICLE)),
        );
        let orch = orchestrator(client.clone(), cache);

        let outcome = orch.orchestrate(&target(), &FetchOptions::default()).await.unwrap();
        assert_eq!(outcome.via, Channel::Proxy);
        assert_eq!(client.urls(), vec![MIRROR_HTTP]);
    }

    #[tokio::test]
    async fn test_extractor_error_moves_on_to_next_strategy() {
        let client = Arc::new(ScriptedClient::default().with(TARGET, Reply::Html(ARTICLE)));
        let cache = Arc::new(StrategyCache::new(8));
        let orch = FetchOrchestrator::new(client.clone(), Arc::new(FailingExtractor::new(1)), cache.clone());

        let outcome = orch.orchestrate(&target(), &FetchOptions::default()).await.unwrap();
        assert_eq!(outcome.via, Channel::Direct);
        assert_eq!(outcome.method, ExtractionMethod::Raw);
        assert_eq!(outcome.text, "Hello from the page.");
        assert_eq!(client.urls(), vec![TARGET, TARGET]);
        assert_eq!(
            cache.get("news.example.com"),
            Some(Strategy::new(Channel::Direct, false))
        );
    }

    #[tokio::test]
    async fn test_exhausted_surfaces_extraction_error() {
        let client = Arc::new(ScriptedClient::default().with(TARGET, Reply::Html(ARTICLE)));
        let cache = Arc::new(StrategyCache::new(8));
        let orch = FetchOrchestrator::new(client, Arc::new(FailingExtractor::new(usize::MAX)), cache.clone());
        let options = FetchOptions {
            allow_fallbacks: false,
            ..FetchOptions::default()
        };

        let err = orch.orchestrate(&target(), &options).await.unwrap_err();
        assert!(matches!(err, FetchError::FetchExhausted(_)));
        assert_eq!(err.to_string(), "Extraction failed: parser choked");
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_other_url_on_same_host_starts_with_remembered_strategy() {
        const OTHER: &str = "https://news.example.com/other";
        const OTHER_MIRROR: &str = "https://r.jina.ai/http://news.example.com/other";
        let client = Arc::new(
            ScriptedClient::default()
                .with(TARGET, Reply::Status(403))
                .with(MIRROR_HTTP, Reply::Html(ARTICLE))
                .with(OTHER, Reply::Status(403))
                .with(OTHER_MIRROR, Reply::Html(ARTICLE)),
        );
        let orch = orchestrator(client.clone(), Arc::new(StrategyCache::new(8)));

        orch.orchestrate(&target(), &FetchOptions::default()).await.unwrap();
        assert_eq!(client.urls(), vec![TARGET, TARGET, MIRROR_HTTP]);

        let other = Url::parse(OTHER).unwrap();
        let outcome = orch.orchestrate(&other, &FetchOptions::default()).await.unwrap();
        assert_eq!(outcome.via, Channel::Proxy);
        assert_eq!(client.urls(), vec![TARGET, TARGET, MIRROR_HTTP, OTHER_MIRROR]);
    }

    #[tokio::test]
    async fn test_exhausted_keeps_last_error() {
        let client = Arc::new(ScriptedClient::default().with(TARGET, Reply::Status(403)));
        let orch = orchestrator(client.clone(), Arc::new(StrategyCache::new(8)));
        let options = FetchOptions {
            allow_fallbacks: false,
            ..FetchOptions::default()
        };

        let err = orch.orchestrate(&target(), &options).await.unwrap_err();
        assert!(matches!(err, FetchError::FetchExhausted(_)));
        assert_eq!(err.to_string(), "Request failed: 403 Forbidden");
        assert_eq!(client.urls(), vec![TARGET, TARGET]);
    }

    #[tokio::test]
    async fn test_empty_text_everywhere_is_generic_failure() {
        let empty = "<html><body></body></html>";
        let client = Arc::new(
            ScriptedClient::default()
                .with(TARGET, Reply::Html(empty))
                .with(MIRROR_HTTP, Reply::Html(empty))
                .with(MIRROR_HTTPS, Reply::Html(empty)),
        );
        let cache = Arc::new(StrategyCache::new(8));
        let orch = orchestrator(client.clone(), cache.clone());

        let err = orch.orchestrate(&target(), &FetchOptions::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Unable to fetch page content");
        assert_eq!(client.urls().len(), 6);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_never_cached() {
        let client = Arc::new(ScriptedClient::default());
        let cache = Arc::new(StrategyCache::new(8));
        let orch = orchestrator(client, cache.clone());

        assert!(orch.orchestrate(&target(), &FetchOptions::default()).await.is_err());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_global_deadline_is_terminal_timeout() {
        let client = Arc::new(
            ScriptedClient::default()
                .with(TARGET, Reply::Hang)
                .with(MIRROR_HTTP, Reply::Html(ARTICLE)),
        );
        let cache = Arc::new(StrategyCache::new(8));
        let orch = orchestrator(client.clone(), cache.clone());
        let options = FetchOptions {
            timeout_ms: 100,
            ..FetchOptions::default()
        };

        let started = std::time::Instant::now();
        let err = orch.orchestrate(&target(), &options).await.unwrap_err();
        assert!(matches!(err, FetchError::Timeout(100)));
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(client.urls(), vec![TARGET]);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_attempt_timeout_moves_on_to_mirror() {
        let client = Arc::new(
            ScriptedClient::default()
                .with(TARGET, Reply::Hang)
                .with(MIRROR_HTTP, Reply::Html(ARTICLE)),
        );
        let cache = Arc::new(StrategyCache::new(8));
        let orch = orchestrator(client.clone(), cache.clone());
        let options = FetchOptions {
            timeout_ms: 5_000,
            attempt_timeout_ms: Some(50),
            ..FetchOptions::default()
        };

        let outcome = orch.orchestrate(&target(), &options).await.unwrap();
        assert_eq!(outcome.via, Channel::Proxy);
        assert_eq!(client.urls(), vec![TARGET, TARGET, MIRROR_HTTP]);
        assert_eq!(
            cache.get("news.example.com").map(|s| s.channel),
            Some(Channel::Proxy)
        );
    }

    #[tokio::test]
    async fn test_readability_flag_and_original_base_url() {
        let client = Arc::new(
            ScriptedClient::default()
                .with(TARGET, Reply::Status(403))
                .with(MIRROR_HTTP, Reply::Status(403))
                .with(MIRROR_HTTPS, Reply::Html(ARTICLE)),
        );
        let extractor = Arc::new(RecordingExtractor::default());
        let orch = FetchOrchestrator::new(
            client,
            extractor.clone(),
            Arc::new(StrategyCache::new(8)),
        );

        let outcome = orch.orchestrate(&target(), &FetchOptions::default()).await.unwrap();
        assert_eq!(outcome.via, Channel::Proxy);
        // Only the successful fetch reached the extractor.
        assert_eq!(*extractor.calls.lock().unwrap(), vec![(TARGET.to_string(), true)]);
    }

    #[tokio::test]
    async fn test_prefer_readability_off_yields_raw() {
        let client = Arc::new(ScriptedClient::default().with(TARGET, Reply::Html(ARTICLE)));
        let orch = orchestrator(client, Arc::new(StrategyCache::new(8)));
        let options = FetchOptions {
            prefer_readability: false,
            ..FetchOptions::default()
        };

        let outcome = orch.orchestrate(&target(), &options).await.unwrap();
        assert_eq!(outcome.method, ExtractionMethod::Raw);
        assert_eq!(outcome.text, "Hello from the page.");
    }

    #[tokio::test]
    async fn test_identity_is_stable_across_attempts() {
        let client = Arc::new(ScriptedClient::default().with(MIRROR_HTTP, Reply::Html(ARTICLE)));
        let orch = orchestrator(client.clone(), Arc::new(StrategyCache::new(8)));
        let options = FetchOptions {
            user_agent_mode: UserAgentMode::Fixed,
            user_agent: "Bot/1.0".into(),
            ..FetchOptions::default()
        };

        orch.orchestrate(&target(), &options).await.unwrap();
        let identities = client.identities();
        assert_eq!(identities.len(), 3);
        assert!(identities.iter().all(|ua| ua == "Bot/1.0"));
    }

    #[tokio::test]
    async fn test_custom_mirror_builder_consulted_once() {
        let mut mirror = MockMirror::new();
        mirror
            .expect_mirror_urls()
            .times(1)
            .returning(|_| vec!["https://relay.test/copy".to_string()]);
        let client = Arc::new(
            ScriptedClient::default().with("https://relay.test/copy", Reply::Html(ARTICLE)),
        );
        let orch = orchestrator(client.clone(), Arc::new(StrategyCache::new(8)))
            .with_mirror(Arc::new(mirror));

        let outcome = orch.orchestrate(&target(), &FetchOptions::default()).await.unwrap();
        assert_eq!(outcome.via, Channel::Proxy);
        assert_eq!(client.urls(), vec![TARGET, TARGET, "https://relay.test/copy"]);
    }

    #[tokio::test]
    async fn test_mirror_not_built_without_fallbacks() {
        let mut mirror = MockMirror::new();
        mirror.expect_mirror_urls().times(0);
        let client = Arc::new(ScriptedClient::default());
        let orch = orchestrator(client, Arc::new(StrategyCache::new(8))).with_mirror(Arc::new(mirror));
        let options = FetchOptions {
            allow_fallbacks: false,
            ..FetchOptions::default()
        };

        let err = orch.orchestrate(&target(), &options).await.unwrap_err();
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[tokio::test]
    async fn test_fetch_rejects_before_network() {
        let client = Arc::new(ScriptedClient::default().with("http://127.0.0.1/", Reply::Html(ARTICLE)));
        let orch = orchestrator(client.clone(), Arc::new(StrategyCache::new(8)));
        let options = FetchOptions::default();

        let err = orch.fetch("http://127.0.0.1/", &options).await.unwrap_err();
        assert!(matches!(err, FetchError::BlockedHost));

        let err = orch.fetch("ftp://example.com/file", &options).await.unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme));

        let err = orch.fetch("", &options).await.unwrap_err();
        assert_eq!(err.to_string(), "Missing url parameter");

        assert!(client.urls().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_allows_private_when_configured() {
        let client = Arc::new(ScriptedClient::default().with("http://127.0.0.1/", Reply::Html(ARTICLE)));
        let orch = orchestrator(client.clone(), Arc::new(StrategyCache::new(8))).with_security(
            SecurityConfig {
                allow_private: true,
                ..SecurityConfig::default()
            },
        );

        let outcome = orch.fetch("http://127.0.0.1/", &FetchOptions::default()).await.unwrap();
        assert_eq!(outcome.via, Channel::Direct);
    }
}
