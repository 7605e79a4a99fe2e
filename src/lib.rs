//! pagefetch - hardened web page text fetcher
//!
//! Fetches a page's readable text while defending against slow or huge
//! responses, internal targets, and sites that block direct fetches. The
//! [`FetchOrchestrator`] tries direct and mirrored requests with and without
//! main-content extraction, remembering per host which one last worked.

pub mod chunk;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod security;
#[cfg(feature = "server")]
pub mod server;
pub mod utils;

pub use chunk::chunk_text;
pub use config::Config;
pub use error::{FetchError, Result};
pub use extract::{ExtractionMethod, Extractor, ReadableExtractor};
pub use fetch::{
    BoundedFetcher, Channel, FetchMeta, FetchOptions, FetchOrchestrator, FetchOutcome,
    MirrorBuilder, PageClient, RelayMirror, Strategy, StrategyCache,
};
pub use security::{is_blocked_host, normalize_target_url, validate_target_url};
