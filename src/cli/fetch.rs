//! `pagefetch <URL>` handler.

use anyhow::Result;
use serde_json::json;

use pagefetch::chunk::chunk_text;
use pagefetch::config::Config;
use pagefetch::fetch::{FetchOptions, FetchOrchestrator, UserAgentMode};

use super::FetchArgs;

/// Configured defaults with CLI flags applied on top.
pub(crate) fn resolve_options(config: &Config, args: &FetchArgs) -> FetchOptions {
    let mut options = config.fetch.to_options();

    if let Some(v) = args.max_chars {
        options.max_chars = v;
    }
    if let Some(v) = &args.ua_mode {
        options.user_agent_mode = UserAgentMode::parse(v);
    }
    if let Some(v) = &args.ua_family {
        options.user_agent_family = v.clone();
    }
    if let Some(v) = &args.user_agent {
        options.user_agent = v.clone();
    }
    if let Some(v) = args.timeout_ms {
        options.timeout_ms = v;
    }
    if args.attempt_timeout_ms.is_some() {
        options.attempt_timeout_ms = args.attempt_timeout_ms;
    }
    if let Some(v) = args.max_bytes {
        options.max_bytes = v;
    }
    if let Some(v) = args.redirect_limit {
        options.redirect_limit = v;
    }
    if args.no_fallbacks {
        options.allow_fallbacks = false;
    }
    if args.raw {
        options.prefer_readability = false;
    }
    if args.meta {
        options.include_meta = true;
    }
    if args.debug {
        options.debug = true;
    }

    options
}

/// Fetch `url` and print its text, or a JSON document when metadata or
/// chunks were requested.
pub(crate) async fn cmd_fetch(config: &Config, url: &str, args: &FetchArgs) -> Result<()> {
    let mut config = config.clone();
    if args.allow_private {
        config.security.allow_private = true;
    }

    let options = resolve_options(&config, args);
    let orchestrator = FetchOrchestrator::from_config(&config);
    let outcome = orchestrator.fetch(url, &options).await?;

    let chunks = args
        .chunk_size
        .filter(|size| *size > 0)
        .map(|size| chunk_text(&outcome.text, size, args.chunk_overlap, args.max_chunks));

    if !options.include_meta && chunks.is_none() {
        println!("{}", outcome.text);
        return Ok(());
    }

    let mut body = json!({ "url": url, "text": outcome.text });
    if options.include_meta {
        body["meta"] = serde_json::to_value(outcome.meta())?;
    }
    if let Some(chunks) = chunks {
        body["chunks"] = json!(chunks);
    }
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
