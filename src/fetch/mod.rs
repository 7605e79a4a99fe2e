//! Fetch pipeline: identity selection, bounded transport, mirror URLs,
//! per-host strategy memory, and the orchestrator that ties them together.

pub mod cache;
pub mod client;
pub mod mirror;
pub mod orchestrator;
mod types;
pub mod user_agent;

pub use cache::StrategyCache;
pub use client::{BoundedFetcher, FetchedPage, PageClient, PageRequest};
pub use mirror::{MirrorBuilder, RelayMirror, DEFAULT_MIRROR_PREFIX};
pub use orchestrator::{strategy_order, FetchOrchestrator};
pub use types::*;
pub use user_agent::{pick_user_agent, user_agent_families};
