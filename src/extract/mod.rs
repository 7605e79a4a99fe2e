//! Readable-text extraction from fetched HTML.
//!
//! The orchestrator hands every fetched body to an [`Extractor`]. The
//! extractor either isolates the main content of the page
//! ([`ExtractionMethod::Extraction`]) or falls back to the whole body text
//! ([`ExtractionMethod::Raw`]). Either way the text comes back with
//! whitespace collapsed and truncated to `max_chars` characters.

pub mod readable;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use readable::ReadableExtractor;

/// How the returned text was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Main content isolated from the page markup.
    Extraction,
    /// Whole body text.
    Raw,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Extraction => "extraction",
            ExtractionMethod::Raw => "raw",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub max_chars: usize,
    /// Run the main-content pass before falling back to body text.
    pub prefer_readability: bool,
}

/// Text and metadata pulled from a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub text: String,
    pub title: String,
    pub byline: String,
    pub excerpt: String,
    pub method: ExtractionMethod,
}

/// Turns an HTML document into plain text.
///
/// `base_url` is always the caller's original URL, even when the body came
/// from a mirror. An empty `text` in the result means "nothing usable" and
/// is not an error.
pub trait Extractor: Send + Sync {
    fn extract(&self, html: &str, base_url: &str, options: &ExtractOptions) -> Result<Extracted>;
}
