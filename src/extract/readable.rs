//! Default [`Extractor`] built on `scraper`.
//!
//! Noise elements (scripts, styles, navigation, page chrome, forms) never
//! contribute text. The main-content pass looks for `<article>`, `<main>`,
//! `[role=main]`, and finally the block with the most paragraph text.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::trace;

use super::{ExtractOptions, Extracted, ExtractionMethod, Extractor};
use crate::error::Result;
use crate::utils::string::prefix_chars;

const NOISE_TAGS: &[&str] = &[
    "script", "style", "noscript", "iframe", "svg", "canvas", "form", "nav", "footer", "header",
    "aside", "template",
];

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "td", "th", "br", "section",
    "article", "blockquote", "pre",
];

/// A scored block needs at least this much paragraph text to count as the
/// main content.
const MIN_BLOCK_CHARS: usize = 100;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static MAIN_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["article", "main", "[role=main]"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});
static BLOCK_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("div, section, td").unwrap());
static BODY_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());
static TITLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static H1_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static OG_TITLE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static AUTHOR_META_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="author"]"#).unwrap());
static BYLINE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[rel="author"], .byline, .author"#).unwrap());
static DESCRIPTION_SEL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"meta[name="description"], meta[property="og:description"]"#).unwrap()
});
static PARAGRAPH_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Collapse whitespace runs to one space, trim, and keep the first
/// `max_chars` characters.
pub fn normalize_text(text: &str, max_chars: usize) -> String {
    let collapsed = WHITESPACE_RE.replace_all(text, " ");
    prefix_chars(collapsed.trim(), max_chars)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ReadableExtractor;

impl ReadableExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for ReadableExtractor {
    fn extract(&self, html: &str, base_url: &str, options: &ExtractOptions) -> Result<Extracted> {
        let document = Html::parse_document(html);

        let main = if options.prefer_readability {
            find_main_content(&document)
        } else {
            None
        };

        let extracted = match main {
            Some(text) => Extracted {
                text: normalize_text(&text, options.max_chars),
                title: page_title(&document),
                byline: byline(&document),
                excerpt: excerpt(&document),
                method: ExtractionMethod::Extraction,
            },
            None => {
                let root = document
                    .select(&BODY_SEL)
                    .next()
                    .unwrap_or_else(|| document.root_element());
                Extracted {
                    text: normalize_text(&visible_text(root), options.max_chars),
                    title: document_title(&document),
                    byline: String::new(),
                    excerpt: String::new(),
                    method: ExtractionMethod::Raw,
                }
            }
        };

        trace!(
            base_url,
            method = extracted.method.as_str(),
            chars = extracted.text.chars().count(),
            "Extracted page text"
        );
        Ok(extracted)
    }
}

fn is_noise(element: &ElementRef<'_>) -> bool {
    NOISE_TAGS.contains(&element.value().name())
}

/// Text content of `element`, skipping noise subtrees and separating block
/// elements with spaces.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_visible_text(element, &mut out);
    out
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                if is_noise(&child_el) {
                    continue;
                }
                let block = BLOCK_TAGS.contains(&child_el.value().name());
                if block {
                    out.push(' ');
                }
                push_visible_text(child_el, out);
                if block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

fn has_noise_ancestor(element: &ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_noise(&ancestor))
}

fn find_main_content(document: &Html) -> Option<String> {
    for selector in MAIN_SELECTORS.iter() {
        for candidate in document.select(selector) {
            if has_noise_ancestor(&candidate) {
                continue;
            }
            let text = visible_text(candidate);
            if !text.trim().is_empty() {
                return Some(text);
            }
        }
    }

    densest_block(document).map(visible_text)
}

/// The block whose direct `<p>` children carry the most text.
fn densest_block(document: &Html) -> Option<ElementRef<'_>> {
    document
        .select(&BLOCK_SEL)
        .filter(|block| !has_noise_ancestor(block))
        .map(|block| {
            let score: usize = block
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|child| child.value().name() == "p")
                .map(|p| visible_text(p).trim().chars().count())
                .sum();
            (block, score)
        })
        .filter(|(_, score)| *score >= MIN_BLOCK_CHARS)
        .max_by_key(|(_, score)| *score)
        .map(|(block, _)| block)
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .filter_map(|m| m.value().attr("content"))
        .map(|c| normalize_text(c, usize::MAX))
        .find(|c| !c.is_empty())
}

fn document_title(document: &Html) -> String {
    document
        .select(&TITLE_SEL)
        .next()
        .map(|t| normalize_text(&t.text().collect::<String>(), usize::MAX))
        .unwrap_or_default()
}

fn page_title(document: &Html) -> String {
    if let Some(title) = meta_content(document, &OG_TITLE_SEL) {
        return title;
    }
    let title = document_title(document);
    if !title.is_empty() {
        return title;
    }
    document
        .select(&H1_SEL)
        .next()
        .map(|h| normalize_text(&visible_text(h), usize::MAX))
        .unwrap_or_default()
}

fn byline(document: &Html) -> String {
    if let Some(author) = meta_content(document, &AUTHOR_META_SEL) {
        return author;
    }
    document
        .select(&BYLINE_SEL)
        .map(|el| normalize_text(&visible_text(el), usize::MAX))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

fn excerpt(document: &Html) -> String {
    if let Some(description) = meta_content(document, &DESCRIPTION_SEL) {
        return description;
    }
    document
        .select(&PARAGRAPH_SEL)
        .filter(|p| !has_noise_ancestor(p))
        .map(|p| normalize_text(&visible_text(p), usize::MAX))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}
