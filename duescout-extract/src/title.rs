//! Title resolution for extracted tasks.
//!
//! Page-wide headings win over local context: LMS assignment pages put the
//! assignment name in the top heading, while the due line sits deep in a
//! sidebar. Only when the page has no top-level heading do we walk up from
//! the candidate looking for the nearest section heading.

use scraper::{ElementRef, Html, Selector};

use crate::document::{collapsed_text, Page};
use crate::types::TextBlock;

const SECTION_HEADINGS: &[&str] = &["h1", "h2", "h3", "h4"];

/// Page-wide title sources, captured once per scrape pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    /// Text of the first `<h1>`, whitespace-collapsed.
    pub primary_heading: Option<String>,
    /// Text of the first `<h2>`, whitespace-collapsed.
    pub secondary_heading: Option<String>,
    /// Text of the document `<title>`.
    pub title: Option<String>,
}

impl PageContext {
    /// Reads the page-wide headings and title from `page`.
    pub fn from_page(page: &Page) -> Self {
        let html = page.html();
        Self {
            primary_heading: first_text(html, "h1"),
            secondary_heading: first_text(html, "h2"),
            title: first_text(html, "title"),
        }
    }
}

/// Text of the first element matching `css`, if it is non-empty.
fn first_text(html: &Html, css: &str) -> Option<String> {
    let Ok(selector) = Selector::parse(css) else {
        return None;
    };
    html.select(&selector)
        .next()
        .map(collapsed_text)
        .filter(|text| !text.is_empty())
}

/// Best title for `block`; never empty as long as `fallback` is not.
///
/// Order: page `<h1>`, page `<h2>`, the nearest heading found walking up
/// from the block's element, the document `<title>`, then `fallback`.
pub fn resolve_title(block: &TextBlock<'_>, context: &PageContext, fallback: &str) -> String {
    context
        .primary_heading
        .clone()
        .or_else(|| context.secondary_heading.clone())
        .or_else(|| nearest_heading(block.source))
        .or_else(|| context.title.clone())
        .unwrap_or_else(|| fallback.to_owned())
}

/// Walks from `element` (itself first) to the root. At each level the
/// first non-empty `h1`-`h4` inside the node wins, then an immediately
/// preceding sibling heading.
fn nearest_heading(element: ElementRef<'_>) -> Option<String> {
    let mut current = Some(element);
    while let Some(node) = current {
        if let Some(text) = descendant_heading(node).or_else(|| preceding_heading(node)) {
            return Some(text);
        }
        current = node.parent().and_then(ElementRef::wrap);
    }
    None
}

fn is_section_heading(element: ElementRef<'_>) -> bool {
    SECTION_HEADINGS.contains(&element.value().name())
}

fn descendant_heading(element: ElementRef<'_>) -> Option<String> {
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| is_section_heading(*el))
        .map(collapsed_text)
        .find(|text| !text.is_empty())
}

fn preceding_heading(element: ElementRef<'_>) -> Option<String> {
    element
        .prev_siblings()
        .find_map(ElementRef::wrap)
        .filter(|el| is_section_heading(*el))
        .map(collapsed_text)
        .filter(|text| !text.is_empty())
}
