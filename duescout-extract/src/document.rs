//! The rendered-document boundary: page snapshot, visibility, visible text.
//!
//! The engine never renders anything itself. A [`Page`] is an immutable
//! parsed snapshot, and whether an element is shown is answered by a
//! [`VisibilityOracle`]. Hosts that have real layout information (a
//! browser, a headless renderer) can plug in their own oracle; the default
//! [`AttributeVisibility`] reads the usual hiding attributes and inline
//! styles.

use scraper::{ElementRef, Html, Node};

/// Tags whose content is never page text.
const NON_CONTENT_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "head", "meta", "link", "title", "svg", "canvas",
    "iframe", "object",
];

/// Tags that start a new line when flattened to text.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "dd",
    "details",
    "dialog",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

/// An immutable parsed HTML snapshot.
pub struct Page {
    html: Html,
}

impl Page {
    /// Parses a full HTML document.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Wraps an already-parsed document.
    pub fn from_html(html: Html) -> Self {
        Self { html }
    }

    /// The underlying parsed document.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// The `<html>` element.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }
}

/// Answers whether an element is currently shown.
///
/// Implementations judge the element on its own; hiding is inherited by
/// the callers, which never descend into a hidden element.
pub trait VisibilityOracle: Send + Sync {
    /// Whether `element` itself is visible.
    fn is_visible(&self, element: ElementRef<'_>) -> bool;
}

/// Visibility from markup alone: `hidden`, `aria-hidden="true"`,
/// `type="hidden"`, and inline `display: none` / `visibility: hidden`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeVisibility;

impl VisibilityOracle for AttributeVisibility {
    fn is_visible(&self, element: ElementRef<'_>) -> bool {
        let el = element.value();
        if el.attr("hidden").is_some() {
            return false;
        }
        if el
            .attr("aria-hidden")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
        {
            return false;
        }
        if el
            .attr("type")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("hidden"))
        {
            return false;
        }
        match el.attr("style") {
            Some(style) => !style_hides(style),
            None => true,
        }
    }
}

/// Every element is visible. Useful when the snapshot was already pruned
/// by a renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllVisible;

impl VisibilityOracle for AllVisible {
    fn is_visible(&self, _element: ElementRef<'_>) -> bool {
        true
    }
}

fn style_hides(style: &str) -> bool {
    style.split(';').any(|decl| {
        let Some((prop, value)) = decl.split_once(':') else {
            return false;
        };
        let prop = prop.trim().to_ascii_lowercase();
        let value = value
            .trim()
            .trim_end_matches("!important")
            .trim()
            .to_ascii_lowercase();
        (prop == "display" && value == "none") || (prop == "visibility" && value == "hidden")
    })
}

/// Whether `element` is a non-content container (script, style, metadata,
/// vector graphics, embedded frames).
pub fn is_non_content(element: ElementRef<'_>) -> bool {
    NON_CONTENT_TAGS.contains(&element.value().name())
}

fn is_block(name: &str) -> bool {
    BLOCK_TAGS.contains(&name)
}

/// Flattens the visible text of `element` the way a browser renders it:
/// whitespace runs collapse to one space, block elements and `<br>` start
/// new lines, lines are trimmed, and empty lines are dropped.
///
/// Hidden and non-content descendants contribute nothing.
pub fn visible_text(element: ElementRef<'_>, oracle: &dyn VisibilityOracle) -> String {
    let mut buf = String::new();
    push_text(element, oracle, &mut buf);

    buf.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_text(element: ElementRef<'_>, oracle: &dyn VisibilityOracle, buf: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_collapsed(text, buf),
            Node::Element(el) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                if is_non_content(child_el) || !oracle.is_visible(child_el) {
                    continue;
                }
                let name = el.name();
                if name == "br" {
                    buf.push('\n');
                    continue;
                }
                let block = is_block(name);
                if block {
                    buf.push('\n');
                }
                push_text(child_el, oracle, buf);
                if block {
                    buf.push('\n');
                }
            }
            _ => {}
        }
    }
}

fn push_collapsed(text: &str, buf: &mut String) {
    let mut prev_space = buf.ends_with(' ') || buf.ends_with('\n') || buf.is_empty();
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                buf.push(' ');
                prev_space = true;
            }
        } else {
            buf.push(ch);
            prev_space = false;
        }
    }
}

/// Plain text content of `element` with whitespace collapsed to single
/// spaces. Visibility is not consulted; used for headings and titles.
pub fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
