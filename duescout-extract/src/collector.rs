//! Candidate collection: distinct visible text blocks within a length window.
//!
//! Walks the page in document order. Hidden elements and non-content
//! containers are pruned together with their subtrees. Nested containers
//! often repeat an ancestor's full text, so exact-text repeats are
//! suppressed and only the first occurrence is yielded.

use std::collections::HashSet;

use scraper::ElementRef;

use crate::config::ExtractConfig;
use crate::document::{is_non_content, visible_text, Page, VisibilityOracle};
use crate::types::TextBlock;

/// Lazily yields the candidate [`TextBlock`]s of `page`.
///
/// The iterator is finite and deterministic for a given snapshot, oracle
/// and configuration.
pub fn collect_blocks<'a>(
    page: &'a Page,
    config: &'a ExtractConfig,
    oracle: &'a dyn VisibilityOracle,
) -> Blocks<'a> {
    Blocks {
        stack: vec![page.root()],
        seen: HashSet::new(),
        config,
        oracle,
    }
}

/// Iterator returned by [`collect_blocks`].
pub struct Blocks<'a> {
    stack: Vec<ElementRef<'a>>,
    seen: HashSet<String>,
    config: &'a ExtractConfig,
    oracle: &'a dyn VisibilityOracle,
}

impl<'a> Blocks<'a> {
    /// Next element in pre-order whose subtree is eligible at all.
    fn next_element(&mut self) -> Option<ElementRef<'a>> {
        while let Some(element) = self.stack.pop() {
            if is_non_content(element) || !self.oracle.is_visible(element) {
                continue;
            }
            // Reverse so the first child is popped next.
            let children: Vec<_> = element.children().filter_map(ElementRef::wrap).collect();
            self.stack.extend(children.into_iter().rev());
            return Some(element);
        }
        None
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = TextBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(element) = self.next_element() {
            let text = visible_text(element, self.oracle);
            let len = text.chars().count();
            if !self.config.accepts_len(len) {
                tracing::trace!(
                    tag = element.value().name(),
                    len,
                    "candidate outside length window"
                );
                continue;
            }
            if !self.seen.insert(text.clone()) {
                continue;
            }
            return Some(TextBlock {
                source: element,
                text,
            });
        }
        None
    }
}
