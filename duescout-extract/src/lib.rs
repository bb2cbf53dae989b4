//! # duescout-extract
//!
//! Heuristic extraction of assignment due dates from rendered course pages.
//!
//! Given a parsed HTML snapshot, the engine finds text blocks that talk
//! about a deadline, parses the date and optional time they mention, picks
//! a human-readable title from nearby headings, and cleans the surrounding
//! text into a short description with a `Course > Unit > Assignment`
//! breadcrumb.
//!
//! ## Design
//!
//! - Collects distinct visible text blocks in document order within a
//!   length window
//! - A keyword gate rejects blocks without deadline vocabulary before any
//!   date parsing happens
//! - Dates follow a fixed precedence (ISO, month-day-year, month-day,
//!   today/tomorrow); times prefer `at`/`until`/`by` phrases
//! - Titles prefer page-wide headings, then the nearest section heading
//! - Boilerplate removal is an ordered, replaceable rule set
//! - Tasks are deduplicated by `(title, dueDate)`
//!
//! Scraping never fails and has no side effects; the worst outcome is an
//! empty list. Only building an [`Extractor`] from configuration can fail.

pub mod collector;
pub mod config;
pub mod datetime;
pub mod document;
pub mod error;
pub mod gate;
pub mod normalize;
pub mod orchestrator;
pub mod title;
pub mod types;

pub use config::ExtractConfig;
pub use document::{AllVisible, AttributeVisibility, Page, VisibilityOracle};
pub use error::{ExtractError, Result};
pub use gate::{is_due_candidate, KeywordGate};
pub use normalize::{NoiseRules, TextCleaner};
pub use orchestrator::scrape::{Extractor, ScrapeStats};
pub use title::PageContext;
pub use types::{ParsedDate, ParsedTime, ScrapedTask, TextBlock};

/// Extract the due tasks from an HTML document.
///
/// Parses `html`, runs one scrape pass with `config` against the local
/// clock and time zone, and returns the distinct tasks in document order.
///
/// # Errors
///
/// Returns [`ExtractError`] if `config` is invalid. An HTML document with
/// no recognisable deadlines is not an error and yields an empty list.
///
/// # Examples
///
/// ```no_run
/// # fn example() -> duescout_extract::Result<()> {
/// let html = "<h1>Essay Draft</h1><p>Due Jan 26, 2026 at 11:59 pm</p>";
/// let tasks = duescout_extract::scrape_html(html, &duescout_extract::ExtractConfig::default())?;
/// for task in &tasks {
///     println!("{}: {}", task.title, task.due_date);
/// }
/// # Ok(())
/// # }
/// ```
pub fn scrape_html(html: &str, config: &ExtractConfig) -> Result<Vec<ScrapedTask>> {
    let extractor = Extractor::new(config.clone())?;
    Ok(extractor.scrape_now(&Page::parse(html)))
}
