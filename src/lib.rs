//! duescout: find assignment due dates on course pages.
//!
//! The extraction engine lives in the `duescout-extract` crate. This crate
//! is the host around it:
//! - **Config**: TOML configuration for extraction and submission
//! - **Scan**: read a saved page and run one scrape pass
//! - **Submission**: turn tasks into JSON bodies and POST them to a task
//!   tracker

pub mod config;
pub mod error;
pub mod submission;

use std::path::Path;

use chrono::{DateTime, TimeZone};
use duescout_extract::{ExtractConfig, Extractor, Page, ScrapedTask};

pub use config::{ScoutConfig, SubmitConfig};
pub use error::{Result, ScoutError};
pub use submission::{SubmitReport, Submitter, TaskSubmission, build_submissions};

/// Reads the HTML file at `path` and extracts its tasks, resolving dates
/// against `now`.
///
/// # Errors
///
/// Returns [`ScoutError::Io`] if the file cannot be read and
/// [`ScoutError::Extract`] if `config` is invalid.
pub fn scan_file<Tz: TimeZone>(
    path: &Path,
    config: &ExtractConfig,
    now: &DateTime<Tz>,
) -> Result<Vec<ScrapedTask>> {
    let html = std::fs::read_to_string(path)?;
    let extractor = Extractor::new(config.clone())?;
    let tasks = extractor.scrape(&Page::parse(&html), now);
    tracing::info!(path = %path.display(), tasks = tasks.len(), "scanned page");
    Ok(tasks)
}
