//! Core value types passed between the extraction stages.

use chrono::{NaiveDate, NaiveTime};
use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One unit of visible text considered for extraction.
///
/// Borrows its source element from the page snapshot, so a block cannot
/// outlive the scrape pass that produced it.
#[derive(Clone)]
pub struct TextBlock<'a> {
    /// The element whose flattened visible text is `text`.
    pub source: ElementRef<'a>,
    /// Trimmed, flattened visible text. Lines are separated by `\n`.
    pub text: String,
}

impl fmt::Debug for TextBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBlock")
            .field("source", &self.source.value().name())
            .field("text", &self.text)
            .finish()
    }
}

/// A fully resolved calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParsedDate {
    /// Full Gregorian year.
    pub year: i32,
    /// Zero-based month (0 = January, 11 = December).
    pub month: u32,
    /// Day of month, 1-based.
    pub day: u32,
}

impl ParsedDate {
    /// Builds a date from a `NaiveDate`.
    pub fn from_naive(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month0(),
            day: date.day(),
        }
    }

    /// Returns the equivalent `NaiveDate`, or `None` if the components do
    /// not name a real day.
    pub fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, self.day)
    }
}

/// A time of day on the 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParsedTime {
    /// Hour, 0-23.
    pub hours: u32,
    /// Minute, 0-59.
    pub minutes: u32,
}

impl ParsedTime {
    /// Returns the equivalent `NaiveTime`.
    pub fn to_naive(self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hours, self.minutes, 0)
    }
}

/// A task extracted from a page.
///
/// Serialises with camelCase keys (`title`, `dueDate`, `raw`), which is the
/// record shape handed to the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedTask {
    /// Best human-readable title for the task.
    pub title: String,
    /// Due instant as an ISO-8601 UTC timestamp.
    pub due_date: String,
    /// Cleaned description text with the reconstructed breadcrumb first.
    pub raw: String,
}

impl ScrapedTask {
    /// The `(title, dueDate)` pair that identifies a task within one pass.
    pub fn dedup_key(&self) -> (&str, &str) {
        (&self.title, &self.due_date)
    }
}
