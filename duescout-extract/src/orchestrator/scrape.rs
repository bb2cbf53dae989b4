//! The end-to-end scrape pass.

use std::fmt;

use chrono::{DateTime, Local, TimeZone};

use crate::collector::collect_blocks;
use crate::config::ExtractConfig;
use crate::datetime::parse_date_time;
use crate::document::{AttributeVisibility, Page, VisibilityOracle};
use crate::error::Result;
use crate::gate::KeywordGate;
use crate::normalize::{NoiseRules, TextCleaner};
use crate::title::{resolve_title, PageContext};
use crate::types::ScrapedTask;

use super::dedup::deduplicate;

/// Counters for one scrape pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeStats {
    /// Candidate blocks produced by the collector.
    pub blocks: usize,
    /// Blocks that passed the keyword gate.
    pub gated: usize,
    /// Gated blocks with a parseable due date.
    pub parsed: usize,
    /// Tasks dropped as `(title, dueDate)` duplicates.
    pub duplicates: usize,
}

/// A configured extraction engine.
///
/// Holds only immutable configuration and compiled rule sets, so one
/// instance can be shared across threads and reused for any number of
/// pages.
pub struct Extractor {
    config: ExtractConfig,
    gate: KeywordGate,
    cleaner: TextCleaner,
    oracle: Box<dyn VisibilityOracle>,
}

impl Extractor {
    /// Builds an extractor from `config`, using [`AttributeVisibility`].
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Config`](crate::ExtractError::Config) if the
    /// configuration is invalid, or
    /// [`ExtractError::Pattern`](crate::ExtractError::Pattern) if an extra
    /// keyword or noise pattern does not compile.
    pub fn new(config: ExtractConfig) -> Result<Self> {
        config.validate()?;
        let gate = KeywordGate::with_extra_phrases(&config.extra_keywords)?;
        let rules = NoiseRules::standard_with_patterns(&config.extra_noise_patterns)?;
        Ok(Self {
            config,
            gate,
            cleaner: TextCleaner::new(rules),
            oracle: Box::new(AttributeVisibility),
        })
    }

    /// Replaces the visibility oracle.
    pub fn with_oracle(mut self, oracle: Box<dyn VisibilityOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    /// Replaces the text cleaner, e.g. one built from custom [`NoiseRules`].
    pub fn with_cleaner(mut self, cleaner: TextCleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extracts the distinct tasks on `page`, resolving relative and
    /// year-less dates against `now` and interpreting them in its zone.
    pub fn scrape<Tz: TimeZone>(&self, page: &Page, now: &DateTime<Tz>) -> Vec<ScrapedTask> {
        self.scrape_with_stats(page, now).0
    }

    /// Like [`scrape`](Self::scrape) using the local clock and zone.
    pub fn scrape_now(&self, page: &Page) -> Vec<ScrapedTask> {
        self.scrape(page, &Local::now())
    }

    /// Like [`scrape`](Self::scrape), also returning the pass counters.
    pub fn scrape_with_stats<Tz: TimeZone>(
        &self,
        page: &Page,
        now: &DateTime<Tz>,
    ) -> (Vec<ScrapedTask>, ScrapeStats) {
        let context = PageContext::from_page(page);
        let mut stats = ScrapeStats::default();
        let mut tasks = Vec::new();

        for block in collect_blocks(page, &self.config, self.oracle.as_ref()) {
            stats.blocks += 1;
            if !self.gate.is_due_candidate(&block.text) {
                continue;
            }
            stats.gated += 1;

            let Some(due_date) = parse_date_time(&block.text, now) else {
                tracing::trace!(text = %block.text, "gated block without a parseable date");
                continue;
            };
            stats.parsed += 1;

            tasks.push(ScrapedTask {
                title: resolve_title(&block, &context, &self.config.fallback_title),
                due_date,
                raw: self.cleaner.clean(&block.text),
            });
        }

        let before = tasks.len();
        let tasks = deduplicate(tasks);
        stats.duplicates = before - tasks.len();

        tracing::debug!(
            blocks = stats.blocks,
            gated = stats.gated,
            parsed = stats.parsed,
            duplicates = stats.duplicates,
            tasks = tasks.len(),
            "scrape pass complete"
        );
        (tasks, stats)
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("config", &self.config)
            .field("gate", &self.gate)
            .field("cleaner", &self.cleaner)
            .finish_non_exhaustive()
    }
}
