//! Extraction orchestrator: collect, gate, parse, title, clean, dedup.
//!
//! Composes the extraction stages into one synchronous pass over a page
//! snapshot and returns the distinct tasks in collection order.

pub mod dedup;
pub mod scrape;
