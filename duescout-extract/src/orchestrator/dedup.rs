//! Task deduplication by `(title, dueDate)`.
//!
//! Nested page containers frequently render the same assignment several
//! times. Two records with the same title and due instant are treated as
//! one task even if their descriptions differ; the first one seen wins.

use std::collections::HashSet;

use crate::types::ScrapedTask;

/// Removes tasks whose `(title, due_date)` pair was already seen.
///
/// Order of the surviving tasks is the input order.
pub fn deduplicate(tasks: Vec<ScrapedTask>) -> Vec<ScrapedTask> {
    let keep: Vec<bool> = {
        let mut seen = HashSet::with_capacity(tasks.len());
        tasks.iter().map(|task| seen.insert(task.dedup_key())).collect()
    };
    tasks
        .into_iter()
        .zip(keep)
        .filter_map(|(task, first)| first.then_some(task))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str, due: &str, raw: &str) -> ScrapedTask {
        ScrapedTask {
            title: title.into(),
            due_date: due.into(),
            raw: raw.into(),
        }
    }

    #[test]
    fn first_occurrence_kept() {
        let out = deduplicate(vec![
            task("Essay", "2026-01-26T05:00:00.000Z", "outer"),
            task("Essay", "2026-01-26T05:00:00.000Z", "inner"),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].raw, "outer");
    }

    #[test]
    fn different_due_date_survives() {
        let out = deduplicate(vec![
            task("Essay", "2026-01-26T05:00:00.000Z", "a"),
            task("Essay", "2026-01-26T05:00:00.000Z", "b"),
            task("Essay", "2026-01-27T05:00:00.000Z", "c"),
        ]);
        let raws: Vec<_> = out.iter().map(|t| t.raw.as_str()).collect();
        assert_eq!(raws, vec!["a", "c"]);
    }

    #[test]
    fn different_title_survives() {
        let out = deduplicate(vec![
            task("Essay", "2026-01-26T05:00:00.000Z", "a"),
            task("Quiz", "2026-01-26T05:00:00.000Z", "b"),
        ]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn order_preserved() {
        let out = deduplicate(vec![
            task("C", "3", ""),
            task("A", "1", ""),
            task("C", "3", ""),
            task("B", "2", ""),
        ]);
        let titles: Vec<_> = out.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }

    #[test]
    fn survivors_have_distinct_dedup_keys() {
        let out = deduplicate(vec![
            task("Essay", "1", "a"),
            task("Essay", "2", "b"),
            task("Quiz", "1", "c"),
            task("Essay", "1", "d"),
            task("Quiz", "1", "e"),
        ]);
        let keys: Vec<_> = out.iter().map(ScrapedTask::dedup_key).collect();
        assert_eq!(keys, vec![("Essay", "1"), ("Essay", "2"), ("Quiz", "1")]);
        let raws: Vec<_> = out.iter().map(|t| t.raw.as_str()).collect();
        assert_eq!(raws, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_input() {
        assert!(deduplicate(Vec::new()).is_empty());
    }
}
