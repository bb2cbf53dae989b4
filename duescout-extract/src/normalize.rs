//! Description cleanup and breadcrumb reconstruction.
//!
//! Candidate text arrives as a flat list of lines mixing page chrome,
//! course context and the assignment itself. [`TextCleaner`] removes
//! boilerplate lines using an ordered, replaceable [`NoiseRules`] set,
//! collapses repeated lines, and rebuilds a `Course > Unit > Assignment`
//! breadcrumb followed by the remaining detail lines.

use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use crate::error::{ExtractError, Result};

/// Separator between breadcrumb levels.
pub const HIERARCHY_SEPARATOR: &str = " > ";

/// Texts too short for hierarchy reconstruction are returned verbatim.
const MIN_LINES_FOR_OUTLINE: usize = 3;

static PERSON_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][a-z]+ [A-Z][a-z]+$").expect("person name regex must be valid")
});

static SECTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:.*\s)?(?:class|section|period|block)\s*[:#-]?\s*[a-z0-9]{1,3}$")
        .expect("section regex must be valid")
});

static UNIT_OR_WEEK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:unit|week)\s+\d+\b").expect("unit regex must be valid")
});

static WEEKDAY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)$")
        .expect("weekday regex must be valid")
});

/// Navigation labels and vendor chrome, compared after lowercasing and
/// removing everything but letters and digits.
const CHROME_LABELS: &[&str] = &[
    // navigation
    "skip to content",
    "skip to main content",
    "skip navigation",
    "toggle navigation",
    "main menu",
    "menu",
    "home",
    "dashboard",
    "courses",
    "calendar",
    "inbox",
    "history",
    "help",
    "account",
    "search",
    "notifications",
    "settings",
    "log out",
    "sign out",
    "back",
    "next",
    "previous",
    "more",
    "show more",
    "show less",
    "view all",
    "expand all",
    "collapse all",
    "open in new tab",
    "open in new window",
    // vendor chrome
    "powered by instructure",
    "powered by canvas",
    "google classroom",
    "classroom",
    "stream",
    "classwork",
    "people",
    "grades",
    "your work",
    "class comments",
    "add class comment",
    "private comments",
    "add private comment",
    "turned in",
    "assigned",
    "missing",
    "mark as done",
    "view submission",
    "submission details",
    "not submitted",
    "rubric",
    "privacy policy",
    "terms of service",
    "cookie notice",
    "accessibility",
];

static COPYRIGHT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:©|\(c\)|copyright\b)|all rights reserved")
        .expect("copyright regex must be valid")
});

static SHORT_NUMBER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,3}$").expect("short number regex must be valid")
});

static POINTS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\d+(?:\.\d+)?\s*(?:/\s*\d+\s*)?(?:points?|pts)(?:\s+possible)?$")
        .expect("points regex must be valid")
});

/// A predicate identifying one kind of boilerplate line.
///
/// Any `Fn(&str) -> bool` closure is a rule.
pub trait LineRule: Send + Sync {
    /// Whether `line` (already trimmed, never empty) is boilerplate.
    fn matches(&self, line: &str) -> bool;
}

impl<F> LineRule for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn matches(&self, line: &str) -> bool {
        self(line)
    }
}

/// Matches lines against a regular expression.
#[derive(Debug, Clone)]
pub struct PatternRule(Regex);

impl PatternRule {
    /// Compiles `pattern` into a rule.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Pattern`] if `pattern` is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self)
            .map_err(|e| ExtractError::Pattern(format!("{pattern}: {e}")))
    }
}

impl LineRule for PatternRule {
    fn matches(&self, line: &str) -> bool {
        self.0.is_match(line)
    }
}

/// Matches whole-line labels ignoring case, spacing and punctuation, so
/// "Skip To Content", "skip-to-content" and "SkipToContent" are the same.
#[derive(Debug, Clone)]
pub struct LabelRule {
    labels: HashSet<String>,
}

impl LabelRule {
    /// Rule matching any of `labels`.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            labels: labels.into_iter().map(|l| compact(l.as_ref())).collect(),
        }
    }
}

impl LineRule for LabelRule {
    fn matches(&self, line: &str) -> bool {
        self.labels.contains(&compact(line))
    }
}

fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Ordered set of boilerplate predicates; a line matching any rule is
/// dropped.
pub struct NoiseRules {
    rules: Vec<Box<dyn LineRule>>,
}

impl NoiseRules {
    /// A rule set that drops nothing.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The built-in rules: navigation and vendor chrome labels, copyright
    /// lines, standalone numbers of up to three digits, and point tallies.
    pub fn standard() -> Self {
        let mut rules = Self::empty();
        rules.push(LabelRule::new(CHROME_LABELS));
        rules.push(|line: &str| COPYRIGHT_LINE.is_match(line));
        rules.push(|line: &str| SHORT_NUMBER_LINE.is_match(line));
        rules.push(|line: &str| POINTS_LINE.is_match(line));
        rules
    }

    /// The built-in rules followed by one [`PatternRule`] per entry of
    /// `patterns`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Pattern`] for the first pattern that does not
    /// compile.
    pub fn standard_with_patterns(patterns: &[String]) -> Result<Self> {
        let mut rules = Self::standard();
        for pattern in patterns {
            rules.push(PatternRule::new(pattern)?);
        }
        Ok(rules)
    }

    /// Appends a rule; rules are consulted in insertion order.
    pub fn push(&mut self, rule: impl LineRule + 'static) {
        self.rules.push(Box::new(rule));
    }

    /// Number of rules in the set.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether any rule flags `line` as boilerplate.
    pub fn is_noise(&self, line: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(line))
    }
}

impl Default for NoiseRules {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for NoiseRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseRules")
            .field("rules", &self.rules.len())
            .finish()
    }
}

/// A cleaned description split into its breadcrumb and detail lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    /// Course/section, unit/week and finally the assignment line.
    pub hierarchy: Vec<String>,
    /// Everything else, in original order.
    pub details: Vec<String>,
}

impl Outline {
    /// The breadcrumb as one line, e.g. `Section B > Week 3 > Essay Draft`.
    pub fn breadcrumb(&self) -> String {
        self.hierarchy.join(HIERARCHY_SEPARATOR)
    }

    /// Breadcrumb first, then a blank line and the details.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.hierarchy.is_empty() {
            out.push_str(&self.breadcrumb());
        }
        if !self.details.is_empty() {
            out.push_str("\n\n");
            out.push_str(&self.details.join("\n"));
        }
        out.trim().to_owned()
    }
}

/// Strips boilerplate from candidate text and rebuilds its hierarchy.
#[derive(Debug, Default)]
pub struct TextCleaner {
    rules: NoiseRules,
}

impl TextCleaner {
    /// Cleaner using `rules` for boilerplate detection.
    pub fn new(rules: NoiseRules) -> Self {
        Self { rules }
    }

    /// The active rule set.
    pub fn rules(&self) -> &NoiseRules {
        &self.rules
    }

    /// Cleans `text` into its rendered description.
    pub fn clean(&self, text: &str) -> String {
        self.outline(text).render()
    }

    /// Cleans `text` into an [`Outline`].
    ///
    /// Inputs that keep fewer than three lines after filtering come back
    /// as details only, in their original order.
    pub fn outline(&self, text: &str) -> Outline {
        let lines = self.meaningful_lines(text);
        if lines.len() < MIN_LINES_FOR_OUTLINE {
            return Outline {
                hierarchy: Vec::new(),
                details: lines,
            };
        }
        classify(lines)
    }

    /// Non-empty, non-boilerplate lines with consecutive repeats collapsed.
    fn meaningful_lines(&self, text: &str) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        for line in text.lines().map(str::trim) {
            if line.is_empty() || self.rules.is_noise(line) {
                continue;
            }
            if lines.last().is_some_and(|prev| prev == line) {
                continue;
            }
            lines.push(line.to_owned());
        }
        lines
    }
}

fn is_context_line(line: &str) -> bool {
    SECTION_LINE.is_match(line) || UNIT_OR_WEEK_LINE.is_match(line) || WEEKDAY_LINE.is_match(line)
}

fn classify(lines: Vec<String>) -> Outline {
    let mut outline = Outline::default();
    let mut assignment_found = false;

    for line in lines {
        let assignment_slot = !assignment_found && !outline.hierarchy.is_empty();

        if PERSON_NAME.is_match(&line) && !assignment_slot {
            continue;
        }
        if !assignment_found && is_context_line(&line) {
            outline.hierarchy.push(line);
        } else if assignment_slot {
            outline.hierarchy.push(line);
            assignment_found = true;
        } else {
            outline.details.push(line);
        }
    }

    outline
}
