//! Date and time-of-day extraction from free text.
//!
//! Dates are located by a fixed precedence of patterns, most specific first:
//!
//! 1. ISO numeric `YYYY-MM-DD`
//! 2. month name, day and year (`Mon, Jan 26th, 2026`)
//! 3. month name and day without a year (`Jan 26`), year inferred
//! 4. the relative keywords `today` / `tomorrow`
//!
//! The first pattern that yields a real calendar date wins. Only the first
//! textual match of each pattern is considered; if its month token is not a
//! month or the day does not exist, the next pattern is tried.
//!
//! A time of day is only looked for once a date has been found. A time
//! directly after `at`, `until` or `by` is preferred; otherwise the first
//! time carrying an am/pm marker, then the first `HH:MM` reading.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, SecondsFormat, TimeDelta, TimeZone, Utc};
use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::types::{ParsedDate, ParsedTime};

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})(?:T|\b)").expect("ISO date regex must be valid")
});

static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?\s+)?((?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*)[.\s]+(\d{1,2})(?:st|nd|rd|th)?[.,\s]+(\d{4})\b",
    )
    .expect("month-day-year regex must be valid")
});

static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b((?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*)[.\s]+(\d{1,2})(?:st|nd|rd|th)?\b",
    )
    .expect("month-day regex must be valid")
});

static RELATIVE_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(today|tomorrow)\b").expect("relative day regex must be valid")
});

static PROXIMITY_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:at|until|by)\s+(\d{1,2})(?::(\d{2}))?(?:\s*([ap])\.?m\b\.?)?")
        .expect("proximity time regex must be valid")
});

static ANY_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\b|(?-i:T))(\d{1,2})(?::(\d{2}))?(?:\s*([ap])\.?m\b\.?)?")
        .expect("time regex must be valid")
});

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// A date with an optional time of day, as found in one block of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTimeMatch {
    /// The resolved calendar date.
    pub date: ParsedDate,
    /// The time of day, if the text carried a usable one.
    pub time: Option<ParsedTime>,
}

/// Extracts a due instant from `text` and renders it as an ISO-8601 UTC
/// timestamp with millisecond precision.
///
/// Calendar components are interpreted in the time zone of `now`; `now`
/// also anchors year inference and the relative keywords. A local time
/// skipped by a daylight-saving jump is moved forward one hour; an
/// ambiguous one takes the earlier instant. Returns `None` when no date
/// pattern matches.
pub fn parse_date_time<Tz: TimeZone>(text: &str, now: &DateTime<Tz>) -> Option<String> {
    let found = parse_components(text, now.date_naive())?;
    let date = found.date.to_naive()?;
    let time = match found.time {
        Some(time) => time.to_naive()?,
        None => NaiveTime::from_hms_opt(0, 0, 0)?,
    };

    let zone = now.timezone();
    let naive = date.and_time(time);
    let local = zone.from_local_datetime(&naive).earliest().or_else(|| {
        zone.from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest()
    })?;
    Some(
        local
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

/// [`parse_date_time`] against the system clock and local time zone.
pub fn parse_date_time_local(text: &str) -> Option<String> {
    parse_date_time(text, &Local::now())
}

/// Finds the date (and, if present, the time of day) described by `text`.
///
/// `today` is the current local calendar date.
pub fn parse_components(text: &str, today: NaiveDate) -> Option<DateTimeMatch> {
    let date = parse_date(text, today)?;
    Some(DateTimeMatch {
        date,
        time: parse_time(text),
    })
}

/// Finds the calendar date described by `text` using the fixed precedence.
pub fn parse_date(text: &str, today: NaiveDate) -> Option<ParsedDate> {
    iso_date(text)
        .or_else(|| month_day_year(text))
        .or_else(|| month_day(text, today))
        .or_else(|| relative_day(text, today))
        .map(ParsedDate::from_naive)
}

fn iso_date(text: &str) -> Option<NaiveDate> {
    let caps = ISO_DATE.captures(text)?;
    let year = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let day = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_day_year(text: &str) -> Option<NaiveDate> {
    let caps = MONTH_DAY_YEAR.captures(text)?;
    let month = month_from_token(&caps[1])?;
    let day = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_day(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    use chrono::Datelike;

    let caps = MONTH_DAY.captures(text)?;
    let month = month_from_token(&caps[1])?;
    let day = caps[2].parse().ok()?;
    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if this_year < today {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    } else {
        Some(this_year)
    }
}

fn relative_day(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = RELATIVE_DAY.captures(text)?;
    if caps[1].eq_ignore_ascii_case("tomorrow") {
        today.succ_opt()
    } else {
        Some(today)
    }
}

/// Maps a month token ("Jan", "sept", "December") to its 1-based number.
///
/// The token must be an abbreviation of the month name of at least three
/// letters; "Sept" is also accepted. Anything else ("Marching", "Mayor")
/// is not a month.
fn month_from_token(token: &str) -> Option<u32> {
    let token = token.to_ascii_lowercase();
    if token == "sept" {
        return Some(9);
    }
    if token.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|name| name.starts_with(&token))
        .map(|idx| idx as u32 + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridian {
    Am,
    Pm,
}

#[derive(Debug, Clone, Copy)]
struct TimeCandidate {
    hour: u32,
    minutes: Option<u32>,
    meridian: Option<Meridian>,
}

impl TimeCandidate {
    fn from_captures(text: &str, caps: &Captures<'_>) -> Option<Self> {
        let hour_match = caps.get(1)?;
        let minute_match = caps.get(2);

        // "2026" must not read as hour 20.
        let digits_end = minute_match.map_or(hour_match.end(), |m| m.end());
        if text[digits_end..].starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }

        let meridian = caps.get(3).map(|m| {
            if m.as_str().eq_ignore_ascii_case("p") {
                Meridian::Pm
            } else {
                Meridian::Am
            }
        });

        Some(Self {
            hour: hour_match.as_str().parse().ok()?,
            minutes: minute_match.and_then(|m| m.as_str().parse().ok()),
            meridian,
        })
    }

    /// Hours above 23 are never times; a bare hour is usually some other
    /// number on the page.
    fn is_plausible(&self) -> bool {
        self.hour <= 23
            && self.minutes.is_none_or(|m| m <= 59)
            && (self.minutes.is_some() || self.meridian.is_some())
    }

    fn normalize(self) -> ParsedTime {
        // Hours past 12 are 24-hour readings even next to "pm".
        let hours = if self.hour > 12 {
            self.hour
        } else {
            match self.meridian {
                Some(Meridian::Pm) if self.hour < 12 => self.hour + 12,
                Some(Meridian::Am) if self.hour == 12 => 0,
                _ => self.hour,
            }
        };
        ParsedTime {
            hours,
            minutes: self.minutes.unwrap_or(0),
        }
    }
}

/// Finds the time of day described by `text`, if any.
pub fn parse_time(text: &str) -> Option<ParsedTime> {
    if let Some(near) = PROXIMITY_TIME
        .captures_iter(text)
        .filter_map(|caps| TimeCandidate::from_captures(text, &caps))
        .find(TimeCandidate::is_plausible)
    {
        return Some(near.normalize());
    }

    let candidates: Vec<TimeCandidate> = ANY_TIME
        .captures_iter(text)
        .filter_map(|caps| TimeCandidate::from_captures(text, &caps))
        .filter(TimeCandidate::is_plausible)
        .collect();

    candidates
        .iter()
        .find(|c| c.meridian.is_some())
        .or_else(|| candidates.iter().find(|c| c.minutes.is_some()))
        .map(|c| c.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .expect("valid test instant")
    }

    fn time(hours: u32, minutes: u32) -> Option<ParsedTime> {
        Some(ParsedTime { hours, minutes })
    }

    // ── Date precedence ─────────────────────────────────────────────────

    #[test]
    fn iso_date_parsed() {
        let parsed = parse_date("Due 2026-04-09", date(2026, 1, 1));
        assert_eq!(parsed.and_then(ParsedDate::to_naive), Some(date(2026, 4, 9)));
    }

    #[test]
    fn iso_date_beats_month_name() {
        let text = "Due Jan 26, 2026 (moved to 2026-02-03)";
        let parsed = parse_date(text, date(2026, 1, 1));
        assert_eq!(parsed.and_then(ParsedDate::to_naive), Some(date(2026, 2, 3)));
    }

    #[test]
    fn month_day_year_parsed() {
        let parsed = parse_date("Due Jan 26, 2026", date(2025, 6, 1));
        assert_eq!(
            parsed,
            Some(ParsedDate {
                year: 2026,
                month: 0,
                day: 26
            })
        );
    }

    #[test]
    fn month_day_year_variants() {
        let today = date(2020, 1, 1);
        for text in [
            "Due Monday, January 26th, 2026",
            "due: Mon. Jan. 26. 2026",
            "Deadline jan 26 2026",
            "closes JANUARY 26TH 2026",
        ] {
            assert_eq!(
                parse_date(text, today).and_then(ParsedDate::to_naive),
                Some(date(2026, 1, 26)),
                "failed for {text:?}"
            );
        }
    }

    #[test]
    fn sept_abbreviation_accepted() {
        let parsed = parse_date("Due Sept 3, 2026", date(2026, 1, 1));
        assert_eq!(parsed.and_then(ParsedDate::to_naive), Some(date(2026, 9, 3)));
    }

    #[test]
    fn iso_date_with_glued_time_beats_month_name() {
        let parsed = parse_date("Due 2026-01-26T09:00 (was Jan 30, 2026)", date(2026, 1, 1));
        assert_eq!(parsed.and_then(ParsedDate::to_naive), Some(date(2026, 1, 26)));
    }

    #[test]
    fn iso_date_followed_by_digit_is_not_a_date() {
        assert_eq!(parse_date("Order 2026-01-265", date(2026, 1, 1)), None);
    }

    #[test]
    fn comma_without_space_before_year() {
        let parsed = parse_date("Due Jan 26,2026", date(2026, 3, 1));
        assert_eq!(parsed.and_then(ParsedDate::to_naive), Some(date(2026, 1, 26)));
    }

    #[test]
    fn period_without_space_after_month() {
        let today = date(2026, 3, 1);
        let parsed = parse_date("Due Jan.26, 2026", today);
        assert_eq!(parsed.and_then(ParsedDate::to_naive), Some(date(2026, 1, 26)));

        let parsed = parse_date("Due Jan.26", today);
        assert_eq!(parsed.and_then(ParsedDate::to_naive), Some(date(2027, 1, 26)));
    }

    #[test]
    fn month_glued_to_day_is_not_a_date() {
        assert_eq!(parse_date("Due Jan26", date(2026, 1, 1)), None);
    }

    #[test]
    fn month_day_without_year_rolls_forward_when_past() {
        let parsed = parse_date("Due Jan 26", date(2026, 3, 1));
        assert_eq!(parsed.and_then(ParsedDate::to_naive), Some(date(2027, 1, 26)));
    }

    #[test]
    fn month_day_without_year_keeps_upcoming_year() {
        let parsed = parse_date("Due Jan 26", date(2025, 12, 1));
        assert_eq!(parsed.and_then(ParsedDate::to_naive), Some(date(2026, 1, 26)));
    }

    #[test]
    fn month_day_today_does_not_roll() {
        let parsed = parse_date("Due Oct 17", date(2026, 10, 17));
        assert_eq!(parsed.and_then(ParsedDate::to_naive), Some(date(2026, 10, 17)));
    }

    #[test]
    fn unrecognized_month_token_falls_through() {
        // "Marching 5, 2026" is not a month; the relative keyword still applies.
        let parsed = parse_date("Marching 5, 2026 band practice due today", date(2026, 5, 1));
        assert_eq!(parsed.and_then(ParsedDate::to_naive), Some(date(2026, 5, 1)));
    }

    #[test]
    fn impossible_day_falls_through() {
        let parsed = parse_date("Due Feb 30, 2026 or tomorrow", date(2026, 2, 1));
        assert_eq!(parsed.and_then(ParsedDate::to_naive), Some(date(2026, 2, 2)));
    }

    #[test]
    fn invalid_iso_date_falls_through() {
        let parsed = parse_date("Ref 2026-13-45, due Mar 3, 2026", date(2026, 1, 1));
        assert_eq!(parsed.and_then(ParsedDate::to_naive), Some(date(2026, 3, 3)));
    }

    #[test]
    fn relative_keywords() {
        let today = date(2026, 12, 31);
        assert_eq!(
            parse_date("Due today", today).and_then(ParsedDate::to_naive),
            Some(today)
        );
        assert_eq!(
            parse_date("Due TOMORROW", today).and_then(ParsedDate::to_naive),
            Some(date(2027, 1, 1))
        );
    }

    #[test]
    fn no_date_returns_none() {
        assert!(parse_date("Due soon, see page 4", date(2026, 1, 1)).is_none());
    }

    // ── Time extraction ─────────────────────────────────────────────────

    #[test]
    fn meridian_pm() {
        assert_eq!(parse_time("5 pm"), time(17, 0));
        assert_eq!(parse_time("5:30 p.m."), time(17, 30));
    }

    #[test]
    fn meridian_am_midnight_and_noon() {
        assert_eq!(parse_time("12:15 am"), time(0, 15));
        assert_eq!(parse_time("12 PM"), time(12, 0));
        assert_eq!(parse_time("9AM"), time(9, 0));
    }

    #[test]
    fn twenty_four_hour_overrides_bogus_meridian() {
        assert_eq!(parse_time("17:00 pm"), time(17, 0));
    }

    #[test]
    fn bare_hour_is_not_a_time() {
        assert_eq!(parse_time("5"), None);
        assert_eq!(parse_time("Question 5 of 12"), None);
    }

    #[test]
    fn hour_above_23_rejected() {
        assert_eq!(parse_time("Score 45:10"), None);
    }

    #[test]
    fn minutes_above_59_rejected() {
        assert_eq!(parse_time("ratio 3:75"), None);
    }

    #[test]
    fn proximity_match_preferred() {
        let text = "Posted 9:15 am. Due Friday at 11:59 pm";
        assert_eq!(parse_time(text), time(23, 59));
    }

    #[test]
    fn meridian_preferred_over_plain_minutes() {
        let text = "Room 10:30 schedule, quiz 3 pm";
        assert_eq!(parse_time(text), time(15, 0));
    }

    #[test]
    fn first_minutes_reading_without_meridian() {
        assert_eq!(parse_time("Closes 14:45, opens 08:00"), time(14, 45));
    }

    #[test]
    fn year_digits_are_not_hours() {
        assert_eq!(parse_time("Due by 2026-01-05"), None);
        assert_eq!(parse_time("Due Jan 26, 2026"), None);
    }

    #[test]
    fn word_starting_with_am_is_not_meridian() {
        assert_eq!(parse_time("Section 5 amendments"), None);
    }

    #[test]
    fn time_glued_to_iso_date() {
        assert_eq!(parse_time("deadline: 2026-01-26T23:59"), time(23, 59));
        assert_eq!(parse_time("Due 2026-01-26T09:00 (was Jan 30, 2026)"), time(9, 0));
    }

    // ── Combined instant ────────────────────────────────────────────────

    #[test]
    fn full_date_time_in_utc() {
        let now = utc(2026, 1, 1, 12, 0);
        assert_eq!(
            parse_date_time("Due Jan 26, 2026 at 5 pm", &now).as_deref(),
            Some("2026-01-26T17:00:00.000Z")
        );
    }

    #[test]
    fn date_only_is_local_midnight() {
        let now = utc(2026, 1, 1, 12, 0);
        assert_eq!(
            parse_date_time("Due 2026-01-26", &now).as_deref(),
            Some("2026-01-26T00:00:00.000Z")
        );
    }

    #[test]
    fn local_zone_interpretation() {
        let tz = FixedOffset::west_opt(5 * 3600).expect("valid offset");
        let now = tz
            .with_ymd_and_hms(2026, 1, 1, 8, 0, 0)
            .single()
            .expect("valid instant");
        assert_eq!(
            parse_date_time("Due Jan 26, 2026 at 5 pm", &now).as_deref(),
            Some("2026-01-26T22:00:00.000Z")
        );
    }

    #[test]
    fn year_rollover_against_now() {
        let now = utc(2026, 3, 1, 9, 0);
        assert_eq!(
            parse_date_time("Due Jan 26", &now).as_deref(),
            Some("2027-01-26T00:00:00.000Z")
        );
    }

    #[test]
    fn tomorrow_with_time() {
        let now = utc(2026, 10, 17, 22, 30);
        assert_eq!(
            parse_date_time("Due tomorrow by 8:00", &now).as_deref(),
            Some("2026-10-18T08:00:00.000Z")
        );
    }

    #[test]
    fn no_date_means_no_timestamp() {
        let now = utc(2026, 1, 1, 0, 0);
        assert!(parse_date_time("Due at 5 pm", &now).is_none());
    }

    #[test]
    fn components_expose_time() {
        let found = parse_components("Due Jan 26, 2026 17:00 pm", date(2026, 1, 1))
            .expect("date found");
        assert_eq!(found.time, time(17, 0));
    }

    #[test]
    fn iso_timestamp_text_yields_instant() {
        let now = utc(2026, 1, 1, 12, 0);
        assert_eq!(
            parse_date_time("Submission deadline: 2026-01-26T23:59", &now).as_deref(),
            Some("2026-01-26T23:59:00.000Z")
        );
    }

    // ── Daylight-saving gap ─────────────────────────────────────────────

    /// UTC-3 until 2026-03-08 03:00 UTC, then UTC-2. Local times from
    /// 00:00 to 01:00 on 2026-03-08 do not exist.
    #[derive(Debug, Clone, Copy)]
    struct MidnightSpringForward;

    impl MidnightSpringForward {
        fn switch_utc() -> chrono::NaiveDateTime {
            date(2026, 3, 8).and_hms_opt(3, 0, 0).expect("valid switch")
        }

        fn before() -> FixedOffset {
            FixedOffset::west_opt(3 * 3600).expect("valid offset")
        }

        fn after() -> FixedOffset {
            FixedOffset::west_opt(2 * 3600).expect("valid offset")
        }
    }

    impl TimeZone for MidnightSpringForward {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            Self
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> chrono::LocalResult<FixedOffset> {
            match local.and_hms_opt(12, 0, 0) {
                Some(noon) => self.offset_from_local_datetime(&noon),
                None => chrono::LocalResult::None,
            }
        }

        fn offset_from_local_datetime(
            &self,
            local: &chrono::NaiveDateTime,
        ) -> chrono::LocalResult<FixedOffset> {
            let gap_start = date(2026, 3, 8).and_hms_opt(0, 0, 0).expect("valid");
            let gap_end = date(2026, 3, 8).and_hms_opt(1, 0, 0).expect("valid");
            if *local < gap_start {
                chrono::LocalResult::Single(Self::before())
            } else if *local < gap_end {
                chrono::LocalResult::None
            } else {
                chrono::LocalResult::Single(Self::after())
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            match utc.and_hms_opt(0, 0, 0) {
                Some(midnight) => self.offset_from_utc_datetime(&midnight),
                None => Self::before(),
            }
        }

        fn offset_from_utc_datetime(&self, utc: &chrono::NaiveDateTime) -> FixedOffset {
            if *utc < Self::switch_utc() {
                Self::before()
            } else {
                Self::after()
            }
        }
    }

    fn spring_now() -> DateTime<MidnightSpringForward> {
        let utc_now = date(2026, 3, 1).and_hms_opt(15, 0, 0).expect("valid");
        MidnightSpringForward.from_utc_datetime(&utc_now)
    }

    #[test]
    fn skipped_local_midnight_moves_forward_an_hour() {
        assert_eq!(
            parse_date_time("Due 2026-03-08", &spring_now()).as_deref(),
            Some("2026-03-08T03:00:00.000Z")
        );
    }

    #[test]
    fn times_around_the_gap_are_unchanged() {
        let now = spring_now();
        assert_eq!(
            parse_date_time("Due 2026-03-07", &now).as_deref(),
            Some("2026-03-07T03:00:00.000Z")
        );
        assert_eq!(
            parse_date_time("Due 2026-03-09", &now).as_deref(),
            Some("2026-03-09T02:00:00.000Z")
        );
    }
}
