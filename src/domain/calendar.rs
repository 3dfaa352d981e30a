/// Calendar days and timezone normalization
///
/// Every due/completion comparison is made on `CalendarDay` values: the
/// wall-clock date an instant falls on in the habit's timezone, with the
/// time of day thrown away.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, WeekdayTag};

/// A timezone-relative date with no time component
///
/// Equality and ordering are by (year, month, day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    /// Build a day from its parts, `None` if the date does not exist
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn weekday(&self) -> WeekdayTag {
        WeekdayTag::from(self.0.weekday())
    }

    /// The calendar day before this one, `None` at the start of the supported range
    pub fn previous(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// The calendar day after this one
    pub fn next(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// An instant inside this day for the given zone (local noon)
    ///
    /// Noon is used so the instant normalizes back to the same day.
    pub fn noon_in(&self, zone: Tz) -> DateTime<Utc> {
        let noon = self.0.and_hms_opt(12, 0, 0).unwrap_or_default();
        match zone.from_local_datetime(&noon).earliest() {
            Some(local) => local.with_timezone(&Utc),
            None => Utc.from_utc_datetime(&noon),
        }
    }
}

impl From<NaiveDate> for CalendarDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CalendarDay {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DomainError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date", s)))
    }
}

/// Result of looking up a habit's timezone name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedZone {
    pub zone: Tz,
    /// True when the name was empty or unknown and UTC was substituted
    pub fell_back: bool,
}

/// Look up an IANA timezone name, substituting UTC for empty or unknown names
///
/// This never fails. Callers that care about the substitution check
/// `fell_back` and log it; the lookup itself stays silent.
pub fn resolve_timezone(name: &str) -> ResolvedZone {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return ResolvedZone { zone: Tz::UTC, fell_back: true };
    }

    match trimmed.parse::<Tz>() {
        Ok(zone) => ResolvedZone { zone, fell_back: false },
        Err(_) => ResolvedZone { zone: Tz::UTC, fell_back: true },
    }
}

/// The calendar day `instant` falls on in the named timezone
pub fn normalize(instant: DateTime<Utc>, timezone: &str) -> CalendarDay {
    normalize_in(instant, resolve_timezone(timezone).zone)
}

/// The calendar day `instant` falls on in an already-resolved zone
pub fn normalize_in(instant: DateTime<Utc>, zone: Tz) -> CalendarDay {
    CalendarDay(instant.with_timezone(&zone).date_naive())
}

/// Parse a user-supplied point in time
///
/// Accepts an RFC 3339 instant, or a bare `YYYY-MM-DD` date which is taken
/// as local noon in `zone`.
pub fn parse_instant(input: &str, zone: Tz) -> Result<DateTime<Utc>, DomainError> {
    let trimmed = input.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }

    trimmed
        .parse::<CalendarDay>()
        .map(|day| day.noon_in(zone))
        .map_err(|_| {
            DomainError::InvalidDate(format!(
                "'{}' is neither an RFC 3339 timestamp nor a YYYY-MM-DD date",
                input
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn day(y: i32, m: u32, d: u32) -> CalendarDay {
        CalendarDay::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_normalize_uses_local_wall_clock() {
        let late_evening = instant("2025-03-02T23:30:00Z");

        assert_eq!(normalize(late_evening, "America/Chicago"), day(2025, 3, 2));
        assert_eq!(normalize(late_evening, "Asia/Tokyo"), day(2025, 3, 3));
        assert_eq!(normalize(late_evening, "UTC"), day(2025, 3, 2));
    }

    #[test]
    fn test_unknown_or_empty_zone_falls_back_to_utc() {
        let resolved = resolve_timezone("Mars/Olympus_Mons");
        assert!(resolved.fell_back);
        assert_eq!(resolved.zone, Tz::UTC);

        let resolved = resolve_timezone("   ");
        assert!(resolved.fell_back);

        let resolved = resolve_timezone("Europe/Berlin");
        assert!(!resolved.fell_back);

        let t = instant("2025-03-02T23:30:00Z");
        assert_eq!(normalize(t, ""), normalize(t, "UTC"));
        assert_eq!(normalize(t, "not a zone"), day(2025, 3, 2));
    }

    #[test]
    fn test_same_day_instants_match_across_dst_switch() {
        // US spring-forward: 2025-03-09 02:00 local does not exist in Chicago
        let before = instant("2025-03-09T07:30:00Z"); // 01:30 CST
        let after = instant("2025-03-09T08:30:00Z"); // 03:30 CDT
        let next_day = instant("2025-03-10T05:30:00Z"); // 00:30 CDT

        assert_eq!(normalize(before, "America/Chicago"), day(2025, 3, 9));
        assert_eq!(normalize(after, "America/Chicago"), day(2025, 3, 9));
        assert_eq!(normalize(next_day, "America/Chicago"), day(2025, 3, 10));
    }

    #[test]
    fn test_year_and_leap_boundaries() {
        assert_eq!(
            normalize(instant("2024-12-31T23:59:59Z"), "UTC"),
            day(2024, 12, 31)
        );
        assert_eq!(
            normalize(instant("2025-01-01T00:00:00Z"), "UTC"),
            day(2025, 1, 1)
        );

        let leap = day(2024, 2, 29);
        assert_eq!(leap.next(), Some(day(2024, 3, 1)));
        assert_eq!(day(2024, 3, 1).previous(), Some(leap));
        assert_eq!(day(2025, 3, 1).previous(), Some(day(2025, 2, 28)));
        assert!(CalendarDay::from_ymd(2025, 2, 29).is_none());
    }

    #[test]
    fn test_ordering_and_display() {
        assert!(day(2024, 12, 31) < day(2025, 1, 1));
        assert!(day(2025, 2, 28) < day(2025, 3, 1));
        assert_eq!(day(2025, 3, 3).to_string(), "2025-03-03");
        assert_eq!("2025-03-03".parse::<CalendarDay>().unwrap(), day(2025, 3, 3));
        assert_eq!(day(2025, 3, 3).weekday(), WeekdayTag::Monday);
    }

    #[test]
    fn test_parse_instant_accepts_timestamp_or_date() {
        let chicago: Tz = "America/Chicago".parse().unwrap();

        let exact = parse_instant("2025-03-02T23:30:00Z", chicago).unwrap();
        assert_eq!(exact, instant("2025-03-02T23:30:00Z"));

        let from_date = parse_instant("2025-03-02", chicago).unwrap();
        assert_eq!(normalize_in(from_date, chicago), day(2025, 3, 2));
        assert_eq!(from_date, instant("2025-03-02T18:00:00Z"));

        assert!(parse_instant("yesterday", chicago).is_err());
    }
}
