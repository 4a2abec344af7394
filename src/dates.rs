//! Total, day-first aware parsing of the service date column.
//!
//! Sheet cells arrive as free text. Anything that does not resolve to a real
//! calendar day becomes [`ServiceDate::Missing`]; parsing never fails a row.

use std::{fmt, sync::LazyLock};

use chrono::NaiveDate;
use regex::Regex;
use serde::{Serialize, Serializer};

pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([0-9]{1,4})[/.\-]([0-9]{1,2})[/.\-]([0-9]{1,4})(?:[ T][0-9]{1,2}:[0-9]{2}(?::[0-9]{2}(?:\.[0-9]+)?)?)?$",
    )
    .expect("date pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceDate {
    Known(NaiveDate),
    Missing,
}

impl ServiceDate {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            ServiceDate::Known(date) => Some(*date),
            ServiceDate::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ServiceDate::Missing)
    }

    /// `DD/MM/YYYY`, or an empty string when missing.
    pub fn display(&self) -> String {
        match self {
            ServiceDate::Known(date) => format_date(*date),
            ServiceDate::Missing => String::new(),
        }
    }
}

impl fmt::Display for ServiceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Serialize for ServiceDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.display())
    }
}

impl From<Option<NaiveDate>> for ServiceDate {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map_or(ServiceDate::Missing, ServiceDate::Known)
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// Parses one raw cell into a calendar date.
///
/// Accepted shapes are `D/M/Y`, `M/D/Y` and `Y-M-D` with `/`, `-` or `.`
/// separators and an optional time of day, which is discarded. When
/// `day_first` is set an ambiguous `a/b/yyyy` is read as day/month and falls
/// back to month/day only if the day-first reading is not a real date; the
/// opposite order applies otherwise. Two-digit years below 70 land in the
/// 2000s, the rest in the 1900s.
pub fn normalize_date(raw: &str, day_first: bool) -> ServiceDate {
    let trimmed = raw.trim();
    let Some(caps) = DATE_PATTERN.captures(trimmed) else {
        return ServiceDate::Missing;
    };
    let (first, second, third) = (&caps[1], &caps[2], &caps[3]);

    if first.len() == 4 {
        if third.len() > 2 {
            return ServiceDate::Missing;
        }
        return ymd(first, second, third).into();
    }

    let year = match third.len() {
        4 => third.parse::<i32>().ok(),
        2 => third
            .parse::<i32>()
            .ok()
            .map(|yy| if yy < 70 { 2000 + yy } else { 1900 + yy }),
        _ => None,
    };
    let Some(year) = year else {
        return ServiceDate::Missing;
    };
    let (Ok(a), Ok(b)) = (first.parse::<u32>(), second.parse::<u32>()) else {
        return ServiceDate::Missing;
    };

    let (preferred, fallback) = if day_first { ((a, b), (b, a)) } else { ((b, a), (a, b)) };
    NaiveDate::from_ymd_opt(year, preferred.1, preferred.0)
        .or_else(|| NaiveDate::from_ymd_opt(year, fallback.1, fallback.0))
        .into()
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}
