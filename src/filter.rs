use std::collections::BTreeSet;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use itertools::Itertools;

use crate::{
    dates::{ServiceDate, normalize_date},
    records::{NormalizedRecord, RecordSet},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateSelector {
    #[default]
    Any,
    On(NaiveDate),
    AnyOf(BTreeSet<NaiveDate>),
}

impl DateSelector {
    /// Builds a selector from picked dates; none means no date filter.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        let dates: BTreeSet<NaiveDate> = dates.into_iter().collect();
        match dates.len() {
            0 => DateSelector::Any,
            1 => match dates.first() {
                Some(date) => DateSelector::On(*date),
                None => DateSelector::Any,
            },
            _ => DateSelector::AnyOf(dates),
        }
    }

    pub fn matches(&self, date: &ServiceDate) -> bool {
        match (self, date.as_date()) {
            (DateSelector::Any, _) => true,
            (_, None) => false,
            (DateSelector::On(expected), Some(actual)) => *expected == actual,
            (DateSelector::AnyOf(set), Some(actual)) => set.contains(&actual),
        }
    }

    pub fn selected(&self) -> Vec<NaiveDate> {
        match self {
            DateSelector::Any => Vec::new(),
            DateSelector::On(date) => vec![*date],
            DateSelector::AnyOf(set) => set.iter().copied().collect(),
        }
    }
}

/// Parses user-picked dates with the same rules as the sheet's date column.
pub fn parse_date_selection(values: &[String], day_first: bool) -> Result<DateSelector> {
    let dates = values
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|raw| {
            normalize_date(raw, day_first)
                .as_date()
                .ok_or_else(|| anyhow!("Failed to parse '{raw}' as a date"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(DateSelector::from_dates(dates))
}

/// Case-insensitive substring test over every field of the record.
pub fn matches_search(record: &NormalizedRecord, needle_lower: &str) -> bool {
    needle_lower.is_empty() || record.search_text().to_lowercase().contains(needle_lower)
}

/// Keeps records that satisfy both the date selector and the search term.
///
/// The result preserves source order. An empty or absent search term keeps
/// every record that passes the date selector.
pub fn filter_records(
    records: &RecordSet,
    dates: &DateSelector,
    search: Option<&str>,
) -> RecordSet {
    let needle = search.map(str::to_lowercase).unwrap_or_default();
    records.retained(|record| dates.matches(&record.date) && matches_search(record, &needle))
}

/// Distinct known dates, ascending.
pub fn unique_dates(records: &RecordSet) -> Vec<NaiveDate> {
    records
        .iter()
        .filter_map(|record| record.date.as_date())
        .sorted()
        .dedup()
        .collect()
}
