//! Typed records built from a projected [`RecordTable`].

use std::{collections::BTreeMap, ops::Range, sync::Arc};

use crate::{
    dates::{ServiceDate, normalize_date},
    schema::{CanonicalField, RecordTable},
};

/// One appointment. The date is always typed; every other field stays text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub date: ServiceDate,
    fields: BTreeMap<CanonicalField, String>,
}

impl NormalizedRecord {
    pub fn new(date: ServiceDate, fields: BTreeMap<CanonicalField, String>) -> Self {
        let mut fields = fields;
        fields.remove(&CanonicalField::Date);
        Self { date, fields }
    }

    /// Text value of a field; absent columns read as empty.
    pub fn get(&self, field: CanonicalField) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Every field value, date first as `DD/MM/YYYY`, one per line.
    pub fn search_text(&self) -> String {
        let mut text = self.date.display();
        for value in self.fields.values() {
            text.push('\n');
            text.push_str(value);
        }
        text
    }
}

/// Ordered snapshot of records. Filtering and paging build new sets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordSet {
    pub columns: Vec<CanonicalField>,
    records: Vec<Arc<NormalizedRecord>>,
}

impl RecordSet {
    pub fn new(columns: Vec<CanonicalField>, records: Vec<NormalizedRecord>) -> Self {
        Self {
            columns,
            records: records.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedRecord> {
        self.records.iter().map(Arc::as_ref)
    }

    pub fn get(&self, index: usize) -> Option<&NormalizedRecord> {
        self.records.get(index).map(Arc::as_ref)
    }

    pub fn retained<F>(&self, mut keep: F) -> RecordSet
    where
        F: FnMut(&NormalizedRecord) -> bool,
    {
        RecordSet {
            columns: self.columns.clone(),
            records: self
                .records
                .iter()
                .filter(|record| keep(Arc::as_ref(record)))
                .cloned()
                .collect(),
        }
    }

    /// Clamped sub-range; out-of-range starts give an empty set.
    pub fn slice(&self, range: Range<usize>) -> RecordSet {
        let end = range.end.min(self.records.len());
        let start = range.start.min(end);
        RecordSet {
            columns: self.columns.clone(),
            records: self.records[start..end].to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub records: RecordSet,
    pub unparsable_dates: usize,
}

/// Converts projected rows into records, typing the date column.
///
/// A table without a date column yields records whose date is missing.
/// Non-empty date cells that fail to parse are counted in
/// `unparsable_dates`; blank cells are missing but not counted.
pub fn normalize_table(table: &RecordTable, day_first: bool) -> Normalized {
    let date_index = table.column_index(CanonicalField::Date);
    let mut unparsable_dates = 0usize;
    let records = table
        .rows
        .iter()
        .map(|row| {
            let date = match date_index.and_then(|idx| row.get(idx)) {
                Some(raw) => {
                    let parsed = normalize_date(raw, day_first);
                    if parsed.is_missing() && !raw.trim().is_empty() {
                        unparsable_dates += 1;
                    }
                    parsed
                }
                None => ServiceDate::Missing,
            };
            let fields = table
                .columns
                .iter()
                .zip(row.iter())
                .filter(|(field, _)| **field != CanonicalField::Date)
                .map(|(field, value)| (*field, value.clone()))
                .collect();
            NormalizedRecord::new(date, fields)
        })
        .collect();
    Normalized {
        records: RecordSet::new(table.columns.clone(), records),
        unparsable_dates,
    }
}
