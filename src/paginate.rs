//! Fixed-size pages over a filtered [`RecordSet`] plus the caller-held cursor.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::records::RecordSet;

/// Allowed cards-per-page values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    Six,
    Nine,
    #[default]
    Twelve,
    TwentyFour,
}

impl PageSize {
    pub fn get(self) -> usize {
        match self {
            PageSize::Six => 6,
            PageSize::Nine => 9,
            PageSize::Twelve => 12,
            PageSize::TwentyFour => 24,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            6 => Ok(PageSize::Six),
            9 => Ok(PageSize::Nine),
            12 => Ok(PageSize::Twelve),
            24 => Ok(PageSize::TwentyFour),
            other => Err(format!("Page size must be one of 6, 9, 12 or 24 (got {other})")),
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parsed: usize = value
            .trim()
            .parse()
            .map_err(|_| format!("Page size '{value}' is not a number"))?;
        PageSize::try_from(parsed)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl Serialize for PageSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.get() as u64)
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = u64::deserialize(deserializer)?;
        PageSize::try_from(raw as usize).map_err(de::Error::custom)
    }
}

pub fn total_pages(record_count: usize, page_size: PageSize) -> usize {
    record_count.div_ceil(page_size.get()).max(1)
}

/// Currently displayed page, 1-based, owned by the caller.
///
/// `next`/`previous` stay inside `[1, total_pages]`. When a new filter shrinks
/// the page count below the cursor, [`PageCursor::fit`] sends it back to the
/// first page instead of the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    page: usize,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageCursor {
    pub fn new() -> Self {
        Self { page: 1 }
    }

    /// Cursor at `page`, treating 0 as the first page.
    pub fn at(page: usize) -> Self {
        Self { page: page.max(1) }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn next(&mut self, total_pages: usize) {
        if self.page < total_pages {
            self.page += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    /// Returns true when the cursor had to be reset.
    pub fn fit(&mut self, total_pages: usize) -> bool {
        if self.page > total_pages.max(1) {
            self.page = 1;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub records: RecordSet,
    pub number: usize,
    pub total_pages: usize,
    pub total_records: usize,
}

/// Slices the page the cursor points at. Stateless; the cursor is not moved.
pub fn paginate(records: &RecordSet, page_size: PageSize, cursor: PageCursor) -> Page {
    let size = page_size.get();
    let start = (cursor.page() - 1).saturating_mul(size);
    Page {
        records: records.slice(start..start.saturating_add(size)),
        number: cursor.page(),
        total_pages: total_pages(records.len(), page_size),
        total_records: records.len(),
    }
}
