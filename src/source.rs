//! Sheet sources: where the raw header row and data rows come from.

use std::{
    cell::RefCell,
    path::PathBuf,
    time::{Duration, Instant},
};

use encoding_rs::Encoding;
use log::{debug, info};

use crate::{error::PipelineError, io_utils};

pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(300);

/// Header row plus data rows, all plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawSheet {
    /// Splits a full grid into header and rows. Data rows are padded or
    /// truncated to the header width.
    pub fn from_grid(grid: Vec<Vec<String>>) -> Self {
        let mut iter = grid.into_iter();
        let Some(headers) = iter.next() else {
            return RawSheet::default();
        };
        let width = headers.len();
        let rows = iter
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        RawSheet { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub trait SheetSource {
    fn fetch(&self) -> Result<RawSheet, PipelineError>;

    fn describe(&self) -> String;
}

/// Delimited text export of the sheet on disk (or stdin via `-`).
#[derive(Debug, Clone)]
pub struct CsvSheetSource {
    path: PathBuf,
    delimiter: u8,
    encoding: &'static Encoding,
}

impl CsvSheetSource {
    pub fn new(path: impl Into<PathBuf>, delimiter: Option<u8>, encoding: &'static Encoding) -> Self {
        let path = path.into();
        let delimiter = io_utils::resolve_input_delimiter(&path, delimiter);
        Self {
            path,
            delimiter,
            encoding,
        }
    }

    fn read_grid(&self) -> anyhow::Result<Vec<Vec<String>>> {
        use anyhow::Context;

        let input = io_utils::open_input(&self.path)?;
        let mut reader = io_utils::open_sheet_reader(input, self.delimiter);
        let mut grid = Vec::new();
        for (idx, record) in reader.byte_records().enumerate() {
            let record = record.with_context(|| format!("Reading row {}", idx + 1))?;
            let decoded = io_utils::decode_record(&record, self.encoding)
                .with_context(|| format!("Decoding row {}", idx + 1))?;
            grid.push(decoded);
        }
        Ok(grid)
    }
}

impl SheetSource for CsvSheetSource {
    fn fetch(&self) -> Result<RawSheet, PipelineError> {
        let grid = self
            .read_grid()
            .map_err(|err| PipelineError::unavailable(format!("{err:#}")))?;
        let sheet = RawSheet::from_grid(grid);
        info!(
            "Read {} row(s) across {} column(s) from {}",
            sheet.rows.len(),
            sheet.headers.len(),
            self.describe()
        );
        Ok(sheet)
    }

    fn describe(&self) -> String {
        if io_utils::is_dash(&self.path) {
            "stdin".to_string()
        } else {
            format!("{:?}", self.path)
        }
    }
}

/// Reuses a successful fetch for the freshness window. Failures are not cached.
pub struct CachedSource<S> {
    inner: S,
    freshness: Duration,
    cached: RefCell<Option<(Instant, RawSheet)>>,
}

impl<S: SheetSource> CachedSource<S> {
    pub fn new(inner: S, freshness: Duration) -> Self {
        Self {
            inner,
            freshness,
            cached: RefCell::new(None),
        }
    }

    pub fn invalidate(&self) {
        self.cached.borrow_mut().take();
    }
}

impl<S: SheetSource> SheetSource for CachedSource<S> {
    fn fetch(&self) -> Result<RawSheet, PipelineError> {
        if let Some((fetched_at, sheet)) = self.cached.borrow().as_ref()
            && fetched_at.elapsed() < self.freshness
        {
            debug!("Serving cached sheet for {}", self.inner.describe());
            return Ok(sheet.clone());
        }
        let sheet = self.inner.fetch()?;
        *self.cached.borrow_mut() = Some((Instant::now(), sheet.clone()));
        Ok(sheet)
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }
}
