//! Fetch → dedupe → map → normalize → filter → paginate.
//!
//! [`prepare`] runs the stages that depend only on the sheet and the
//! configuration. [`view`] runs the per-interaction stages against a
//! prepared record set and the caller's [`PageCursor`].

use log::{debug, info, warn};

use crate::{
    config::PipelineConfig,
    error::PipelineError,
    filter::{DateSelector, filter_records},
    headers::dedupe,
    paginate::{Page, PageCursor, PageSize, paginate, total_pages},
    records::{RecordSet, normalize_table},
    schema::{
        CanonicalField, ColumnPlan, MissingColumnPolicy, Registry, project_rows, resolve_columns,
    },
    source::{RawSheet, SheetSource},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub records: RecordSet,
    pub plan: ColumnPlan,
    pub unparsable_dates: usize,
}

impl Prepared {
    /// Registry source names that were not found and were tolerated.
    pub fn missing(&self) -> &[String] {
        &self.plan.missing
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    pub dates: DateSelector,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub matched: RecordSet,
    pub page: Page,
    pub cursor_reset: bool,
}

pub fn load(source: &dyn SheetSource, config: &PipelineConfig) -> Result<Prepared, PipelineError> {
    let sheet = source.fetch()?;
    prepare(sheet, config)
}

pub fn prepare(sheet: RawSheet, config: &PipelineConfig) -> Result<Prepared, PipelineError> {
    if sheet.is_empty() {
        warn!("Sheet is empty or could not be read");
        return Err(PipelineError::EmptySource);
    }
    let headers = dedupe(&sheet.headers);
    let registry = config.effective_registry();
    debug!(
        "Binding {} registry column(s) with {:?}",
        registry.entries.len(),
        config.column_binding
    );
    let plan = resolve_columns(&headers, &registry, config.column_binding);
    enforce_policies(&plan, registry_has_date(&registry), config)?;

    let table = project_rows(&plan, &sheet.rows);
    let normalized = normalize_table(&table, config.day_first);
    if normalized.unparsable_dates > 0 {
        info!(
            "{} row(s) have an unreadable service date and will only match unfiltered views",
            normalized.unparsable_dates
        );
    }
    info!(
        "Prepared {} record(s) with {} column(s)",
        normalized.records.len(),
        table.columns.len()
    );
    Ok(Prepared {
        records: normalized.records,
        plan,
        unparsable_dates: normalized.unparsable_dates,
    })
}

fn registry_has_date(registry: &Registry) -> bool {
    registry
        .iter()
        .any(|entry| entry.canonical == CanonicalField::Date)
}

fn enforce_policies(
    plan: &ColumnPlan,
    has_date_entry: bool,
    config: &PipelineConfig,
) -> Result<(), PipelineError> {
    if plan.missing.is_empty() {
        return Ok(());
    }
    let date_missing = has_date_entry && !plan.is_bound(CanonicalField::Date);
    let others_missing = plan.missing.len() > usize::from(date_missing);
    let strict_date = date_missing && config.date_column_policy == MissingColumnPolicy::Strict;
    let strict_others =
        others_missing && config.other_columns_policy == MissingColumnPolicy::Strict;
    if strict_date || strict_others {
        return Err(PipelineError::MissingRequiredColumn {
            missing: plan.missing.clone(),
        });
    }
    warn!(
        "Continuing without column(s): {}",
        plan.missing.join(", ")
    );
    Ok(())
}

/// Filters, fits the cursor to the new page count, and slices one page.
pub fn view(
    records: &RecordSet,
    query: &Query,
    page_size: PageSize,
    cursor: &mut PageCursor,
) -> View {
    let matched = filter_records(records, &query.dates, query.search.as_deref());
    let cursor_reset = cursor.fit(total_pages(matched.len(), page_size));
    if cursor_reset {
        debug!("Page cursor reset to 1 after filter change");
    }
    let page = paginate(&matched, page_size, *cursor);
    info!(
        "{} of {} record(s) match; showing page {}/{}",
        matched.len(),
        records.len(),
        page.number,
        page.total_pages
    );
    View {
        matched,
        page,
        cursor_reset,
    }
}
