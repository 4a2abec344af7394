//! Projections handed to renderers and exporters.
//!
//! The tabular projection is a narrow six-column view; the card projection
//! carries every field of a single appointment. Both are total over their
//! input and perform no I/O; the `write_*` helpers persist them.

use std::{io::Write, path::Path};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use itertools::Itertools;
use log::info;
use serde::Serialize;

use crate::{
    cli::{ExportArgs, ExportFormat, Projection},
    dates::{ServiceDate, format_date},
    filter::filter_records,
    io_utils, load_sheet,
    records::{NormalizedRecord, RecordSet},
    schema::CanonicalField,
    view::build_query,
};

pub const TABULAR_COLUMNS: [CanonicalField; 6] = [
    CanonicalField::Date,
    CanonicalField::OrderId,
    CanonicalField::ClientName,
    CanonicalField::Product,
    CanonicalField::Manufacturer,
    CanonicalField::Defect,
];

pub const DEFAULT_TITLE: &str = "Relatório de Atendimentos";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn cell(record: &NormalizedRecord, field: CanonicalField) -> String {
    match field {
        CanonicalField::Date => record.date.display(),
        other => record.get(other).to_string(),
    }
}

pub fn project_tabular(records: &RecordSet) -> TabularView {
    TabularView {
        headers: TABULAR_COLUMNS.iter().map(|f| f.name().to_string()).collect(),
        rows: records
            .iter()
            .map(|record| TABULAR_COLUMNS.iter().map(|f| cell(record, *f)).collect())
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub name: String,
    pub date: ServiceDate,
    pub order_id: String,
    pub product: String,
    pub manufacturer: String,
    pub defect: String,
    pub address: String,
    pub number: String,
    pub neighborhood: String,
    pub postal_code: String,
    pub complement: String,
    pub contact: String,
}

impl Card {
    /// Label/value pairs in card display order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("date", self.date.display()),
            ("orderId", self.order_id.clone()),
            ("product", self.product.clone()),
            ("manufacturer", self.manufacturer.clone()),
            ("defect", self.defect.clone()),
            ("address", self.address.clone()),
            ("number", self.number.clone()),
            ("neighborhood", self.neighborhood.clone()),
            ("postalCode", self.postal_code.clone()),
            ("complement", self.complement.clone()),
            ("contact", self.contact.clone()),
        ]
    }
}

pub fn project_card(record: &NormalizedRecord) -> Card {
    let text = |field| record.get(field).to_string();
    Card {
        name: text(CanonicalField::ClientName),
        date: record.date,
        order_id: text(CanonicalField::OrderId),
        product: text(CanonicalField::Product),
        manufacturer: text(CanonicalField::Manufacturer),
        defect: text(CanonicalField::Defect),
        address: text(CanonicalField::Address),
        number: text(CanonicalField::Number),
        neighborhood: text(CanonicalField::Neighborhood),
        postal_code: text(CanonicalField::PostalCode),
        complement: text(CanonicalField::Complement),
        contact: text(CanonicalField::Contact),
    }
}

pub fn project_cards(records: &RecordSet) -> Vec<Card> {
    records.iter().map(project_card).collect()
}

/// Heading for exported reports, naming the selected days when there are any.
pub fn export_title(selected: &[NaiveDate]) -> String {
    if selected.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        format!(
            "Atendimentos do(s) dia(s): {}",
            selected.iter().map(|d| format_date(*d)).join(", ")
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFormat {
    Json,
    Yaml,
}

pub fn write_tabular_csv(path: Option<&Path>, view: &TabularView, delimiter: u8) -> Result<()> {
    let mut writer = io_utils::open_csv_writer(path, delimiter)?;
    writer
        .write_record(&view.headers)
        .context("Writing tabular header")?;
    for (idx, row) in view.rows.iter().enumerate() {
        writer
            .write_record(row)
            .with_context(|| format!("Writing tabular row {}", idx + 1))?;
    }
    writer.flush().context("Flushing tabular output")?;
    Ok(())
}

/// Card export document: the report title followed by the cards.
#[derive(Debug, Serialize)]
pub struct CardReport<'a> {
    pub title: &'a str,
    pub cards: &'a [Card],
}

pub fn write_cards(
    path: Option<&Path>,
    title: &str,
    cards: &[Card],
    format: CardFormat,
) -> Result<()> {
    let report = CardReport { title, cards };
    let mut output = io_utils::open_output(path)?;
    match format {
        CardFormat::Json => {
            serde_json::to_writer_pretty(&mut output, &report).context("Writing cards JSON")?;
            writeln!(output).context("Writing cards JSON")?;
        }
        CardFormat::Yaml => {
            serde_yaml::to_writer(&mut output, &report).context("Writing cards YAML")?;
        }
    }
    output.flush().context("Flushing card output")?;
    Ok(())
}

pub fn execute(args: &ExportArgs) -> Result<()> {
    let (config, prepared) = load_sheet(&args.sheet)?;
    let query = build_query(&args.filter, config.day_first)?;
    let matched = filter_records(&prepared.records, &query.dates, query.search.as_deref());
    let title = export_title(&query.dates.selected());
    let output = args.output.as_deref();
    let destination = output
        .filter(|p| !io_utils::is_dash(p))
        .map(|p| format!("{p:?}"))
        .unwrap_or_else(|| "stdout".into());

    match (args.projection, args.format) {
        (Projection::Tabular, None | Some(ExportFormat::Csv)) => {
            let delimiter = args.output_delimiter.unwrap_or(io_utils::DEFAULT_CSV_DELIMITER);
            write_tabular_csv(output, &project_tabular(&matched), delimiter)?;
            info!(
                "{title}: wrote {} row(s) to {destination} (delimiter '{}')",
                matched.len(),
                crate::printable_delimiter(delimiter)
            );
        }
        (Projection::Tabular, Some(format)) => {
            anyhow::bail!("Tabular export only supports csv (got {format:?})");
        }
        (Projection::Cards, format) => {
            let format = match format {
                None | Some(ExportFormat::Json) => CardFormat::Json,
                Some(ExportFormat::Yaml) => CardFormat::Yaml,
                Some(ExportFormat::Csv) => {
                    anyhow::bail!("Card export supports json or yaml, not csv")
                }
            };
            write_cards(output, &title, &project_cards(&matched), format)?;
            info!("{title}: wrote {} card(s) to {destination}", matched.len());
        }
    }
    Ok(())
}
