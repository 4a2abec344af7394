use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::paginate::PageSize;

#[derive(Debug, Parser)]
#[command(author, version, about = "Browse and export home-service appointment sheets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Filter appointments and show one page as a table or as cards
    View(ViewArgs),
    /// Write the filtered appointments as a tabular CSV or as card records
    Export(ExportArgs),
    /// List the distinct service dates present in the sheet
    Dates(DatesArgs),
    /// Report how each required column is bound in the sheet
    Columns(ColumnsArgs),
}

/// Options shared by every command that reads a sheet.
#[derive(Debug, Args, Clone, Default)]
pub struct SheetArgs {
    /// Sheet export to read (CSV/TSV, `-` for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// YAML configuration file with registry, binding and policies
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Header name of the service date column
    #[arg(long = "date-column")]
    pub date_column: Option<String>,
    /// Bind the service date to this zero-based column position instead of by name
    #[arg(long = "date-position")]
    pub date_position: Option<usize>,
    /// Read ambiguous dates as month/day/year
    #[arg(long = "month-first")]
    pub month_first: bool,
    /// Abort when any required column is missing
    #[arg(long = "strict-columns")]
    pub strict_columns: bool,
    /// Continue without a service date column instead of aborting
    #[arg(long = "lenient-date")]
    pub lenient_date: bool,
}

#[derive(Debug, Args, Clone, Default)]
pub struct FilterArgs {
    /// Service date to keep (DD/MM/YYYY); repeat to keep several days
    #[arg(short = 'd', long = "date", action = clap::ArgAction::Append)]
    pub dates: Vec<String>,
    /// Case-insensitive text matched against every field
    #[arg(short = 's', long = "search")]
    pub search: Option<String>,
}

#[derive(Debug, Args)]
pub struct ViewArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Page to display (1-based)
    #[arg(short = 'p', long = "page", default_value_t = 1)]
    pub page: usize,
    /// Records per page (6, 9, 12 or 24)
    #[arg(long = "page-size")]
    pub page_size: Option<PageSize>,
    /// Render the page as cards instead of a table
    #[arg(long = "cards")]
    pub cards: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum Projection {
    #[default]
    Tabular,
    Cards,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum ExportFormat {
    Csv,
    Json,
    Yaml,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Output file (stdout if omitted or `-`)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Which projection to write
    #[arg(long = "projection", value_enum, default_value = "tabular")]
    pub projection: Projection,
    /// Output format (defaults to csv for tabular, json for cards)
    #[arg(long = "format", value_enum)]
    pub format: Option<ExportFormat>,
    /// Delimiter for tabular CSV output
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
}

#[derive(Debug, Args)]
pub struct DatesArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
