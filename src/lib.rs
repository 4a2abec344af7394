pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod export;
pub mod filter;
pub mod headers;
pub mod io_utils;
pub mod paginate;
pub mod pipeline;
pub mod records;
pub mod schema;
pub mod source;
pub mod table;
pub mod view;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info, warn};

use crate::{
    cli::{Cli, Commands, SheetArgs},
    config::PipelineConfig,
    dates::format_date,
    error::PipelineError,
    pipeline::Prepared,
    schema::{ColumnBinding, MissingColumnPolicy},
    source::{CachedSource, CsvSheetSource, DEFAULT_FRESHNESS, SheetSource},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("appointment_cards", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::View(args) => view::execute(&args),
        Commands::Export(args) => export::execute(&args),
        Commands::Dates(args) => handle_dates(&args.sheet),
        Commands::Columns(args) => handle_columns(&args.sheet),
    };
    settle_warnings(outcome)
}

/// Pipeline conditions that only halt the current command exit cleanly.
fn settle_warnings(outcome: Result<()>) -> Result<()> {
    match outcome {
        Err(err)
            if err
                .downcast_ref::<PipelineError>()
                .is_some_and(PipelineError::is_warning) =>
        {
            warn!("Nothing to show: {err}");
            Ok(())
        }
        other => other,
    }
}

/// Config file (or defaults) with command-line overrides applied.
pub fn resolve_config(args: &SheetArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Loading configuration from {path:?}"))?,
        None => PipelineConfig::default(),
    };
    if let Some(name) = &args.date_column {
        config.date_column_name = Some(name.trim().to_string());
    }
    if let Some(position) = args.date_position {
        config.column_binding = ColumnBinding::ByPosition { position };
    }
    if args.month_first {
        config.day_first = false;
    }
    if args.strict_columns {
        config.date_column_policy = MissingColumnPolicy::Strict;
        config.other_columns_policy = MissingColumnPolicy::Strict;
    }
    if args.lenient_date {
        config.date_column_policy = MissingColumnPolicy::Lenient;
    }
    debug!("Resolved configuration: {config:?}");
    Ok(config)
}

/// Sheet source for `args`, reusing a fetch within the freshness window.
pub fn open_source(args: &SheetArgs) -> Result<CachedSource<CsvSheetSource>> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    Ok(CachedSource::new(
        CsvSheetSource::new(&args.input, args.delimiter, encoding),
        DEFAULT_FRESHNESS,
    ))
}

/// Fetches and prepares the sheet named by `args`.
pub fn load_sheet(args: &SheetArgs) -> Result<(PipelineConfig, Prepared)> {
    let config = resolve_config(args)?;
    let source = open_source(args)?;
    let prepared = pipeline::load(&source, &config)?;
    Ok((config, prepared))
}

fn handle_dates(args: &SheetArgs) -> Result<()> {
    let (_, prepared) = load_sheet(args)?;
    let dates = filter::unique_dates(&prepared.records);
    for date in &dates {
        println!("{}", format_date(*date));
    }
    info!(
        "Listed {} distinct date(s) across {} record(s)",
        dates.len(),
        prepared.records.len()
    );
    Ok(())
}

fn handle_columns(args: &SheetArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let source = open_source(args)?;
    let sheet = source.fetch()?;
    let headers = headers::dedupe(&sheet.headers);
    let registry = config.effective_registry();
    let plan = schema::resolve_columns(&headers, &registry, config.column_binding);

    let rows = registry
        .iter()
        .map(|entry| {
            let bound = plan.bound.iter().find(|c| c.canonical == entry.canonical);
            vec![
                entry.canonical.name().to_string(),
                entry.source.clone(),
                bound
                    .map(|c| format!("{} (#{})", c.source, c.index))
                    .unwrap_or_else(|| "missing".to_string()),
            ]
        })
        .collect::<Vec<_>>();
    let view = export::TabularView {
        headers: vec![
            "canonical".to_string(),
            "expected".to_string(),
            "bound".to_string(),
        ],
        rows,
    };
    print!("{}", table::render_grid(&view));
    info!(
        "{} of {} required column(s) bound in {}",
        plan.bound.len(),
        registry.entries.len(),
        source.describe()
    );
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
