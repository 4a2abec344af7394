use anyhow::Result;
use log::{info, warn};

use crate::{
    cli::{FilterArgs, ViewArgs},
    export::{project_cards, project_tabular},
    filter::parse_date_selection,
    load_sheet,
    paginate::PageCursor,
    pipeline::{self, Query},
    table,
};

/// Builds the query from `--date`/`--search`, using the sheet's date order.
pub fn build_query(filter: &FilterArgs, day_first: bool) -> Result<Query> {
    let dates = parse_date_selection(&filter.dates, day_first)?;
    let search = filter
        .search
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    Ok(Query { dates, search })
}

pub fn execute(args: &ViewArgs) -> Result<()> {
    let (config, prepared) = load_sheet(&args.sheet)?;
    let page_size = args.page_size.unwrap_or(config.page_size);
    let query = build_query(&args.filter, config.day_first)?;

    let mut cursor = PageCursor::at(args.page);
    let view = pipeline::view(&prepared.records, &query, page_size, &mut cursor);
    if view.cursor_reset {
        warn!(
            "Page {} is past the last page ({}); showing page 1",
            args.page, view.page.total_pages
        );
    }

    println!("Total de Atendimentos: {}", view.matched.len());
    println!("Page {}/{}", view.page.number, view.page.total_pages);
    println!();
    if args.cards {
        print!("{}", table::render_cards(&project_cards(&view.page.records)));
    } else {
        print!("{}", table::render_grid(&project_tabular(&view.page.records)));
    }
    info!(
        "Displayed {} of {} matching record(s)",
        view.page.records.len(),
        view.matched.len()
    );
    Ok(())
}
