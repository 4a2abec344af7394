//! Plain-text renderers for terminals: an aligned grid for the tabular
//! projection and labelled blocks for cards.

use std::fmt::Write as _;

use crate::export::{Card, TabularView};

const COLUMN_GAP: &str = "  ";

pub fn render_grid(view: &TabularView) -> String {
    let mut widths = view
        .headers
        .iter()
        .map(|h| h.chars().count().max(3))
        .collect::<Vec<_>>();
    for row in &view.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(flatten(cell).chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", aligned(&view.headers, &widths));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", aligned(&rule, &widths));
    for row in &view.rows {
        let _ = writeln!(output, "{}", aligned(row, &widths));
    }
    output
}

/// Cards separated by a blank line, one `label: value` line per field.
pub fn render_cards(cards: &[Card]) -> String {
    let mut output = String::new();
    for (idx, card) in cards.iter().enumerate() {
        if idx > 0 {
            output.push('\n');
        }
        let fields = card.fields();
        let label_width = fields.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        for (label, value) in fields {
            let _ = writeln!(output, "{label:<label_width$} : {}", flatten(&value));
        }
    }
    output
}

fn aligned(cells: &[String], widths: &[usize]) -> String {
    let mut line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", flatten(cell), width = *width))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    line.truncate(line.trim_end().len());
    line
}

// Cells keep to one line.
fn flatten(value: &str) -> String {
    value.replace(['\n', '\r', '\t'], " ")
}
