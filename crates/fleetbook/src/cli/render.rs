//! Text rendering for listings and the form.

use std::fmt::Write as _;

use crate::controller::FormView;
use crate::error::Result;
use crate::record::{Field, Record};

use super::OutputFormat;

/// Render a record listing in the requested format.
///
/// # Errors
///
/// Returns an error if JSON encoding fails.
pub fn records(records: &[Record], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(plain(records)),
        OutputFormat::Table => Ok(table(records)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
    }
}

fn plain(records: &[Record]) -> String {
    if records.is_empty() {
        return "No vehicles.\n".to_string();
    }
    records.iter().fold(String::new(), |mut out, r| {
        let _ = writeln!(out, "{}  {}", r.id, r);
        out
    })
}

fn table(records: &[Record]) -> String {
    let header = ["ID", "BRAND", "MODEL", "COLOR", "PLATE", "YEAR", "PRICE", "ENGINE"];
    let rows: Vec<[String; 8]> = records
        .iter()
        .map(|r| {
            let f = &r.fields;
            [
                r.id.to_string(),
                f.brand.clone(),
                f.model.clone(),
                f.color.clone(),
                f.plate.clone(),
                f.year.clone(),
                f.price.to_string(),
                f.engine.clone(),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: &[&str]| {
        let line: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    };

    push_row(&header);
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        push_row(&cells);
    }
    out
}

/// Render the form: heading, error, and draft values.
#[must_use]
pub fn form(view: &FormView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.mode.title());
    if let Some(target) = view.mode.target() {
        let _ = writeln!(out, "  editing {target}");
    }
    if let Some(error) = &view.error {
        let _ = writeln!(out, "  ! {error}");
    }
    for field in Field::ALL {
        let _ = writeln!(out, "  {:<7} {}", format!("{field}:"), view.draft.get(field));
    }
    if view.submitting {
        let _ = writeln!(out, "  (submit in progress)");
    }
    out
}
