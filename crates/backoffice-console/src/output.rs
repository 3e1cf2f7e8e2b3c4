//! Rendering a screen's current page for the terminal.
//!
//! Three modes: an aligned text table with a "Showing" footer, pretty JSON
//! of the raw rows, and CSV of the visible rows through the export columns.

use std::fmt::Write as _;

use backoffice_view::{export, resolve};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value as Json;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::csv_export::to_csv_string;
use crate::error::Result;
use crate::session::ScreenView;

/// Widest a text cell may get before it is truncated.
pub const MAX_CELL_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Serialize)]
struct PageDocument<'a> {
    screen: &'a str,
    page: usize,
    total_pages: usize,
    page_size: usize,
    filtered: usize,
    total: usize,
    rows: Vec<&'a Json>,
}

/// Renders the current page of `screen`.
pub fn render_page(screen: &ScreenView, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(screen)),
        OutputFormat::Json => render_json(screen),
        OutputFormat::Csv => {
            let view = screen.view();
            let table = export(view.visible_rows.iter().copied(), &screen.preset().export);
            to_csv_string(&table)
        }
    }
}

fn render_json(screen: &ScreenView) -> Result<String> {
    let view = screen.view();
    let doc = PageDocument {
        screen: screen.preset().screen.as_str(),
        page: view.current_page,
        total_pages: view.total_pages,
        page_size: screen.engine().page().page_size.get(),
        filtered: view.filtered_sorted_count,
        total: screen.engine().records().len(),
        rows: view.visible_rows,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

fn render_text(screen: &ScreenView) -> String {
    let preset = screen.preset();
    let view = screen.view();

    let headers: Vec<String> = preset.columns.iter().map(|c| c.header.clone()).collect();
    let rows: Vec<Vec<String>> = view
        .visible_rows
        .iter()
        .map(|record| {
            preset
                .columns
                .iter()
                .map(|c| truncate_to_width(&resolve(*record, &c.path).to_text(), MAX_CELL_WIDTH))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    if rows.is_empty() {
        out.push_str("No matching records.\n");
    }
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out.push('\n');
    out.push_str(&footer(screen));
    out.push('\n');
    if let Some(error) = screen.last_error() {
        let _ = writeln!(out, "Last refresh failed: {error}");
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// "Showing 11-20 of 23 (page 2 of 3)", or a no-match line.
pub fn footer(screen: &ScreenView) -> String {
    let view = screen.view();
    let (first, last, total) = screen.engine().showing();
    if total == 0 {
        return format!(
            "Showing 0 of 0 ({} records loaded)",
            screen.engine().records().len()
        );
    }
    format!(
        "Showing {}-{} of {} (page {} of {})",
        first, last, total, view.current_page, view.total_pages
    )
}

/// Cuts `s` to `max_width` display columns, ending in an ellipsis.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let limit = max_width.saturating_sub(1);
    let mut result = String::new();
    let mut current = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if current + w > limit {
            break;
        }
        result.push(c);
        current += w;
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsoleConfig;
    use crate::screens::Screen;
    use serde_json::json;

    fn account_types() -> ScreenView {
        let mut screen = ScreenView::open(Screen::AccountTypes, &ConsoleConfig::default()).unwrap();
        screen
            .load(json!([
                {"name": "Standard", "minDeposit": 100, "maxLeverage": 500, "isActive": true},
                {"name": "ECN", "minDeposit": "1000.00", "spread": 0.1, "isActive": false},
            ]))
            .unwrap();
        screen
    }

    #[test]
    fn text_table_is_aligned_with_footer() {
        let text = render_page(&account_types(), OutputFormat::Text).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Name      Min deposit"));
        assert!(lines[1].starts_with("--------  -----------"));
        assert!(lines[2].starts_with("ECN       1000.00"));
        assert!(lines[3].starts_with("Standard  100"));
        assert_eq!(lines.last().copied(), Some("Showing 1-2 of 2 (page 1 of 1)"));
    }

    #[test]
    fn empty_result_says_so() {
        let mut screen = account_types();
        screen.engine_mut().set_query("zzz");
        let text = render_page(&screen, OutputFormat::Text).unwrap();
        assert!(text.contains("No matching records."));
        assert!(text.contains("Showing 0 of 0 (2 records loaded)"));
    }

    #[test]
    fn json_carries_counts_and_rows() {
        let text = render_page(&account_types(), OutputFormat::Json).unwrap();
        let doc: Json = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["screen"], "account-types");
        assert_eq!(doc["filtered"], 2);
        assert_eq!(doc["rows"][0]["name"], "ECN");
    }

    #[test]
    fn csv_uses_export_columns() {
        let csv = render_page(&account_types(), OutputFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Name,Min deposit,Max leverage,Spread,Commission,Active,Created")
        );
        assert_eq!(lines.next(), Some("ECN,1000.00,,0.1,,false,"));
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("Hello World", 6), "Hello…");
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
    }
}
