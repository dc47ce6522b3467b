//! # Text Tables
//!
//! File: cli/src/common/ui/table.rs
//!
//! Renders rows of strings as a left-aligned table:
//!
//! ```text
//! Name       | Status
//! -----------+-------
//! WebServer1 | Online
//! ```
//!
//! Column widths follow the longest cell (by character count) and are capped
//! at `MAX_COLUMN_WIDTH`; longer cells are truncated with `...`.

/// Widest a column may grow before its cells are truncated.
const MAX_COLUMN_WIDTH: usize = 60;

/// A table under construction.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Missing cells render empty; extra cells are dropped.
    pub fn add_row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Renders header, separator and rows, one line each.
    pub fn render(&self) -> String {
        let widths: Vec<usize> = (0..self.headers.len())
            .map(|col| {
                std::iter::once(&self.headers[col])
                    .chain(self.rows.iter().map(|row| &row[col]))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
                    .min(MAX_COLUMN_WIDTH)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&render_line(&self.headers, &widths));
        out.push('\n');
        let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(separator.join("-+-").trim_end());
        out.push('\n');
        for row in &self.rows {
            out.push_str(&render_line(row, &widths));
            out.push('\n');
        }
        out
    }
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", fit(cell, *width), width = *width))
        .collect();
    padded.join(" | ").trim_end().to_string()
}

fn fit(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        return cell.to_string();
    }
    let mut truncated: String = cell.chars().take(width.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}
