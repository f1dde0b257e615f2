//! Tabular query results and their fixed-width text rendering

use std::fmt::Write as _;

/// Column/row result returned by a query executor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabularResult {
    /// Column names, in order
    pub columns: Vec<String>,
    /// Rows; each row has one cell per column
    pub rows: Vec<Vec<String>>,
}

impl TabularResult {
    /// Empty result with the given columns
    #[must_use]
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row
    #[must_use]
    pub fn with_row(mut self, row: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.rows.push(row.into_iter().map(Into::into).collect());
        self
    }

    /// Number of rows
    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(column.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Render as a bordered fixed-width table followed by a row count line
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.columns.is_empty() {
            let widths = self.widths();
            let border: String = widths.iter().fold(String::from("+"), |mut acc, w| {
                acc.push_str(&"-".repeat(w + 2));
                acc.push('+');
                acc
            });

            out.push_str(&border);
            out.push('\n');
            out.push_str(&render_row(self.columns.iter().map(String::as_str), &widths));
            out.push('\n');
            out.push_str(&border);
            out.push('\n');
            for row in &self.rows {
                let cells = (0..self.columns.len()).map(|i| row.get(i).map_or("", String::as_str));
                out.push_str(&render_row(cells, &widths));
                out.push('\n');
            }
            out.push_str(&border);
            out.push('\n');
        }
        let n = self.row_count();
        let _ = write!(out, "{n} {}", if n == 1 { "row" } else { "rows" });
        out
    }
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.zip(widths) {
        let pad = width.saturating_sub(cell.chars().count());
        let _ = write!(line, " {cell}{} |", " ".repeat(pad));
    }
    line
}
