//! Console preview of the first rows of a result table.

use crate::models::ResultTable;
use crate::utils::{single_line, truncate_chars};
use std::fmt::Write;

/// Widest a preview cell may get, in characters.
const MAX_CELL_WIDTH: usize = 40;

/// Render the header and the first `rows` rows as an aligned text table.
///
/// Cells are folded onto one line and truncated, so long article bodies do
/// not wreck the layout. Rows are prefixed with their index.
///
/// # Arguments
///
/// * `table` - the assembled result table
/// * `rows` - how many leading rows to show
///
/// # Returns
///
/// The rendered text, ending with a `[n of m rows shown]` line when rows
/// were left out.
pub fn render(table: &ResultTable, rows: usize) -> String {
    let head = table.head(rows);
    let columns = table.columns();

    let cells: Vec<Vec<String>> = head
        .iter()
        .map(|record| {
            record
                .cells()
                .iter()
                .map(|cell| truncate_chars(&single_line(cell), MAX_CELL_WIDTH))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let index_width = head.len().saturating_sub(1).to_string().len();

    let mut out = String::new();
    let _ = write!(out, "{:index_width$}", "");
    for (name, width) in columns.iter().zip(widths.iter().copied()) {
        let _ = write!(out, "  {name:<width$}");
    }
    out.push('\n');

    for (i, row) in cells.iter().enumerate() {
        let _ = write!(out, "{i:>index_width$}");
        for (cell, width) in row.iter().zip(widths.iter().copied()) {
            let _ = write!(out, "  {cell:<width$}");
        }
        out.push('\n');
    }

    if table.len() > head.len() {
        let _ = writeln!(out, "[{} of {} rows shown]", head.len(), table.len());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleRecord, NOT_AVAILABLE};

    fn record(i: usize) -> ArticleRecord {
        ArticleRecord {
            url: format!("https://www.euronews.com/2025/05/06/story-{i}"),
            title: format!("Story {i}"),
            author: NOT_AVAILABLE.to_string(),
            publication_date: "2025-05-06".to_string(),
            content: "Line one.\nLine two is considerably longer than the preview allows for."
                .to_string(),
        }
    }

    #[test]
    fn test_preview_has_header_and_limited_rows() {
        let table: ResultTable = (0..7).map(record).collect();
        let out = render(&table, 5);
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].contains("publication_date"));
        assert_eq!(lines.len(), 1 + 5 + 1);
        assert!(lines[1].starts_with('0'));
        assert!(lines[5].starts_with('4'));
        assert_eq!(lines[6], "[5 of 7 rows shown]");
    }

    #[test]
    fn test_preview_folds_and_truncates_cells() {
        let table: ResultTable = (0..1).map(record).collect();
        let out = render(&table, 5);
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("Line one. Line two"));
        assert!(out.contains('…'));
        assert!(!out.contains("allows for."));
    }

    #[test]
    fn test_preview_of_empty_table_is_header_only() {
        let out = render(&ResultTable::default(), 5);
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("url"));
    }
}
