//! Plain-text grid tables for the `.txt` listings.

use crate::charts::NO_DATA_MESSAGE;
use crate::data::{CellValue, Table};

/// Render a table as an ASCII grid with a `=` rule under the header.
///
/// Numeric columns are right-aligned with floats fixed to two decimals;
/// everything else is left-aligned.
pub fn grid_table(table: &Table) -> String {
    if table.columns.is_empty() {
        return NO_DATA_MESSAGE.to_string();
    }

    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(CellValue::to_fixed_string).collect())
        .collect();

    let numeric: Vec<bool> = (0..table.columns.len())
        .map(|idx| {
            let mut present = table
                .rows
                .iter()
                .map(|row| &row[idx])
                .filter(|c| !matches!(c, CellValue::Missing))
                .peekable();
            present.peek().is_some() && present.all(CellValue::is_numeric)
        })
        .collect();

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            cells
                .iter()
                .map(|row| row[idx].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let rule = |fill: char| {
        let segments: Vec<String> = widths
            .iter()
            .map(|w| fill.to_string().repeat(w + 2))
            .collect();
        format!("+{}+", segments.join("+"))
    };
    let line = |values: &[String]| {
        let padded: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(idx, v)| {
                if numeric[idx] {
                    format!(" {:>width$} ", v, width = widths[idx])
                } else {
                    format!(" {:<width$} ", v, width = widths[idx])
                }
            })
            .collect();
        format!("|{}|", padded.join("|"))
    };

    let mut out = vec![rule('-'), line(&table.columns), rule('=')];
    for row in &cells {
        out.push(line(row));
        out.push(rule('-'));
    }
    if cells.is_empty() {
        out.pop();
        out.push(rule('-'));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_table_layout() {
        let mut table = Table::new(["name", "rating"]);
        table.push_row(vec!["Alpha".into(), CellValue::Float(8.5)]);
        table.push_row(vec!["Be".into(), CellValue::Float(10.0)]);

        let expected = "\
+-------+--------+
| name  | rating |
+=======+========+
| Alpha |   8.50 |
+-------+--------+
| Be    |  10.00 |
+-------+--------+";
        assert_eq!(grid_table(&table), expected);
    }

    #[test]
    fn test_grid_table_without_columns() {
        assert_eq!(grid_table(&Table::default()), NO_DATA_MESSAGE);
    }
}
