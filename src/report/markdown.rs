//! Markdown building blocks for the comprehensive report.

use crate::data::Table;

/// Convert a table to a Markdown pipe table.
pub fn markdown_table(table: &Table) -> String {
    if table.is_empty() || table.columns.is_empty() {
        return "*No data available*".to_string();
    }

    let header = format!("| {} |", table.columns.join(" | "));
    let separator = format!("|{}|", vec!["---"; table.columns.len()].join("|"));
    let rows = table.rows.iter().map(|row| {
        let cells: Vec<String> = row.iter().map(|c| escape_cell(&c.to_string())).collect();
        format!("| {} |", cells.join(" | "))
    });

    std::iter::once(header)
        .chain(std::iter::once(separator))
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Format an integer with comma thousands separators.
pub fn format_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Line-oriented Markdown document.
#[derive(Debug, Default)]
pub struct MarkdownDocument {
    lines: Vec<String>,
}

impl MarkdownDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heading(&mut self, level: usize, text: &str) -> &mut Self {
        self.lines.push(format!("{} {}", "#".repeat(level), text));
        self.blank()
    }

    pub fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(text.into());
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    /// A block followed by an empty line.
    pub fn block(&mut self, text: impl Into<String>) -> &mut Self {
        self.line(text).blank()
    }

    pub fn image(&mut self, alt: &str, relative_path: &str) -> &mut Self {
        self.block(format!("![{}]({})", alt, relative_path))
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CellValue;

    #[test]
    fn test_markdown_table() {
        let mut table = Table::new(["Genre", "Average Rating", "Anime Count"]);
        table.push_row(vec!["Comedy".into(), CellValue::Float(8.0), CellValue::Int(1)]);
        table.push_row(vec!["A|B".into(), CellValue::Float(7.25), CellValue::Int(2)]);

        assert_eq!(
            markdown_table(&table),
            "| Genre | Average Rating | Anime Count |\n\
             |---|---|---|\n\
             | Comedy | 8.0 | 1 |\n\
             | A\\|B | 7.25 | 2 |"
        );
    }

    #[test]
    fn test_markdown_table_empty() {
        assert_eq!(markdown_table(&Table::default()), "*No data available*");
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(12294), "12,294");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_document_render() {
        let mut doc = MarkdownDocument::new();
        doc.heading(2, "Summary").block("Body").image("Chart", "./charts/a.png");
        assert_eq!(
            doc.render(),
            "## Summary\n\nBody\n\n![Chart](./charts/a.png)\n"
        );
    }
}
