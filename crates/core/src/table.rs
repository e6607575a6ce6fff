//! Tabular tool payloads and their markdown rendering.

use serde::{Deserialize, Serialize};

/// A small column-oriented table (header + string rows).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded, long rows truncated to the header width.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .map(Into::into)
            .take(self.headers.len())
            .collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as a GitHub-flavored markdown table.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&markdown_row(&self.headers));
        out.push('\n');
        out.push_str(&markdown_row(
            &vec!["---".to_string(); self.headers.len()],
        ));
        for row in &self.rows {
            out.push('\n');
            out.push_str(&markdown_row(row));
        }
        out
    }
}

fn markdown_row(cells: &[String]) -> String {
    let escaped: Vec<String> = cells
        .iter()
        .map(|c| c.trim().replace('|', "\\|"))
        .collect();
    format!("| {} |", escaped.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_header_separator_and_rows() {
        let mut table = Table::new(["Município", "População"]);
        table.push_row(["Porto Alegre", "1.332.570"]);
        let md = table.to_markdown();
        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(lines[0], "| Município | População |");
        assert_eq!(lines[1], "| --- | --- |");
        assert_eq!(lines[2], "| Porto Alegre | 1.332.570 |");
    }

    #[test]
    fn rows_are_fitted_to_header_width() {
        let mut table = Table::new(["a", "b"]);
        table.push_row(["1"]);
        table.push_row(["1", "2", "3"]);
        assert_eq!(table.rows[0], vec!["1".to_string(), String::new()]);
        assert_eq!(table.rows[1].len(), 2);
    }

    #[test]
    fn pipes_in_cells_are_escaped() {
        let mut table = Table::new(["x"]);
        table.push_row(["a|b"]);
        assert!(table.to_markdown().contains("a\\|b"));
    }
}
