//! Table formatter — renders delimited text as a markdown table.
//!
//! The first non-blank line is the header. The delimiter is detected from it:
//! tab, then `;`, then `,`.

use async_trait::async_trait;
use rsdados_core::error::ToolError;
use rsdados_core::table::Table;
use rsdados_core::tool::{Tool, ToolOutput};

pub struct TableFormatTool;

#[async_trait]
impl Tool for TableFormatTool {
    fn name(&self) -> &str {
        "table_format"
    }

    fn description(&self) -> &str {
        "Formata texto delimitado (CSV, ponto e vírgula ou tabulação) como tabela markdown"
    }

    async fn run(&self, query: &str) -> Result<ToolOutput, ToolError> {
        Ok(match parse_delimited(query) {
            Some(table) => ToolOutput::table(table),
            None => ToolOutput::text("Nenhum dado tabular informado."),
        })
    }
}

fn parse_delimited(input: &str) -> Option<Table> {
    let mut lines = input.lines().map(str::trim).filter(|l| !l.is_empty());
    let header = lines.next()?;

    let delimiter = ['\t', ';', ',']
        .into_iter()
        .find(|d| header.contains(*d))
        .unwrap_or(',');

    let mut table = Table::new(header.split(delimiter).map(str::trim));
    for line in lines {
        table.push_row(line.split(delimiter).map(str::trim));
    }
    Some(table)
}
