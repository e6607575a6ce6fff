//! IBGE SIDRA tools — state GDP by year and the most populous municipalities.
//!
//! SIDRA's values API answers with a JSON array of flat objects whose first
//! element describes the columns; data rows follow. Column names vary between
//! tables, so each tool picks the first known name that is present. Shape
//! problems (no rows, no value column, nothing numeric) are answered with a
//! descriptive text rather than an error.

use std::time::Duration;

use async_trait::async_trait;
use regex_lite::Regex;
use rsdados_config::ToolsConfig;
use rsdados_core::error::ToolError;
use rsdados_core::table::Table;
use rsdados_core::tool::{Tool, ToolOutput};
use serde_json::{Map, Value};
use tracing::debug;

type Row = Map<String, Value>;

const YEAR_PATTERN: &str = r"(19|20)\d{2}";
const DEFAULT_GDP_YEAR: &str = "2022";
const POPULATION_YEAR: &str = "2022";
const TOP_N: usize = 5;

const VALUE_COLUMNS: &[&str] = &["V", "Valor", "valor", "Value"];
const UNIT_COLUMNS: &[&str] = &["MN", "Unidade de Medida"];
const MUNICIPALITY_COLUMNS: &[&str] = &["D1N", "Município", "Municipio", "Nome do Município"];
const UF_COLUMNS: &[&str] = &["UF", "Unidade da Federação"];

/// Thin HTTP client for `apisidra.ibge.gov.br/values`.
#[derive(Clone)]
pub struct SidraClient {
    base_url: String,
    client: reqwest::Client,
}

impl SidraClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ToolError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ToolError::NotConfigured(format!("SIDRA HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &ToolsConfig) -> Result<Self, ToolError> {
        Self::new(
            config.sidra_base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Full URL for a table path such as `/t/5938/n3/43/v/37/p/2022`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}?formato=json", self.base_url, path)
    }

    /// Fetch a table and return its data rows (the header row is dropped).
    async fn fetch(&self, url: &str) -> Result<Vec<Row>, ToolError> {
        debug!(url, "Fetching SIDRA table");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ToolError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let rows: Vec<Row> = response
            .json()
            .await
            .map_err(|e| ToolError::Parse(format!("SIDRA JSON: {e}")))?;

        Ok(rows.into_iter().skip(1).collect())
    }
}

/// Regional GDP (table 5938, variable 37) for the year mentioned in the query.
pub struct RegionalGdpTool {
    sidra: SidraClient,
}

impl RegionalGdpTool {
    pub fn new(sidra: SidraClient) -> Self {
        Self { sidra }
    }
}

#[async_trait]
impl Tool for RegionalGdpTool {
    fn name(&self) -> &str {
        "sidra_pib_rs"
    }

    fn description(&self) -> &str {
        "PIB do Rio Grande do Sul a preços correntes (SIDRA/IBGE, tabela 5938)"
    }

    async fn run(&self, query: &str) -> Result<ToolOutput, ToolError> {
        let year = extract_year(query).unwrap_or_else(|| DEFAULT_GDP_YEAR.to_string());
        let url = self.sidra.url(&format!("/t/5938/n3/43/v/37/p/{year}"));
        let source = format!("SIDRA/IBGE • t5938 • {year} • {url}");

        let rows = self.sidra.fetch(&url).await?;
        Ok(ToolOutput::text(describe_gdp(&rows, &year)).with_source(source))
    }
}

fn describe_gdp(rows: &[Row], year: &str) -> String {
    if rows.is_empty() {
        return format!("Não encontrei dados do PIB do RS para {year}.");
    }

    let columns = column_names(rows);
    let Some(value_col) = pick_column(VALUE_COLUMNS, &columns) else {
        return format!(
            "Não foi possível identificar a coluna de valor no retorno do SIDRA para {year}. \
             Colunas disponíveis: {}",
            columns.join(", ")
        );
    };

    let Some((row, value)) = rows
        .iter()
        .find_map(|row| numeric_cell(row, value_col).map(|v| (row, v)))
    else {
        return format!("O retorno do SIDRA para {year} não trouxe valores numéricos.");
    };

    let mut text = format!("PIB do RS em {year}: R$ {}", group_thousands(value));
    if let Some(unit) = pick_column(UNIT_COLUMNS, &columns).and_then(|c| text_cell(row, c)) {
        text.push_str(&format!(" ({unit})"));
    }
    text
}

/// Top municipalities of RS by estimated resident population (table 6579).
pub struct TopMunicipalitiesTool {
    sidra: SidraClient,
}

impl TopMunicipalitiesTool {
    pub fn new(sidra: SidraClient) -> Self {
        Self { sidra }
    }
}

#[async_trait]
impl Tool for TopMunicipalitiesTool {
    fn name(&self) -> &str {
        "sidra_top_municipios"
    }

    fn description(&self) -> &str {
        "Municípios mais populosos do RS (estimativa IBGE, tabela 6579)"
    }

    async fn run(&self, _query: &str) -> Result<ToolOutput, ToolError> {
        let url = self
            .sidra
            .url(&format!("/t/6579/n6/in%20n3%2043/v/9324/p/{POPULATION_YEAR}"));
        let source = format!("SIDRA/IBGE • t6579 • {POPULATION_YEAR} • {url}");

        let rows = self.sidra.fetch(&url).await?;
        let output = match top_municipalities(&rows) {
            Ok(table) => ToolOutput::table(table),
            Err(message) => ToolOutput::text(message),
        };
        Ok(output.with_source(source))
    }
}

fn top_municipalities(rows: &[Row]) -> Result<Table, String> {
    if rows.is_empty() {
        return Err(format!(
            "Não encontrei dados de população para {POPULATION_YEAR}."
        ));
    }

    let columns = column_names(rows);
    let value_col = pick_column(VALUE_COLUMNS, &columns);
    let name_col = pick_column(MUNICIPALITY_COLUMNS, &columns);
    let (Some(value_col), Some(name_col)) = (value_col, name_col) else {
        return Err(format!(
            "Não consegui identificar as colunas esperadas no retorno do SIDRA.\n\
             Colunas disponíveis: {}",
            columns.join(", ")
        ));
    };
    let uf_col = pick_column(UF_COLUMNS, &columns);

    let mut ranked: Vec<(String, f64)> = rows
        .iter()
        .filter(|row| match uf_col {
            Some(col) => text_cell(row, col).as_deref() == Some("Rio Grande do Sul"),
            None => true,
        })
        .filter_map(|row| {
            let name = text_cell(row, name_col)?;
            let value = numeric_cell(row, value_col)?;
            in_rio_grande_do_sul(&name).then(|| (strip_uf_suffix(&name), value))
        })
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut table = Table::new(["Município", "População"]);
    for (name, population) in ranked.into_iter().take(TOP_N) {
        table.push_row([name, group_thousands(population)]);
    }
    Ok(table)
}

/// Municipality labels look like `"Porto Alegre - RS"`; unlabeled names pass.
fn in_rio_grande_do_sul(name: &str) -> bool {
    match name.rsplit_once(" - ") {
        Some((_, uf)) if uf.len() == 2 => uf == "RS",
        _ => true,
    }
}

fn strip_uf_suffix(name: &str) -> String {
    match name.rsplit_once(" - ") {
        Some((base, uf)) if uf.len() == 2 => base.to_string(),
        _ => name.to_string(),
    }
}

/// First four-digit year (19xx/20xx) mentioned in the query.
pub fn extract_year(query: &str) -> Option<String> {
    Regex::new(YEAR_PATTERN)
        .ok()
        .and_then(|re| re.find(query).map(|m| m.as_str().to_string()))
}

fn column_names(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}

fn pick_column<'a>(options: &[&'a str], columns: &[String]) -> Option<&'a str> {
    options
        .iter()
        .copied()
        .find(|option| columns.iter().any(|c| c == option))
}

fn text_cell(row: &Row, column: &str) -> Option<String> {
    match row.get(column)? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// SIDRA encodes missing values as "-", "...", "X"; those yield `None`.
fn numeric_cell(row: &Row, column: &str) -> Option<f64> {
    let value = match row.get(column)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

/// Round to an integer and group thousands with '.' (pt-BR style).
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
