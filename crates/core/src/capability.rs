//! Capabilities — the fixed set of user needs the agent knows how to serve.
//!
//! Every capability is bound to exactly one tool in the [`ToolRegistry`]
//! (a real implementation or a stub), so lookups by capability never miss.
//!
//! [`ToolRegistry`]: crate::tool::ToolRegistry

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named class of user need, resolved to one tool implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Gross domestic product of the state for a given year.
    RegionalGdp,
    /// Most populous municipalities of the state.
    TopMunicipalities,
    /// Public health indicators (DataSUS).
    HealthIndicators,
    /// State budget execution (revenue / expenditure).
    BudgetExecution,
    /// Free-form web search, used as the routing fallback.
    WebSearch,
    /// Renders delimited text as a markdown table.
    TableFormat,
}

impl Capability {
    /// Every capability, in registry order.
    pub const ALL: [Capability; 6] = [
        Capability::RegionalGdp,
        Capability::TopMunicipalities,
        Capability::HealthIndicators,
        Capability::BudgetExecution,
        Capability::WebSearch,
        Capability::TableFormat,
    ];

    /// Stable wire name (used in config, logs, and inline error lines).
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::RegionalGdp => "regional_gdp",
            Capability::TopMunicipalities => "top_municipalities",
            Capability::HealthIndicators => "health_indicators",
            Capability::BudgetExecution => "budget_execution",
            Capability::WebSearch => "web_search",
            Capability::TableFormat => "table_format",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| format!("unknown capability '{s}'"))
    }
}
