//! Web search tool — placeholder used as the routing fallback.
//!
//! No search backend is wired in; the tool echoes the question with a
//! labeled citation so the LLM knows no external results were gathered.
//! A real backend (SerpAPI, Tavily, Bing) would slot in behind the same trait.

use async_trait::async_trait;
use rsdados_core::error::ToolError;
use rsdados_core::tool::{Tool, ToolOutput};

pub struct WebSearchTool;

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Busca na web (placeholder sem backend configurado)"
    }

    async fn run(&self, query: &str) -> Result<ToolOutput, ToolError> {
        Ok(
            ToolOutput::text(format!("Pesquisa web (placeholder). Você perguntou: {query}"))
                .with_source("Fonte: buscador público (stub)"),
        )
    }
}
