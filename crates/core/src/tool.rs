//! Tool trait — the abstraction over dataset fetchers.
//!
//! A tool is a function of the raw user query that produces a payload (plain
//! text or a table) plus the citations it drew on. Tools are bound to
//! capabilities in the [`ToolRegistry`] once, at startup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

use crate::capability::Capability;
use crate::error::ToolError;
use crate::table::Table;

/// What a tool produced, before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Payload {
    Text(String),
    Table(Table),
}

impl Payload {
    /// Tables render as markdown, text is passed through.
    pub fn render(&self) -> String {
        match self {
            Payload::Text(text) => text.clone(),
            Payload::Table(table) => table.to_markdown(),
        }
    }
}

/// The result of one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub payload: Payload,

    /// Source citations (dataset, table, year, URL)
    #[serde(default)]
    pub sources: Vec<String>,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            payload: Payload::Text(text.into()),
            sources: Vec::new(),
        }
    }

    pub fn table(table: Table) -> Self {
        Self {
            payload: Payload::Table(table),
            sources: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }

    pub fn render(&self) -> String {
        self.payload.render()
    }
}

/// The core Tool trait.
///
/// Real fetchers and stubs implement the same signature, so callers are
/// agnostic to which one is bound.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "sidra_pib").
    fn name(&self) -> &str;

    /// A short description of what this tool answers.
    fn description(&self) -> &str;

    /// Answer the raw user query.
    async fn run(&self, query: &str) -> std::result::Result<ToolOutput, ToolError>;
}

/// Placeholder bound when the real integration is unavailable.
///
/// Never fails: answers with a clearly labeled "not configured" note and a
/// synthetic citation tagging itself as a stub.
pub struct StubTool {
    capability: Capability,
    name: String,
    reason: String,
}

impl StubTool {
    pub fn new(capability: Capability, reason: impl Into<String>) -> Self {
        Self {
            capability,
            name: format!("{capability}_stub"),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Tool for StubTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Placeholder for an integration that is not configured"
    }

    async fn run(&self, _query: &str) -> std::result::Result<ToolOutput, ToolError> {
        Ok(ToolOutput::text(format!(
            "[{}] ferramenta ainda não configurada ({}).",
            self.capability, self.reason
        ))
        .with_source(format!("{} • stub", self.capability)))
    }
}

/// Capability → tool bindings, resolved once and shared read-only.
pub struct ToolRegistry {
    tools: HashMap<Capability, Box<dyn Tool>>,
    stubbed: BTreeSet<Capability>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            stubbed: BTreeSet::new(),
        }
    }

    /// Register a tool. Replaces any existing binding for the capability.
    pub fn register(&mut self, capability: Capability, tool: Box<dyn Tool>) {
        self.stubbed.remove(&capability);
        self.tools.insert(capability, tool);
    }

    /// Bind a stub with the given reason.
    pub fn register_stub(&mut self, capability: Capability, reason: impl Into<String>) {
        self.tools
            .insert(capability, Box::new(StubTool::new(capability, reason)));
        self.stubbed.insert(capability);
    }

    /// Bind the outcome of constructing a real tool, falling back to a stub.
    ///
    /// Returns `true` when the real implementation was bound.
    pub fn bind(
        &mut self,
        capability: Capability,
        tool: std::result::Result<Box<dyn Tool>, ToolError>,
    ) -> bool {
        match tool {
            Ok(tool) => {
                self.register(capability, tool);
                true
            }
            Err(e) => {
                warn!(capability = %capability, error = %e, "Tool unavailable, binding stub");
                self.register_stub(capability, e.to_string());
                false
            }
        }
    }

    /// Bind a stub to every capability that has no tool yet.
    pub fn fill_missing_with_stubs(&mut self) {
        for capability in Capability::ALL {
            if !self.tools.contains_key(&capability) {
                self.register_stub(capability, "nenhuma implementação registrada");
            }
        }
    }

    /// Get the tool bound to a capability.
    pub fn get(&self, capability: Capability) -> Option<&dyn Tool> {
        self.tools.get(&capability).map(|t| t.as_ref())
    }

    /// Whether the capability is currently served by a stub.
    pub fn is_stub(&self, capability: Capability) -> bool {
        self.stubbed.contains(&capability)
    }

    /// Capabilities served by stubs, in enum order.
    pub fn stubs(&self) -> Vec<Capability> {
        self.stubbed.iter().copied().collect()
    }

    /// All bound capabilities, in enum order.
    pub fn capabilities(&self) -> Vec<Capability> {
        let mut caps: Vec<Capability> = self.tools.keys().copied().collect();
        caps.sort();
        caps
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
