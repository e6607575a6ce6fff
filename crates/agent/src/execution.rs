//! Execution loop: runs the routed tools and collects their outputs.
//!
//! Tools of one request are polled concurrently but results are kept in
//! router order. Each tool is isolated: an error or a panic becomes a labeled
//! inline line and never stops the others. Citations are gathered into a
//! sorted set, so duplicates collapse and completion order is irrelevant.

use std::collections::BTreeSet;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures::FutureExt;
use futures::future::join_all;
use rsdados_core::{Capability, ToolRegistry};
use serde::Serialize;
use tracing::{debug, warn};

/// Outcome of one capability's tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolRun {
    pub capability: Capability,
    /// Rendered payload, or the labeled error line
    pub text: String,
    pub succeeded: bool,
    pub elapsed_ms: u64,
}

/// Everything the tools produced for one query.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Execution {
    pub runs: Vec<ToolRun>,
    /// Unique citations, lexicographically sorted
    pub sources: BTreeSet<String>,
}

impl Execution {
    /// Rendered outputs in router order.
    pub fn outputs(&self) -> Vec<String> {
        self.runs.iter().map(|r| r.text.clone()).collect()
    }

    pub fn sorted_sources(&self) -> Vec<String> {
        self.sources.iter().cloned().collect()
    }

    pub fn failures(&self) -> usize {
        self.runs.iter().filter(|r| !r.succeeded).count()
    }
}

/// Run every capability's tool against the raw query.
pub async fn execute(
    registry: &ToolRegistry,
    query: &str,
    capabilities: &[Capability],
) -> Execution {
    let outcomes = join_all(
        capabilities
            .iter()
            .map(|&capability| run_capability(registry, query, capability)),
    )
    .await;

    let mut execution = Execution::default();
    for (run, sources) in outcomes {
        execution.sources.extend(sources);
        execution.runs.push(run);
    }

    debug!(
        tools = execution.runs.len(),
        failures = execution.failures(),
        sources = execution.sources.len(),
        "Tool execution finished"
    );
    execution
}

async fn run_capability(
    registry: &ToolRegistry,
    query: &str,
    capability: Capability,
) -> (ToolRun, Vec<String>) {
    let Some(tool) = registry.get(capability) else {
        warn!(capability = %capability, "No tool bound to capability");
        let run = ToolRun {
            capability,
            text: format!("[{capability}] ferramenta não encontrada."),
            succeeded: false,
            elapsed_ms: 0,
        };
        return (run, Vec::new());
    };

    let started = Instant::now();
    let outcome = AssertUnwindSafe(tool.run(query)).catch_unwind().await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let (text, succeeded, sources) = match outcome {
        Ok(Ok(output)) => {
            debug!(capability = %capability, tool = tool.name(), elapsed_ms, "Tool succeeded");
            (output.render(), true, output.sources)
        }
        Ok(Err(e)) => {
            warn!(capability = %capability, tool = tool.name(), error = %e, "Tool failed");
            (format!("[{capability}] erro: {e}"), false, Vec::new())
        }
        Err(panic) => {
            let detail = panic_message(panic.as_ref());
            warn!(capability = %capability, tool = tool.name(), panic = %detail, "Tool panicked");
            (format!("[{capability}] erro: {detail}"), false, Vec::new())
        }
    };

    let run = ToolRun {
        capability,
        text,
        succeeded,
        elapsed_ms,
    };
    (run, sources)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic".to_string()
    }
}
