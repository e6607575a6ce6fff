//! Prompt assembly.
//!
//! Every request is exactly five messages, in this order:
//!
//! 1. system: persona
//! 2. system: memory snapshot
//! 3. user: the raw question
//! 4. system: tool results
//! 5. system: collected sources
//!
//! Empty tool results and empty sources are rendered with the `—` marker so
//! the shape never changes.

use rsdados_core::Message;

use crate::execution::Execution;

/// Built-in persona, used unless configuration overrides it.
pub const DEFAULT_PERSONA: &str = include_str!("prompts/persona.md");

/// Rendered in place of an empty collection.
pub const EMPTY_MARKER: &str = "—";

pub const MEMORY_PREFIX: &str = "Contexto/memória: ";
pub const TOOL_RESULTS_PREFIX: &str = "Resultados de ferramentas:\n";
pub const SOURCES_PREFIX: &str = "Fontes coletadas: ";

/// Build the ordered message list for one question.
pub fn assemble(
    persona: &str,
    memory: &[String],
    query: &str,
    execution: &Execution,
) -> Vec<Message> {
    vec![
        Message::system(persona),
        Message::system(memory_block(memory)),
        Message::user(query),
        Message::system(tool_results_block(&execution.outputs())),
        Message::system(sources_block(&execution.sorted_sources())),
    ]
}

pub fn memory_block(memory: &[String]) -> String {
    format!("{MEMORY_PREFIX}{}", memory.join(" | "))
}

pub fn tool_results_block(outputs: &[String]) -> String {
    if outputs.is_empty() {
        format!("{TOOL_RESULTS_PREFIX}{EMPTY_MARKER}")
    } else {
        format!("{TOOL_RESULTS_PREFIX}{}", outputs.join("\n\n"))
    }
}

/// `sources` must already be sorted and unique.
pub fn sources_block(sources: &[String]) -> String {
    if sources.is_empty() {
        format!("{SOURCES_PREFIX}{EMPTY_MARKER}")
    } else {
        format!("{SOURCES_PREFIX}{}", sources.join("; "))
    }
}
