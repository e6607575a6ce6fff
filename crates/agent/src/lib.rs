//! The RS-Dados agent. Answers questions about public data of Rio Grande do Sul.
//!
//! Each question runs one fixed pipeline:
//!
//! 1. **Remember** the raw question in a bounded memory
//! 2. **Route** it to capabilities by keyword
//! 3. **Execute** the bound tools, isolating failures and collecting sources
//! 4. **Assemble** the five-message prompt
//! 5. **Complete** through the LLM gateway, which always yields text
//!
//! There is no tool-calling loop: the model sees tool results once and writes
//! the final prose.

pub mod execution;
pub mod llm;
pub mod memory;
pub mod orchestrator;
pub mod prompt;
pub mod router;

pub use execution::{Execution, ToolRun, execute};
pub use llm::LlmGateway;
pub use memory::QueryMemory;
pub use orchestrator::{Orchestrator, Prepared};
pub use prompt::{DEFAULT_PERSONA, assemble};
pub use router::{IntentRouter, Rule};
