//! # RS-Dados Core
//!
//! Domain types, traits, and error definitions for the RS-Dados conversational
//! agent. This crate has **no framework dependencies**: it defines the model
//! every other crate implements against.
//!
//! ## Design Philosophy
//!
//! Each external collaborator (dataset fetchers, the LLM backend) is a trait
//! here. Implementations live in their respective crates, which keeps the
//! orchestration logic testable with in-process doubles.

pub mod capability;
pub mod error;
pub mod message;
pub mod provider;
pub mod table;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use capability::Capability;
pub use error::{Error, ProviderError, Result, ToolError};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use table::Table;
pub use tool::{Payload, StubTool, Tool, ToolOutput, ToolRegistry};
