//! # Emissary Core
//!
//! Domain types, traits, and error definitions for the emissary persona
//! agent. This crate has **zero framework dependencies**: it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod event;
pub mod message;
pub mod notify;
pub mod persona;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{NotifyError, ProviderError, ToolError};
pub use event::{AgentEvent, EventBus};
pub use message::{Conversation, ConversationId, Message, Role, ToolCall};
pub use notify::Notifier;
pub use persona::Persona;
pub use provider::{ChatRequest, ChatResponse, FinishReason, Provider, ToolDefinition, Usage};
pub use tool::{Tool, ToolRegistry, ToolResult};
