//! Tool trait: the abstraction over the agent's local capabilities.
//!
//! Tools are what the model can do besides talk: record a visitor's contact
//! details, flag a question it could not answer. They execute locally, never
//! against the model API.

use crate::error::ToolError;
use crate::provider::ToolDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The result of dispatching one tool call, appended to the conversation as
/// a tool-role message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// The model-issued call ID this result answers
    pub call_id: String,

    /// Whether the tool executed successfully
    pub success: bool,

    /// JSON text: the tool's return value, or a structured error object
    pub content: String,
}

impl ToolResult {
    pub fn ok(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            success: true,
            content: content.into(),
        }
    }

    pub fn failed(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            success: false,
            content: content.into(),
        }
    }
}

/// The core Tool trait.
///
/// `execute` receives arguments already decoded to a JSON object and returns
/// the raw value to hand back to the model. Call IDs, encoding, and error
/// recovery are the dispatcher's job, not the tool's.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "record_contact").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters. Schemas are closed:
    /// they carry `additionalProperties: false`.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, ToolError>;

    /// Convert this tool into a ToolDefinition for advertising to the model.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools.
///
/// The dispatcher uses this to look tools up by name; the turn loop uses it
/// to advertise definitions on every model invocation. Adding a tool means
/// registering it here, nothing in the loop changes.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool definitions (for advertising to the model).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| t.to_definition()).collect();
        // HashMap iteration order is arbitrary; keep the advertised list stable.
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// List all registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
