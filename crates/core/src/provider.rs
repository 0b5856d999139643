//! Provider trait: the abstraction over chat-completion backends.
//!
//! A Provider sends a conversation plus the advertised tool definitions to a
//! model and returns one complete response. One request, one response; there
//! is no streaming surface.
//!
//! Implementations: OpenAI-compatible endpoints (Gemini, OpenAI) and an
//! unconfigured stand-in.

use crate::error::ProviderError;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The model to use (e.g., "gemini-2.0-flash", "gpt-4o-mini")
    pub model: String,

    /// The conversation messages, system message first
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic, 2.0 = chaotic)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Tools the model may request
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

fn default_temperature() -> f32 {
    0.7
}

/// A tool definition advertised to the model so it knows what it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// Why the model stopped generating.
///
/// The orchestration loop keys on this: `ToolCalls` means dispatch and go
/// around again, anything else means the turn is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of the reply
    Stop,
    /// The model is requesting tool invocations
    ToolCalls,
    /// Output truncated at the token limit
    Length,
    /// Upstream content filter intervened
    ContentFilter,
    /// Anything the wire sent that we do not recognize
    Unknown,
}

impl FinishReason {
    /// Map the wire-level `finish_reason` string onto the enum. Absent or
    /// unrecognized values become `Unknown`; the loop then falls back to
    /// inspecting the message's tool calls.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("stop") => Self::Stop,
            Some("tool_calls") => Self::ToolCalls,
            Some("length") => Self::Length,
            Some("content_filter") => Self::ContentFilter,
            _ => Self::Unknown,
        }
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The generated assistant message
    pub message: Message,

    /// Why generation stopped
    pub finish_reason: FinishReason,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

impl ChatResponse {
    /// True when this response is requesting tool dispatch.
    ///
    /// Some OpenAI-compatible backends send `finish_reason: "stop"` even when
    /// tool calls are present, so the call list wins over the finish signal.
    pub fn wants_tools(&self) -> bool {
        self.finish_reason == FinishReason::ToolCalls || !self.message.tool_calls.is_empty()
    }
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The turn loop calls `complete()` without knowing which backend is behind
/// it; swapping Gemini for OpenAI is a configuration change.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: ChatRequest,
    ) -> std::result::Result<ChatResponse, ProviderError>;

    /// Health check: can we reach the backend?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_defaults() {
        let req = ChatRequest {
            model: "gemini-2.0-flash".into(),
            messages: vec![],
            temperature: default_temperature(),
            max_tokens: None,
            tools: vec![],
        };
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert!(req.tools.is_empty());
    }

    #[test]
    fn finish_reason_parses_known_values() {
        assert_eq!(FinishReason::parse(Some("stop")), FinishReason::Stop);
        assert_eq!(FinishReason::parse(Some("tool_calls")), FinishReason::ToolCalls);
        assert_eq!(FinishReason::parse(Some("length")), FinishReason::Length);
        assert_eq!(
            FinishReason::parse(Some("content_filter")),
            FinishReason::ContentFilter
        );
        assert_eq!(FinishReason::parse(Some("who_knows")), FinishReason::Unknown);
        assert_eq!(FinishReason::parse(None), FinishReason::Unknown);
    }

    #[test]
    fn tool_calls_win_over_finish_reason() {
        use crate::message::{Message, ToolCall};
        let response = ChatResponse {
            message: Message::assistant_with_calls(
                "",
                vec![ToolCall::new("call_1", "record_contact", "{}")],
            ),
            finish_reason: FinishReason::Stop,
            usage: None,
            model: "gemini-2.0-flash".into(),
        };
        assert!(response.wants_tools());
    }

    #[test]
    fn tool_definition_serialization() {
        let tool = ToolDefinition {
            name: "record_contact".into(),
            description: "Record a visitor's contact details".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "email": { "type": "string", "description": "The visitor's email address" }
                },
                "required": ["email"],
                "additionalProperties": false
            }),
        };
        let json = serde_json::to_string(&tool).unwrap();
        assert!(json.contains("record_contact"));
        assert!(json.contains("additionalProperties"));
    }
}
