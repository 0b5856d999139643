//! OpenAI-compatible provider implementation.
//!
//! Works with any endpoint exposing the `/chat/completions` contract:
//! Google's Gemini OpenAI-compat surface, OpenAI itself, vLLM, Ollama.
//!
//! Supports chat completions with tool use / function calling. Responses are
//! always complete (non-streaming).

use async_trait::async_trait;
use emissary_config::GEMINI_BASE_URL;
use emissary_core::error::ProviderError;
use emissary_core::message::{Message, Role, ToolCall};
use emissary_core::provider::{
    ChatRequest, ChatResponse, FinishReason, Provider, ToolDefinition, Usage,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// An OpenAI-compatible chat provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider with the default timeout.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: Self::build_client(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Create a Gemini provider (convenience constructor).
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self::new("gemini", GEMINI_BASE_URL, api_key)
    }

    /// Create an OpenAI provider (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new("openai", "https://api.openai.com/v1", api_key)
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.client = Self::build_client(secs);
        self
    }

    fn build_client(timeout_secs: u64) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Convert our Message types to the wire format.
    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: match m.role {
                    Role::System => "system".into(),
                    Role::User => "user".into(),
                    Role::Assistant => "assistant".into(),
                    Role::Tool => "tool".into(),
                },
                content: Some(m.content.clone()),
                tool_calls: if m.tool_calls.is_empty() {
                    None
                } else {
                    Some(
                        m.tool_calls
                            .iter()
                            .map(|tc| ApiToolCall {
                                id: tc.id.clone(),
                                r#type: "function".into(),
                                function: ApiFunction {
                                    name: tc.name.clone(),
                                    arguments: tc.arguments.clone(),
                                },
                            })
                            .collect(),
                    )
                },
                tool_call_id: m.tool_call_id.clone(),
            })
            .collect()
    }

    /// Convert tool definitions to the wire format.
    fn to_api_tools(tools: &[ToolDefinition]) -> Vec<ApiToolDefinition> {
        tools
            .iter()
            .map(|t| ApiToolDefinition {
                r#type: "function".into(),
                function: ApiToolFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                },
            })
            .collect()
    }

    /// Turn a parsed wire response into the domain response.
    fn to_chat_response(api_response: ApiResponse) -> Result<ChatResponse, ProviderError> {
        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("No choices in response".into()))?;

        let tool_calls: Vec<ToolCall> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let message = Message::assistant_with_calls(
            choice.message.content.unwrap_or_default(),
            tool_calls,
        );

        let usage = api_response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ChatResponse {
            message,
            finish_reason: FinishReason::parse(choice.finish_reason.as_deref()),
            usage,
            model: api_response.model,
        })
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request.messages),
            "temperature": request.temperature,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if !request.tools.is_empty() {
            body["tools"] = serde_json::json!(Self::to_api_tools(&request.tools));
        }

        debug!(provider = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited);
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        Self::to_chat_response(api_response)
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

// --- Wire types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolCall {
    id: String,
    r#type: String,
    function: ApiFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunction {
    name: String,
    arguments: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolDefinition {
    r#type: String,
    function: ApiToolFunction,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gemini_constructor() {
        let provider = OpenAiCompatProvider::gemini("key");
        assert_eq!(provider.name(), "gemini");
        assert!(provider.base_url.contains("generativelanguage.googleapis.com"));
    }

    #[test]
    fn openai_constructor() {
        let provider = OpenAiCompatProvider::openai("sk-test");
        assert_eq!(provider.name(), "openai");
        assert!(provider.base_url.contains("api.openai.com"));
    }

    #[test]
    fn trailing_slash_stripped_from_base_url() {
        let provider = OpenAiCompatProvider::new("test", "https://example.com/v1/", "key");
        assert_eq!(provider.base_url, "https://example.com/v1");
    }

    #[test]
    fn message_conversion() {
        let messages = vec![
            Message::system("You are acting as Ada."),
            Message::user("Hello"),
        ];
        let api_messages = OpenAiCompatProvider::to_api_messages(&messages);
        assert_eq!(api_messages.len(), 2);
        assert_eq!(api_messages[0].role, "system");
        assert_eq!(api_messages[1].role, "user");
    }

    #[test]
    fn message_conversion_with_tool_calls() {
        let msg = Message::assistant_with_calls(
            "",
            vec![ToolCall::new(
                "call_1",
                "record_contact",
                r#"{"email":"a@b.c"}"#,
            )],
        );
        let api_msgs = OpenAiCompatProvider::to_api_messages(&[msg]);
        assert_eq!(api_msgs.len(), 1);
        let tc = api_msgs[0].tool_calls.as_ref().unwrap();
        assert_eq!(tc.len(), 1);
        assert_eq!(tc[0].function.name, "record_contact");
        assert_eq!(tc[0].r#type, "function");
    }

    #[test]
    fn message_conversion_tool_response() {
        let msg = Message::tool_result("call_1", r#"{"recorded":"ok"}"#);
        let api_msgs = OpenAiCompatProvider::to_api_messages(&[msg]);
        assert_eq!(api_msgs[0].role, "tool");
        assert_eq!(api_msgs[0].tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn tool_definition_conversion() {
        let tools = vec![ToolDefinition {
            name: "record_unknown_question".into(),
            description: "Record a question that could not be answered".into(),
            parameters: serde_json::json!({"type": "object"}),
        }];
        let api_tools = OpenAiCompatProvider::to_api_tools(&tools);
        assert_eq!(api_tools.len(), 1);
        assert_eq!(api_tools[0].function.name, "record_unknown_question");
        assert_eq!(api_tools[0].r#type, "function");
    }

    // --- Response parsing tests ---

    #[test]
    fn parse_text_completion() {
        let data = r#"{
            "model": "gemini-2.0-flash",
            "choices": [{
                "message": {"role": "assistant", "content": "Hi, I'm Ada."},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 20, "completion_tokens": 6, "total_tokens": 26}
        }"#;
        let api: ApiResponse = serde_json::from_str(data).unwrap();
        let response = OpenAiCompatProvider::to_chat_response(api).unwrap();

        assert_eq!(response.message.content, "Hi, I'm Ada.");
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert!(!response.wants_tools());
        assert_eq!(response.usage.unwrap().total_tokens, 26);
        assert_eq!(response.model, "gemini-2.0-flash");
    }

    #[test]
    fn parse_tool_call_completion() {
        // Content arrives as null when the model only requests tools.
        let data = r#"{
            "model": "gemini-2.0-flash",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "record_contact", "arguments": "{\"email\":\"a@b.c\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": null
        }"#;
        let api: ApiResponse = serde_json::from_str(data).unwrap();
        let response = OpenAiCompatProvider::to_chat_response(api).unwrap();

        assert_eq!(response.finish_reason, FinishReason::ToolCalls);
        assert!(response.wants_tools());
        assert_eq!(response.message.content, "");
        assert_eq!(response.message.tool_calls.len(), 1);
        assert_eq!(response.message.tool_calls[0].id, "call_abc");
        assert_eq!(response.message.tool_calls[0].name, "record_contact");
        assert_eq!(
            response.message.tool_calls[0].arguments,
            r#"{"email":"a@b.c"}"#
        );
    }

    #[test]
    fn parse_missing_finish_reason() {
        let data = r#"{
            "model": "m",
            "choices": [{"message": {"role": "assistant", "content": "text"}}],
            "usage": null
        }"#;
        let api: ApiResponse = serde_json::from_str(data).unwrap();
        let response = OpenAiCompatProvider::to_chat_response(api).unwrap();
        assert_eq!(response.finish_reason, FinishReason::Unknown);
        // No calls present either, so the turn ends on this message.
        assert!(!response.wants_tools());
    }

    #[test]
    fn empty_choices_is_invalid_response() {
        let data = r#"{"model": "m", "choices": [], "usage": null}"#;
        let api: ApiResponse = serde_json::from_str(data).unwrap();
        let err = OpenAiCompatProvider::to_chat_response(api).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[test]
    fn parse_multiple_tool_calls() {
        let data = r#"{
            "model": "m",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "",
                    "tool_calls": [
                        {"id": "call_a", "type": "function", "function": {"name": "record_unknown_question", "arguments": "{\"question\":\"?\"}"}},
                        {"id": "call_b", "type": "function", "function": {"name": "record_contact", "arguments": "{\"email\":\"x@y.z\"}"}}
                    ]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": null
        }"#;
        let api: ApiResponse = serde_json::from_str(data).unwrap();
        let response = OpenAiCompatProvider::to_chat_response(api).unwrap();
        // Call order is preserved exactly as the model issued it.
        assert_eq!(response.message.tool_calls.len(), 2);
        assert_eq!(response.message.tool_calls[0].id, "call_a");
        assert_eq!(response.message.tool_calls[1].id, "call_b");
    }
}
