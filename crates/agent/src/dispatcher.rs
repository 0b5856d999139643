//! Total tool dispatch.
//!
//! The dispatcher sits between the model's requested tool calls and the
//! registry of real tools. It never fails the turn: every outcome, including
//! an unknown tool name or undecodable arguments, is encoded as a
//! [`ToolResult`] whose content the model can read and recover from on the
//! next round.

use std::sync::Arc;
use std::time::Instant;

use emissary_core::error::ToolError;
use emissary_core::event::{AgentEvent, EventBus};
use emissary_core::message::ToolCall;
use emissary_core::tool::{Tool, ToolRegistry, ToolResult};
use serde_json::json;
use tracing::{debug, warn};

/// Routes tool calls to registered tools and encodes the outcome.
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    event_bus: Arc<EventBus>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, event_bus: Arc<EventBus>) -> Self {
        Self {
            registry,
            event_bus,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Execute a single tool call.
    ///
    /// Always returns a result carrying the call's id, so the conversation
    /// stays well-formed no matter what the model asked for. Failures are
    /// reported in the result body as JSON the model can act on:
    /// `{"error": "unknown_tool"}`, `{"error": "bad_arguments"}` or
    /// `{"error": "tool_failed"}`, each with a human-readable `detail`.
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        let started = Instant::now();
        let result = self.dispatch_inner(call).await;

        self.event_bus.publish(AgentEvent::ToolDispatched {
            tool_name: call.name.clone(),
            success: result.success,
            duration_ms: started.elapsed().as_millis() as u64,
            timestamp: chrono::Utc::now(),
        });

        result
    }

    async fn dispatch_inner(&self, call: &ToolCall) -> ToolResult {
        let Some(tool) = self.registry.get(&call.name) else {
            warn!(tool = %call.name, "Model requested an unregistered tool");
            return ToolResult::failed(
                &call.id,
                json!({
                    "error": "unknown_tool",
                    "detail": format!("no tool named '{}' is available", call.name),
                })
                .to_string(),
            );
        };

        let arguments = match decode_arguments(&call.arguments) {
            Ok(value) => value,
            Err(reason) => {
                warn!(tool = %call.name, %reason, "Rejecting malformed tool arguments");
                return ToolResult::failed(
                    &call.id,
                    json!({ "error": "bad_arguments", "detail": reason }).to_string(),
                );
            }
        };

        debug!(tool = %call.name, call_id = %call.id, "Dispatching tool call");

        match tool.execute(arguments).await {
            Ok(value) => ToolResult::ok(&call.id, value.to_string()),
            Err(ToolError::InvalidArguments(reason)) => ToolResult::failed(
                &call.id,
                json!({ "error": "bad_arguments", "detail": reason }).to_string(),
            ),
            Err(err) => {
                warn!(tool = %call.name, error = %err, "Tool execution failed");
                ToolResult::failed(
                    &call.id,
                    json!({ "error": "tool_failed", "detail": err.to_string() }).to_string(),
                )
            }
        }
    }
}

/// Decode the raw argument string a model attached to a tool call.
///
/// Models occasionally send an empty string for a no-argument call; that is
/// treated as an empty object. Anything that parses to a non-object is
/// rejected, since tool schemas describe objects.
fn decode_arguments(raw: &str) -> Result<serde_json::Value, String> {
    if raw.trim().is_empty() {
        return Ok(json!({}));
    }

    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| format!("arguments are not valid JSON: {e}"))?;

    if !value.is_object() {
        return Err(format!(
            "arguments must be a JSON object, got {}",
            type_name(&value)
        ));
    }

    Ok(value)
}

fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
