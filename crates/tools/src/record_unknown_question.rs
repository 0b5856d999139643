//! Records a question the model could not answer.
//!
//! The persona prompt tells the model to call this whenever it does not know
//! an answer, however trivial the question. Each recorded question is pushed
//! to the owner so the persona context can be improved.

use async_trait::async_trait;
use emissary_core::error::ToolError;
use emissary_core::notify::Notifier;
use emissary_core::tool::Tool;
use std::sync::Arc;
use tracing::info;

pub struct RecordUnknownQuestionTool {
    notifier: Arc<dyn Notifier>,
}

impl RecordUnknownQuestionTool {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl Tool for RecordUnknownQuestionTool {
    fn name(&self) -> &str {
        "record_unknown_question"
    }

    fn description(&self) -> &str {
        "Always use this tool to record any question that couldn't be answered as you didn't know the answer"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "The question that couldn't be answered"
                }
            },
            "required": ["question"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let question = arguments["question"]
            .as_str()
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'question' argument".into()))?;

        info!(question, "Recording unanswered question");

        let _ = self
            .notifier
            .notify(&format!("Recording {question} asked that I couldn't answer"))
            .await;

        Ok(serde_json::json!({"recorded": "ok"}))
    }
}
