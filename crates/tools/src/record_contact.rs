//! Records that a visitor wants to get in touch.
//!
//! The model calls this once a visitor shares an email address. The owner is
//! pinged through the notifier; the model only ever sees `{"recorded":"ok"}`.

use async_trait::async_trait;
use emissary_core::error::ToolError;
use emissary_core::notify::Notifier;
use emissary_core::tool::Tool;
use std::sync::Arc;
use tracing::info;

pub struct RecordContactTool {
    notifier: Arc<dyn Notifier>,
}

impl RecordContactTool {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    fn notification_text(email: &str, name: &str, notes: &str) -> String {
        format!("Recording interest from {name} with email {email} and notes {notes}")
    }
}

#[async_trait]
impl Tool for RecordContactTool {
    fn name(&self) -> &str {
        "record_contact"
    }

    fn description(&self) -> &str {
        "Use this tool to record that a user is interested in being in touch and provided an email address"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "email": {
                    "type": "string",
                    "description": "The email address of this user"
                },
                "name": {
                    "type": "string",
                    "description": "The user's name, if they provided it"
                },
                "notes": {
                    "type": "string",
                    "description": "Any additional information about the conversation that's worth recording to give context"
                }
            },
            "required": ["email"],
            "additionalProperties": false
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let email = arguments["email"]
            .as_str()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'email' argument".into()))?;

        let name = arguments["name"].as_str().unwrap_or("Name not provided");
        let notes = arguments["notes"].as_str().unwrap_or("not provided");

        info!(email, "Recording visitor contact details");

        // Delivery is best-effort; a sink failure must not fail the recording.
        let _ = self
            .notifier
            .notify(&Self::notification_text(email, name, notes))
            .await;

        Ok(serde_json::json!({"recorded": "ok"}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emissary_core::error::NotifyError;
    use std::sync::Mutex;

    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                messages: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        fn name(&self) -> &str {
            "recording"
        }

        async fn notify(&self, message: &str) -> Result<(), NotifyError> {
            self.messages.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        fn name(&self) -> &str {
            "failing"
        }

        async fn notify(&self, _message: &str) -> Result<(), NotifyError> {
            Err(NotifyError::Rejected { status_code: 500 })
        }
    }

    #[tokio::test]
    async fn records_contact_and_notifies() {
        let notifier = RecordingNotifier::new();
        let tool = RecordContactTool::new(notifier.clone());

        let result = tool
            .execute(serde_json::json!({
                "email": "visitor@example.com",
                "name": "Pat",
                "notes": "asking about consulting"
            }))
            .await
            .unwrap();

        assert_eq!(result, serde_json::json!({"recorded": "ok"}));

        let messages = notifier.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("visitor@example.com"));
        assert!(messages[0].contains("Pat"));
        assert!(messages[0].contains("consulting"));
    }

    #[tokio::test]
    async fn optional_fields_get_placeholders() {
        let notifier = RecordingNotifier::new();
        let tool = RecordContactTool::new(notifier.clone());

        tool.execute(serde_json::json!({"email": "a@b.c"}))
            .await
            .unwrap();

        let messages = notifier.messages.lock().unwrap();
        assert!(messages[0].contains("Name not provided"));
        assert!(messages[0].contains("not provided"));
    }

    #[tokio::test]
    async fn missing_email_is_invalid_arguments() {
        let tool = RecordContactTool::new(RecordingNotifier::new());
        let err = tool
            .execute(serde_json::json!({"name": "Pat"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn blank_email_is_invalid_arguments() {
        let tool = RecordContactTool::new(RecordingNotifier::new());
        let err = tool
            .execute(serde_json::json!({"email": "   "}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn notifier_failure_does_not_fail_the_recording() {
        let tool = RecordContactTool::new(Arc::new(FailingNotifier));
        let result = tool
            .execute(serde_json::json!({"email": "a@b.c"}))
            .await
            .unwrap();
        assert_eq!(result, serde_json::json!({"recorded": "ok"}));
    }

    #[test]
    fn tool_definition_schema_is_closed() {
        let tool = RecordContactTool::new(RecordingNotifier::new());
        let def = tool.to_definition();
        assert_eq!(def.name, "record_contact");
        assert_eq!(def.parameters["additionalProperties"], false);
        assert_eq!(def.parameters["required"], serde_json::json!(["email"]));
    }
}
