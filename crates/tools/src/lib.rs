//! Built-in tool implementations for emissary.
//!
//! Two recording tools back the persona's standing instructions: capture a
//! visitor's contact details when offered, and flag every question the model
//! could not answer. Both notify the owner through the configured sink and
//! hand `{"recorded":"ok"}` back to the model.

pub mod record_contact;
pub mod record_unknown_question;

pub use record_contact::RecordContactTool;
pub use record_unknown_question::RecordUnknownQuestionTool;

use emissary_core::notify::Notifier;
use emissary_core::tool::ToolRegistry;
use std::sync::Arc;

/// Create the standard registry with both recording tools.
pub fn registry(notifier: Arc<dyn Notifier>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(RecordContactTool::new(notifier.clone())));
    registry.register(Box::new(RecordUnknownQuestionTool::new(notifier)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use emissary_core::error::NotifyError;

    struct NullNotifier;

    #[async_trait]
    impl Notifier for NullNotifier {
        fn name(&self) -> &str {
            "null"
        }

        async fn notify(&self, _message: &str) -> Result<(), NotifyError> {
            Ok(())
        }
    }

    #[test]
    fn registry_holds_both_recording_tools() {
        let registry = registry(Arc::new(NullNotifier));
        assert_eq!(
            registry.names(),
            vec!["record_contact", "record_unknown_question"]
        );
        assert_eq!(registry.definitions().len(), 2);
    }
}
