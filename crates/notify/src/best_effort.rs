//! Best-effort delivery decorator.
//!
//! Wraps any sink and hands each delivery to a background task: the caller
//! gets `Ok` immediately, failures are logged where the delivery actually
//! happens. A tool call that records a lead must never block on, or fail
//! because of, the push provider.

use async_trait::async_trait;
use emissary_core::error::NotifyError;
use emissary_core::notify::Notifier;
use std::sync::Arc;
use tracing::warn;

pub struct BestEffortNotifier {
    name: String,
    inner: Arc<dyn Notifier>,
}

impl BestEffortNotifier {
    pub fn new(inner: Arc<dyn Notifier>) -> Self {
        Self {
            name: format!("best-effort({})", inner.name()),
            inner,
        }
    }
}

#[async_trait]
impl Notifier for BestEffortNotifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let inner = Arc::clone(&self.inner);
        let message = message.to_string();

        tokio::spawn(async move {
            if let Err(e) = inner.notify(&message).await {
                warn!(sink = inner.name(), error = %e, "Notification delivery failed");
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
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
    async fn delivery_reaches_the_inner_sink() {
        let recording = Arc::new(RecordingNotifier {
            messages: Mutex::new(Vec::new()),
        });
        let notifier = BestEffortNotifier::new(recording.clone());

        notifier.notify("lead recorded").await.unwrap();

        // Delivery happens on a spawned task; give it a moment.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(*recording.messages.lock().unwrap(), vec!["lead recorded"]);
    }

    #[tokio::test]
    async fn inner_failure_is_invisible_to_the_caller() {
        let notifier = BestEffortNotifier::new(Arc::new(FailingNotifier));
        assert!(notifier.notify("will be dropped").await.is_ok());
    }

    #[test]
    fn name_includes_the_inner_sink() {
        let notifier = BestEffortNotifier::new(Arc::new(FailingNotifier));
        assert_eq!(notifier.name(), "best-effort(failing)");
    }
}
