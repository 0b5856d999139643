//! Notifier trait: the abstraction over push-notification sinks.
//!
//! Tools use a Notifier to tell the persona's owner something happened (a
//! visitor left contact details, the model hit a question it could not
//! answer). Delivery is best-effort by contract: implementations may fail,
//! but the decorator in the notify crate guarantees the failure never reaches
//! the tool result.

use crate::error::NotifyError;
use async_trait::async_trait;

/// A named sink for short owner-facing notification texts.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A human-readable name for this sink (e.g., "pushover", "log").
    fn name(&self) -> &str;

    /// Deliver one notification message.
    async fn notify(&self, message: &str) -> std::result::Result<(), NotifyError>;
}
