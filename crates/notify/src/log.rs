//! Log-only notification sink.
//!
//! Used when Pushover credentials are absent: notifications still land
//! somewhere the owner can find them, just not on a phone.

use async_trait::async_trait;
use emissary_core::error::NotifyError;
use emissary_core::notify::Notifier;
use tracing::info;

pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        info!(notification = %message, "Push notifications disabled; logging instead");
        Ok(())
    }
}
