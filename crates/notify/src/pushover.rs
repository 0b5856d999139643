//! Pushover notification sink.
//!
//! Delivers owner notifications to the Pushover API, which forwards them to
//! the owner's phone. One POST per notification, form-encoded.

use async_trait::async_trait;
use emissary_core::error::NotifyError;
use emissary_core::notify::Notifier;
use std::time::Duration;
use tracing::debug;

const PUSHOVER_URL: &str = "https://api.pushover.net/1/messages.json";
const TIMEOUT_SECS: u64 = 10;

pub struct PushoverNotifier {
    user_key: String,
    api_token: String,
    client: reqwest::Client,
}

impl PushoverNotifier {
    pub fn new(user_key: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            user_key: user_key.into(),
            api_token: api_token.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(TIMEOUT_SECS))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    fn form_params(&self, message: &str) -> [(&'static str, String); 3] {
        [
            ("token", self.api_token.clone()),
            ("user", self.user_key.clone()),
            ("message", message.to_string()),
        ]
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    fn name(&self) -> &str {
        "pushover"
    }

    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        debug!(len = message.len(), "Sending Pushover notification");

        let response = self
            .client
            .post(PUSHOVER_URL)
            .form(&self.form_params(message))
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status_code: status.as_u16(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_carries_credentials_and_message() {
        let notifier = PushoverNotifier::new("user-key", "app-token");
        let params = notifier.form_params("new lead: a@b.c");

        assert_eq!(params[0], ("token", "app-token".to_string()));
        assert_eq!(params[1], ("user", "user-key".to_string()));
        assert_eq!(params[2], ("message", "new lead: a@b.c".to_string()));
    }

    #[test]
    fn notifier_name() {
        let notifier = PushoverNotifier::new("u", "t");
        assert_eq!(notifier.name(), "pushover");
    }
}
