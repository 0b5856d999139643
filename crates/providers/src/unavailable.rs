//! Stand-in provider for when no model API key is configured.
//!
//! Every completion fails with `NotConfigured` before any network activity,
//! so the agent's turn surfaces the fixed unavailability reply instead of a
//! confusing upstream 401. This keeps the rest of the assembly identical
//! whether or not credentials exist.

use async_trait::async_trait;
use emissary_core::error::ProviderError;
use emissary_core::provider::{ChatRequest, ChatResponse, Provider};

pub struct UnavailableProvider;

#[async_trait]
impl Provider for UnavailableProvider {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn complete(&self, _request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        Err(ProviderError::NotConfigured(
            "no model API key configured".into(),
        ))
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn complete_fails_without_network() {
        let provider = UnavailableProvider;
        let err = provider
            .complete(ChatRequest {
                model: "gemini-2.0-flash".into(),
                messages: vec![],
                temperature: 0.7,
                max_tokens: None,
                tools: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn health_check_reports_unhealthy() {
        let provider = UnavailableProvider;
        assert!(!provider.health_check().await.unwrap());
    }
}
