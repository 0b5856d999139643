//! Model provider implementations for emissary.
//!
//! All providers implement the `emissary_core::Provider` trait.
//! `build_provider` selects the right one from configuration.

pub mod openai_compat;
pub mod unavailable;

pub use openai_compat::OpenAiCompatProvider;
pub use unavailable::UnavailableProvider;

use emissary_config::AppConfig;
use emissary_core::provider::Provider;
use std::sync::Arc;
use tracing::warn;

/// Build the provider the agent will talk to.
///
/// With an API key, an OpenAI-compatible client against the configured
/// endpoint; without one, the unavailable stand-in so the agent still
/// answers every turn (with the unavailability notice).
pub fn build_provider(config: &AppConfig) -> Arc<dyn Provider> {
    match &config.api_key {
        Some(api_key) => Arc::new(
            OpenAiCompatProvider::new(provider_name(&config.base_url), &config.base_url, api_key)
                .with_timeout(config.request_timeout_secs),
        ),
        None => {
            warn!("No model API key configured; the agent will reply that it is unavailable");
            Arc::new(UnavailableProvider)
        }
    }
}

/// Derive a display name for well-known endpoints.
fn provider_name(base_url: &str) -> &'static str {
    if base_url.contains("generativelanguage.googleapis.com") {
        "gemini"
    } else if base_url.contains("api.openai.com") {
        "openai"
    } else {
        "custom"
    }
}
