//! Owner notification sinks for emissary.
//!
//! All sinks implement the `emissary_core::Notifier` trait. `build_notifier`
//! wires the configured sink inside the best-effort decorator, so tool calls
//! never wait on or fail because of notification delivery.

pub mod best_effort;
pub mod log;
pub mod pushover;

pub use best_effort::BestEffortNotifier;
pub use log::LogNotifier;
pub use pushover::PushoverNotifier;

use emissary_config::AppConfig;
use emissary_core::notify::Notifier;
use std::sync::Arc;
use tracing::info;

/// Build the notifier the recording tools will use.
///
/// Pushover when both credentials are present, the log sink otherwise;
/// always wrapped in best-effort delivery.
pub fn build_notifier(config: &AppConfig) -> Arc<dyn Notifier> {
    let sink: Arc<dyn Notifier> = match (&config.pushover.user_key, &config.pushover.api_token) {
        (Some(user_key), Some(api_token)) => Arc::new(PushoverNotifier::new(user_key, api_token)),
        _ => {
            info!("Pushover not configured; notifications will be logged");
            Arc::new(LogNotifier)
        }
    };

    Arc::new(BestEffortNotifier::new(sink))
}

#[cfg(test)]
mod tests {
    use super::*;
    use emissary_config::PushoverConfig;

    #[test]
    fn unconfigured_pushover_falls_back_to_log() {
        let config = AppConfig::default();
        let notifier = build_notifier(&config);
        assert_eq!(notifier.name(), "best-effort(log)");
    }

    #[test]
    fn configured_pushover_is_used() {
        let config = AppConfig {
            pushover: PushoverConfig {
                user_key: Some("u".into()),
                api_token: Some("t".into()),
            },
            ..AppConfig::default()
        };
        let notifier = build_notifier(&config);
        assert_eq!(notifier.name(), "best-effort(pushover)");
    }

    #[test]
    fn partial_credentials_fall_back_to_log() {
        let config = AppConfig {
            pushover: PushoverConfig {
                user_key: Some("u".into()),
                api_token: None,
            },
            ..AppConfig::default()
        };
        let notifier = build_notifier(&config);
        assert_eq!(notifier.name(), "best-effort(log)");
    }
}
