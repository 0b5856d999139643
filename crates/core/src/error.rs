//! Error types for the emissary domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

/// Errors from a model invocation. A failed invocation aborts the turn;
/// recovery and presentation happen above the provider boundary.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Errors from executing a registered tool. These never abort a turn: the
/// dispatcher converts them into structured error results the model can read.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },
}

/// Errors from a notification sink. Delivery is best-effort: these are logged
/// at the sink boundary and never reach the tool result or the model.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification rejected (status: {status_code})")]
    Rejected { status_code: u16 },

    #[error("Network error: {0}")]
    Network(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_status() {
        let err = ProviderError::ApiError {
            status_code: 500,
            message: "upstream exploded".into(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("upstream exploded"));
    }

    #[test]
    fn tool_error_displays_tool_name() {
        let err = ToolError::ExecutionFailed {
            tool_name: "record_contact".into(),
            reason: "sink unavailable".into(),
        };
        assert!(err.to_string().contains("record_contact"));
        assert!(err.to_string().contains("sink unavailable"));
    }

    #[test]
    fn notify_error_displays_status() {
        let err = NotifyError::Rejected { status_code: 400 };
        assert!(err.to_string().contains("400"));
    }
}
