//! Configuration loading, validation, and management for emissary.
//!
//! Loads configuration from `~/.emissary/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The default Gemini OpenAI-compatible endpoint.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// The root configuration structure.
///
/// Maps directly to `~/.emissary/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the model endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible chat endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model to request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per model response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Maximum model invocations per turn before the turn is aborted
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: u32,

    /// Per-request timeout for model calls, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// The represented person
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Pushover notification credentials
    #[serde(default)]
    pub pushover: PushoverConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_base_url() -> String {
    GEMINI_BASE_URL.into()
}
fn default_model() -> String {
    "gemini-2.0-flash".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_max_tool_rounds() -> u32 {
    8
}
fn default_request_timeout_secs() -> u64 {
    60
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_tool_rounds", &self.max_tool_rounds)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("persona", &self.persona)
            .field("pushover", &self.pushover)
            .field("server", &self.server)
            .finish()
    }
}

/// Who the agent speaks as and where its context files live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// The represented person's name
    #[serde(default = "default_persona_name")]
    pub name: String,

    /// Directory holding summary.md / profile.md. Empty = ~/.emissary/persona
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

fn default_persona_name() -> String {
    "Your Name".into()
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: default_persona_name(),
            dir: None,
        }
    }
}

/// Pushover credentials. Both keys present = notifications go to the phone;
/// anything less = notifications go to the log.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PushoverConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

impl PushoverConfig {
    pub fn is_configured(&self) -> bool {
        self.user_key.is_some() && self.api_token.is_some()
    }
}

impl std::fmt::Debug for PushoverConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushoverConfig")
            .field("user_key", &redact(&self.user_key))
            .field("api_token", &redact(&self.api_token))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Exact origin allowed by CORS. Empty = any origin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_origin: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8309
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origin: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.emissary/config.toml).
    ///
    /// Also checks environment variables:
    /// - `EMISSARY_API_KEY` (highest priority), then `GOOGLE_API_KEY`,
    ///   then `OPENAI_API_KEY` for the model key
    /// - `EMISSARY_BASE_URL` and `EMISSARY_MODEL` for the endpoint
    /// - `PUSHOVER_USER` and `PUSHOVER_TOKEN` for notifications
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        // Environment variable overrides (highest priority)
        if config.api_key.is_none() {
            config.api_key = std::env::var("EMISSARY_API_KEY")
                .ok()
                .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(base_url) = std::env::var("EMISSARY_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(model) = std::env::var("EMISSARY_MODEL") {
            config.model = model;
        }

        if config.pushover.user_key.is_none() {
            config.pushover.user_key = std::env::var("PUSHOVER_USER").ok();
        }
        if config.pushover.api_token.is_none() {
            config.pushover.api_token = std::env::var("PUSHOVER_TOKEN").ok();
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".emissary")
    }

    /// Resolve the persona context directory.
    pub fn persona_dir(&self) -> PathBuf {
        match &self.persona.dir {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => Self::config_dir().join("persona"),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.max_tool_rounds == 0 {
            return Err(ConfigError::ValidationError(
                "max_tool_rounds must be at least 1".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be at least 1".into(),
            ));
        }

        if self.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "base_url must not be empty".into(),
            ));
        }

        // An origin is scheme://host[:port]; a value with a path or
        // whitespace never matches a browser's Origin header.
        if let Some(origin) = &self.server.allowed_origin {
            let host = origin
                .strip_prefix("https://")
                .or_else(|| origin.strip_prefix("http://"));
            let well_formed = host.is_some_and(|host| {
                !host.is_empty() && !host.contains('/') && !host.contains(char::is_whitespace)
            });
            if !well_formed {
                return Err(ConfigError::ValidationError(
                    "server.allowed_origin must be an exact origin like https://example.com"
                        .into(),
                ));
            }
        }

        Ok(())
    }

    /// Check if a model API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_tool_rounds: default_max_tool_rounds(),
            request_timeout_secs: default_request_timeout_secs(),
            persona: PersonaConfig::default(),
            pushover: PushoverConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
