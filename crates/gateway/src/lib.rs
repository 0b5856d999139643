//! HTTP gateway for Emissary.
//!
//! Exposes the website chat widget's backend: a health check and one chat
//! endpoint that runs a full turn per request. The widget always receives a
//! reply body; turn failures are presented as user-facing text, never as
//! 5xx pages.
//!
//! Built on Axum.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use emissary_agent::PersonaAgent;
use emissary_config::{AppConfig, ServerConfig};
use emissary_core::event::{AgentEvent, EventBus};
use emissary_core::message::Message;
use emissary_core::persona::Persona;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub agent: Arc<PersonaAgent>,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes and layers.
///
/// Layers applied:
/// - CORS: the configured exact origin; any origin when none is set; no
///   origin at all when the configured value does not parse
/// - Request body size limit (256 KB; chat messages are small)
/// - In-memory rate limiting (60 req/min per client, /health exempt)
/// - HTTP trace logging
pub fn build_router(state: SharedState, server: &ServerConfig) -> Router {
    let cors = cors_layer(server);
    let rate_limiter = Arc::new(RateLimiter::new(60, Duration::from_secs(60)));

    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(256 * 1024))
        .layer(middleware::from_fn(move |req, next| {
            let limiter = rate_limiter.clone();
            rate_limit_middleware(limiter, req, next)
        }))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origin = match server.allowed_origin.as_deref() {
        Some(origin) => match origin.parse() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                // Config validation rejects these at load time; a hand-built
                // config with a bad origin must narrow, never widen.
                warn!(origin, "Invalid allowed_origin; refusing all cross-origin callers");
                AllowOrigin::list([])
            }
        },
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

/// Start the gateway HTTP server.
///
/// Builds the provider, notifier, tools, persona, and agent once and shares
/// them across all requests.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let provider = emissary_providers::build_provider(&config);
    let notifier = emissary_notify::build_notifier(&config);
    let tools = emissary_tools::registry(notifier);

    let persona = Persona::load(&config.persona_dir(), &config.persona.name);
    if !persona.has_context() {
        warn!(
            dir = %config.persona_dir().display(),
            "No persona context files found; answering from the name alone"
        );
    }

    let event_bus = Arc::new(EventBus::default());
    spawn_event_logger(event_bus.clone());

    let agent = Arc::new(
        PersonaAgent::new(provider, &config.model, &persona, tools, event_bus)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens)
            .with_max_rounds(config.max_tool_rounds),
    );

    let state = Arc::new(GatewayState { agent });
    let app = build_router(state, &config.server);

    info!(addr = %addr, persona = %config.persona.name, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Forward agent events to the log.
///
/// The bus outlives every turn; the task ends when the bus is dropped.
fn spawn_event_logger(bus: Arc<EventBus>) {
    let mut events = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match event.as_ref() {
                    AgentEvent::ResponseGenerated {
                        model,
                        rounds,
                        tokens_used,
                        ..
                    } => {
                        info!(model = %model, rounds, tokens_used, "Turn served");
                    }
                    AgentEvent::ToolDispatched {
                        tool_name,
                        success,
                        duration_ms,
                        ..
                    } => {
                        info!(tool = %tool_name, success, duration_ms, "Tool dispatched");
                    }
                    AgentEvent::TurnFailed { error_message, .. } => {
                        warn!(error = %error_message, "Turn failed");
                    }
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event logger fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

// --- Rate Limiter ---

/// Simple in-memory sliding-window rate limiter.
///
/// Tracks request timestamps per client key. Thread-safe via
/// `std::sync::Mutex` (non-async, held briefly).
struct RateLimiter {
    max_requests: usize,
    window: Duration,
    clients: std::sync::Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Check if the client is within rate limits. Returns `true` if allowed.
    fn check(&self, client_key: &str) -> bool {
        let now = Instant::now();
        let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());

        // Keep the map bounded when many distinct clients show up.
        if clients.len() > 10_000 {
            clients.retain(|_, timestamps| {
                timestamps
                    .last()
                    .is_some_and(|t| now.duration_since(*t) < self.window)
            });
        }

        let timestamps = clients.entry(client_key.to_string()).or_default();
        timestamps.retain(|t| now.duration_since(*t) < self.window);

        if timestamps.len() >= self.max_requests {
            return false;
        }

        timestamps.push(now);
        true
    }
}

/// Rate limiting middleware.
///
/// The client key is the `X-Forwarded-For` header when present (the widget
/// sits behind a reverse proxy), otherwise "anonymous". Returns 429 when
/// the window is exhausted. `/health` is exempt so monitoring can poll it.
async fn rate_limit_middleware(
    limiter: Arc<RateLimiter>,
    req: axum::extract::Request,
    next: Next,
) -> Result<axum::response::Response, StatusCode> {
    if req.uri().path() == "/health" {
        return Ok(next.run(req).await);
    }

    let client_key = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| "anonymous".to_string());

    if !limiter.check(&client_key) {
        warn!(client = %client_key.chars().take(40).collect::<String>(), "Rate limit exceeded");
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    Ok(next.run(req).await)
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Deserialize)]
struct ChatRequestBody {
    /// The visitor's new message
    message: String,

    /// Prior exchange as the widget accumulated it; may be empty
    #[serde(default)]
    history: Vec<Message>,
}

#[derive(Serialize)]
struct ChatResponseBody {
    reply: String,
}

/// Run one turn for the widget.
///
/// Always answers 200 with some reply text: a turn failure becomes its
/// user-facing rendition, so the widget never has to special-case errors.
async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequestBody>,
) -> Result<Json<ChatResponseBody>, StatusCode> {
    if payload.message.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    info!(
        message_len = payload.message.len(),
        history_len = payload.history.len(),
        "Chat message received"
    );

    let reply = match state.agent.respond(&payload.message, &payload.history).await {
        Ok(reply) => reply,
        Err(err) => {
            warn!(error = %err, "Turn failed; replying with the user-facing text");
            err.user_reply()
        }
    };

    Ok(Json(ChatResponseBody { reply }))
}
