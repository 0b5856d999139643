//! The turn loop: one user message in, one assistant reply out.
//!
//! A turn alternates between invoking the model and dispatching the tool
//! calls it requests, feeding each result back as a tool-role message, until
//! the model answers in plain text or the round limit is reached.

use std::sync::Arc;

use chrono::Utc;
use emissary_core::error::ProviderError;
use emissary_core::event::{AgentEvent, EventBus};
use emissary_core::message::{Conversation, Message, Role};
use emissary_core::persona::Persona;
use emissary_core::provider::{ChatRequest, Provider};
use emissary_core::tool::ToolRegistry;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::dispatcher::Dispatcher;

/// Upper bound on model invocations within a single turn.
pub const DEFAULT_MAX_ROUNDS: u32 = 8;

/// Shown for every turn when no model credentials are configured.
pub const UNAVAILABLE_REPLY: &str = "Sorry, the AI assistant is not available. \
     Please contact the administrator to set up the model API key.";

/// Why a turn produced no assistant reply.
#[derive(Debug, Error)]
pub enum TurnError {
    /// The model invocation itself failed
    #[error("model invocation failed: {0}")]
    Model(#[from] ProviderError),

    /// The model kept requesting tools past the round limit
    #[error("no final answer after {rounds} tool rounds")]
    RoundLimit { rounds: u32 },
}

impl TurnError {
    /// A fixed, user-facing rendition of this failure.
    ///
    /// Surfaces that must always answer with some text (the web widget, the
    /// interactive chat) present this instead of the raw error.
    pub fn user_reply(&self) -> String {
        match self {
            Self::Model(ProviderError::NotConfigured(_)) => UNAVAILABLE_REPLY.to_string(),
            Self::Model(err) => {
                format!("Sorry, I encountered an error: {err}. Please try again in a moment.")
            }
            Self::RoundLimit { .. } => "Sorry, I got stuck while looking things up and had to \
                 stop. Please try rephrasing your question."
                .to_string(),
        }
    }
}

/// An agent that answers as a specific person.
///
/// Holds the fixed system prompt built from the persona's context files, the
/// model client, and the tool dispatcher. One instance serves many turns
/// concurrently; it keeps no per-conversation state.
pub struct PersonaAgent {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    persona_name: String,
    system_prompt: String,
    dispatcher: Dispatcher,
    event_bus: Arc<EventBus>,
    max_rounds: u32,
}

impl PersonaAgent {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        persona: &Persona,
        tools: ToolRegistry,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            persona_name: persona.name.clone(),
            system_prompt: persona.system_prompt(),
            dispatcher: Dispatcher::new(Arc::new(tools), event_bus.clone()),
            event_bus,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    pub fn persona_name(&self) -> &str {
        &self.persona_name
    }

    /// Answer one user message given the prior exchange.
    ///
    /// The history is taken as the client sent it, minus any system messages;
    /// the persona's own system prompt always wins. The new user message is
    /// appended after the history.
    pub async fn respond(
        &self,
        message: &str,
        history: &[Message],
    ) -> Result<String, TurnError> {
        let mut conversation = Conversation::new();
        for entry in history {
            if entry.role != Role::System {
                conversation.push(entry.clone());
            }
        }
        conversation.push(Message::user(message));

        self.run_turn(&mut conversation).await
    }

    /// Run the model/tool loop over a conversation until a final reply.
    ///
    /// The conversation is mutated in place: the assistant's tool-call
    /// messages and every tool result are appended in the order they
    /// happened, so the caller sees the full exchange afterwards.
    pub async fn run_turn(&self, conversation: &mut Conversation) -> Result<String, TurnError> {
        self.ensure_system_message(conversation);

        let definitions = self.dispatcher.registry().definitions();

        for round in 1..=self.max_rounds {
            debug!(
                round,
                conversation_id = %conversation.id.0,
                persona = %self.persona_name,
                "Invoking model"
            );

            let request = ChatRequest {
                model: self.model.clone(),
                messages: conversation.messages.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: definitions.clone(),
            };

            let response = match self.provider.complete(request).await {
                Ok(response) => response,
                Err(err) => {
                    warn!(round, error = %err, "Model invocation failed; aborting turn");
                    self.event_bus.publish(AgentEvent::TurnFailed {
                        conversation_id: conversation.id.0.clone(),
                        error_message: err.to_string(),
                        timestamp: Utc::now(),
                    });
                    return Err(TurnError::Model(err));
                }
            };

            if response.wants_tools() {
                let calls = response.message.tool_calls.clone();
                debug!(round, count = calls.len(), "Model requested tool calls");
                conversation.push(response.message);

                // One result per call, in the order the model issued them.
                for call in &calls {
                    let result = self.dispatcher.dispatch(call).await;
                    conversation.push(Message::tool_result(result.call_id, result.content));
                }
                continue;
            }

            let tokens_used = response.usage.as_ref().map(|u| u.total_tokens).unwrap_or(0);
            let served_by = response.model;
            let reply = response.message.content.clone();
            conversation.push(response.message);

            self.event_bus.publish(AgentEvent::ResponseGenerated {
                conversation_id: conversation.id.0.clone(),
                model: served_by,
                rounds: round,
                tokens_used,
                timestamp: Utc::now(),
            });

            info!(rounds = round, tokens_used, "Turn complete");
            return Ok(reply);
        }

        warn!(
            max_rounds = self.max_rounds,
            "Round limit reached without a final answer"
        );
        self.event_bus.publish(AgentEvent::TurnFailed {
            conversation_id: conversation.id.0.clone(),
            error_message: format!("no final answer after {} tool rounds", self.max_rounds),
            timestamp: Utc::now(),
        });

        Err(TurnError::RoundLimit {
            rounds: self.max_rounds,
        })
    }

    /// Make the persona's system prompt the first message, replacing any
    /// system text a caller smuggled in.
    fn ensure_system_message(&self, conversation: &mut Conversation) {
        match conversation.messages.first() {
            Some(first) if first.role == Role::System => {
                conversation.messages[0] = Message::system(self.system_prompt.clone());
            }
            _ => {
                conversation
                    .messages
                    .insert(0, Message::system(self.system_prompt.clone()));
            }
        }
    }
}
