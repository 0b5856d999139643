//! The turn loop — the heart of Emissary.
//!
//! Each turn follows an **Ask → Act → Answer** cycle:
//!
//! 1. **Receive** a user message plus the prior exchange
//! 2. **Assemble** the conversation (persona system prompt + history + message)
//! 3. **Invoke the model** via the configured provider, tools advertised
//! 4. **If tool calls**: dispatch each one, append the results, loop to step 3
//! 5. **If plain text**: return it as the reply
//!
//! The loop is bounded: after `max_rounds` model invocations without a plain
//! answer, the turn fails with a typed error instead of spinning.

pub mod dispatcher;
pub mod turn;

pub use dispatcher::Dispatcher;
pub use turn::{PersonaAgent, TurnError, DEFAULT_MAX_ROUNDS, UNAVAILABLE_REPLY};
