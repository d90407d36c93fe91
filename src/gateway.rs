//! Response gateway — turns a submitted message into display text.
//!
//! Sits between the presentation layer and the agent client: makes sure
//! the provider has decided whether a client exists, feeds the message to
//! the client, folds the streamed chunks into a running answer, and
//! converts every failure into a string the UI can show. Nothing past
//! this module ever sees an error value, and no call finishes without a
//! displayable result.

use std::sync::Arc;

use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use tracing::{error, info};

use crate::agent::{AgentClient, ConversationHistory};
use crate::error::Error;
use crate::provider::{ClientProvider, ProviderState};

/// Shown when the chunk stream ends without a single displayable snapshot.
pub const NO_RESPONSE: &str = "Agent did not return a response.";

/// Shown when the user submits an empty message.
pub const EMPTY_INPUT: &str = "(empty)";

/// Gateway between the presentation layer and the agent client.
pub struct ResponseGateway {
    provider: Arc<ClientProvider>,
}

impl ResponseGateway {
    pub fn new(provider: Arc<ClientProvider>) -> Self {
        Self { provider }
    }

    /// Answer `message` as a single final string.
    pub async fn respond(&self, message: &str) -> String {
        let client = match self.acquire_client().await {
            Ok(client) => client,
            Err(text) => return text,
        };
        if message.is_empty() {
            return EMPTY_INPUT.to_string();
        }

        info!("forwarding message to agent: {} chars", message.len());

        let mut chunks = client.stream_respond(message);
        let mut final_response = NO_RESPONSE.to_string();
        while let Some(item) = chunks.next().await {
            match item {
                Ok(chunk) => {
                    // Later snapshots fully replace earlier ones; chunks
                    // without a string output keep the previous value.
                    if let Some(text) = chunk.output_text() {
                        final_response = text.to_string();
                    }
                }
                Err(e) => return execution_failure(&e),
            }
        }
        final_response
    }

    /// Answer `message` as a lazy sequence of growing snapshots.
    ///
    /// The stream is finite, yields at least one element, and ends either
    /// with the complete answer or with a failure string. Snapshots already
    /// yielded are never retracted. It cannot be restarted; call again for
    /// a fresh answer.
    pub fn respond_stream(&self, message: impl Into<String>) -> BoxStream<'static, String> {
        let provider = Arc::clone(&self.provider);
        let message = message.into();

        Box::pin(async_stream::stream! {
            let state = provider.ensure_ready().await;
            let client = match state.ready_client() {
                Some(client) => client,
                None => {
                    yield failure_text(&state);
                    return;
                }
            };
            if message.is_empty() {
                yield EMPTY_INPUT.to_string();
                return;
            }

            info!("streaming message to agent: {} chars", message.len());

            let mut chunks = client.stream_respond(&message);
            let mut final_response = NO_RESPONSE.to_string();
            let mut produced = false;
            while let Some(item) = chunks.next().await {
                match item {
                    Ok(chunk) => {
                        if let Some(text) = chunk.output_text() {
                            final_response = text.to_string();
                            produced = true;
                            yield final_response.clone();
                        }
                    }
                    Err(e) => {
                        yield execution_failure(&e);
                        return;
                    }
                }
            }
            if !produced {
                yield final_response;
            }
        })
    }

    /// Answer the most recent turn of `history` in place.
    ///
    /// Reads the last turn's user message, computes the reply, and writes
    /// it back into that same turn; no other turn is touched. An empty
    /// history behaves like an empty message.
    pub async fn respond_turn(&self, history: &mut ConversationHistory) {
        let message = history.last_user_message().unwrap_or_default().to_string();
        let reply = self.respond(&message).await;
        history.resolve_last(reply);
    }

    async fn acquire_client(&self) -> std::result::Result<Arc<dyn AgentClient>, String> {
        let state = self.provider.ensure_ready().await;
        state.ready_client().ok_or_else(|| failure_text(&state))
    }
}

/// Failed provider state rendered for display.
fn failure_text(state: &ProviderState) -> String {
    let detail = state
        .failure_detail
        .as_deref()
        .unwrap_or("agent client is not available");
    format!("ERROR: {detail}")
}

/// Execution failure rendered for display; full detail goes to the log.
fn execution_failure(error: &Error) -> String {
    error!("agent execution failed: {error:?}");
    format!("An error occurred within the agent: {error}")
}
