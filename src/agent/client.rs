//! Agent client abstraction layer.
//!
//! This module provides:
//! - [`AgentClient`] trait for swappable agent backends
//! - [`ClientRegistry`] for creating clients from configuration
//! - A fake client for tests
//!
//! # Adding a New Backend
//!
//! 1. Create a new file (e.g., `openai.rs`)
//! 2. Implement the `AgentClient` trait
//! 3. Add to `ClientRegistry::create()`
//! 4. Add config fields in `config.rs` if needed

use std::sync::Arc;

use futures_util::stream::BoxStream;

use crate::config::Config;
use crate::error::Error;
use crate::Result;

use super::anthropic::AnthropicClient;
use super::chunk::AgentChunk;

/// Stream of chunks produced by one agent call.
///
/// Failures surface as `Err` items; the stream ends after the first one.
pub type ChunkStream = BoxStream<'static, Result<AgentChunk>>;

/// Agent client trait — swappable backend abstraction.
///
/// The client answers a single natural-language message, streaming
/// cumulative answer snapshots as they grow.
pub trait AgentClient: Send + Sync {
    /// Answer `message`, streaming chunks until the answer is complete.
    fn stream_respond(&self, message: &str) -> ChunkStream;

    /// Model identifier this client is pinned to.
    fn model(&self) -> &str;
}

/// Client registry — creates agent clients from configuration.
///
/// The credential is resolved by the caller and injected explicitly;
/// clients never discover credentials on their own.
pub struct ClientRegistry;

impl ClientRegistry {
    /// Create an agent client for the configured backend.
    pub fn create(config: &Config, credential: &str) -> Result<Arc<dyn AgentClient>> {
        match config.provider.as_str() {
            "anthropic" => Ok(Arc::new(AnthropicClient::new(
                credential,
                &config.model,
            ))),
            other => Err(Error::Config(format!("Unknown provider: {other}"))),
        }
    }

    /// List available backend names.
    pub fn available() -> &'static [&'static str] {
        &["anthropic"]
    }
}

/// Fake agent client for testing.
///
/// Replays a scripted chunk sequence on every call and counts how many
/// times it was invoked.
#[cfg(test)]
pub struct FakeAgentClient {
    script: Vec<std::result::Result<AgentChunk, String>>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl FakeAgentClient {
    /// Create with a chunk sequence to replay.
    pub fn with_chunks(chunks: Vec<AgentChunk>) -> Self {
        Self {
            script: chunks.into_iter().map(Ok).collect(),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Create with an explicit script of chunks and failures.
    pub fn with_script(script: Vec<std::result::Result<AgentChunk, String>>) -> Self {
        Self {
            script,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Create a client that fails before producing any chunk.
    pub fn failing(message: &str) -> Self {
        Self::with_script(vec![Err(message.to_string())])
    }

    /// Number of `stream_respond` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl AgentClient for FakeAgentClient {
    fn stream_respond(&self, _message: &str) -> ChunkStream {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let script = self.script.clone();
        Box::pin(futures_util::stream::iter(
            script
                .into_iter()
                .map(|item| item.map_err(Error::AgentExecution)),
        ))
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn test_fake_client_replays_script() {
        let client = FakeAgentClient::with_chunks(vec![
            AgentChunk::output("a"),
            AgentChunk::output("ab"),
        ]);

        let chunks: Vec<_> = client.stream_respond("hi").collect().await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].as_ref().unwrap().output_text(), Some("ab"));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_fake_client_failure_item() {
        let client = FakeAgentClient::failing("boom");

        let chunks: Vec<_> = client.stream_respond("hi").collect().await;
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_err());
    }

    #[test]
    fn test_registry_rejects_unknown_provider() {
        let config = Config {
            provider: "carrier-pigeon".to_string(),
            ..Config::default()
        };

        let result = ClientRegistry::create(&config, "key");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_registry_creates_anthropic_client() {
        let config = Config::default();
        let client = ClientRegistry::create(&config, "key").unwrap();
        assert_eq!(client.model(), "claude-sonnet-4-20250514");
    }
}
