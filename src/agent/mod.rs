//! Agent module — the contract the gateway requires of an agent backend.
//!
//! This module contains:
//! - Chunk type for streamed agent output
//! - Agent client trait and the Anthropic implementation
//! - Conversation history shared with the presentation layer

pub mod anthropic;
mod chunk;
mod client;
mod history;

// Re-exports for convenience
pub use anthropic::AnthropicClient;
pub use chunk::AgentChunk;
pub use client::{AgentClient, ChunkStream, ClientRegistry};
pub use history::{ConversationHistory, ConversationTurn};

#[cfg(test)]
pub use client::FakeAgentClient;
