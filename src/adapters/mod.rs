//! Adapters module — presentation-layer front-ends.
//!
//! Thin collaborators around the response gateway. They hand it a message
//! (or a conversation history) and render whatever string or stream comes
//! back; none of them contain agent logic of their own.
//!
//! # Supported Front-ends
//!
//! - **Web** — browser chat page with JSON and SSE endpoints
//! - **CLI** — interactive command line interface

pub mod cli;
pub mod web;

pub use cli::CliChannel;
