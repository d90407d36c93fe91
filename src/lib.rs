//! Parlor - web chat front-end for a streaming AI agent
//!
//! The core of this library is a lazy-initializing, fault-isolating
//! gateway between a submitted chat message and an external agent client:
//! the client is constructed at most once per process, streamed output is
//! folded into a running answer, and every failure surfaces as display
//! text instead of crashing the process.

pub mod adapters;
pub mod agent;
pub mod config;
pub mod error;
pub mod gateway;
pub mod provider;

pub use error::{Error, Result};
