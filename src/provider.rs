//! Agent client lifecycle — lazy, at-most-once initialization.
//!
//! Constructing the agent client is expensive, can fail, and needs a
//! credential that may only appear in the environment after the process
//! has started (secrets injected late in some deployments). The provider
//! therefore decouples "can the process start" from "can the agent run":
//! the front-end always comes up, and the first `ensure_ready` call
//! decides — once, for the lifetime of the process — whether a client
//! exists or why it does not.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{error, info, warn};

use crate::agent::{AgentClient, ClientRegistry};
use crate::config::Config;
use crate::error::Error;
use crate::Result;

/// Whether the agent client has been constructed yet, and how it went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Uninitialized,
    Ready,
    Failed,
}

/// Snapshot of the provider after (or before) initialization.
#[derive(Clone)]
pub struct ProviderState {
    /// The shared client instance, present only when `Ready`.
    pub client: Option<Arc<dyn AgentClient>>,
    pub availability: Availability,
    /// Human-readable failure description, present only when `Failed`.
    pub failure_detail: Option<String>,
}

impl ProviderState {
    /// The client, if initialization succeeded.
    pub fn ready_client(&self) -> Option<Arc<dyn AgentClient>> {
        match self.availability {
            Availability::Ready => self.client.clone(),
            _ => None,
        }
    }
}

/// Constructs an agent client from configuration and an explicit credential.
pub type ClientFactory =
    Box<dyn Fn(&Config, &str) -> Result<Arc<dyn AgentClient>> + Send + Sync>;

enum InitOutcome {
    Ready(Arc<dyn AgentClient>),
    Failed(String),
}

/// Owns the single shared agent client instance.
///
/// Create one per process and share it behind an `Arc`. All access goes
/// through [`ensure_ready`](Self::ensure_ready) and
/// [`availability`](Self::availability).
pub struct ClientProvider {
    config: Config,
    factory: ClientFactory,
    state: OnceCell<InitOutcome>,
}

impl ClientProvider {
    /// Provider backed by the real client registry.
    pub fn new(config: Config) -> Self {
        Self::with_factory(
            config,
            Box::new(|config, credential| ClientRegistry::create(config, credential)),
        )
    }

    /// Provider with an injected construction function.
    pub fn with_factory(config: Config, factory: ClientFactory) -> Self {
        Self {
            config,
            factory,
            state: OnceCell::new(),
        }
    }

    /// Run initialization if it has not run yet, then return the decision.
    ///
    /// Idempotent: the first caller performs the attempt, concurrent first
    /// callers wait for that attempt, and everyone afterwards gets the
    /// recorded outcome — including a failure. There is no automatic retry;
    /// a failed provider stays failed until the process restarts.
    pub async fn ensure_ready(&self) -> ProviderState {
        let outcome = self
            .state
            .get_or_init(|| async { self.initialize() })
            .await;

        match outcome {
            InitOutcome::Ready(client) => ProviderState {
                client: Some(Arc::clone(client)),
                availability: Availability::Ready,
                failure_detail: None,
            },
            InitOutcome::Failed(detail) => ProviderState {
                client: None,
                availability: Availability::Failed,
                failure_detail: Some(detail.clone()),
            },
        }
    }

    /// Current availability without triggering initialization.
    pub fn availability(&self) -> Availability {
        match self.state.get() {
            None => Availability::Uninitialized,
            Some(InitOutcome::Ready(_)) => Availability::Ready,
            Some(InitOutcome::Failed(_)) => Availability::Failed,
        }
    }

    fn initialize(&self) -> InitOutcome {
        info!(
            "initializing agent client: provider={} model={}",
            self.config.provider, self.config.model
        );

        let credential = match resolve_credential(&self.config.credential_env) {
            Ok(credential) => credential,
            Err(e) => {
                warn!("agent client unavailable: {e}");
                return InitOutcome::Failed(e.to_string());
            }
        };

        match (self.factory)(&self.config, &credential) {
            Ok(client) => {
                info!("agent client ready: model={}", client.model());
                InitOutcome::Ready(client)
            }
            Err(e) => {
                error!("agent client construction failed: {e}");
                let detail = match e {
                    Error::ClientConstruction(_) => e.to_string(),
                    other => Error::ClientConstruction(other.to_string()).to_string(),
                };
                InitOutcome::Failed(detail)
            }
        }
    }
}

/// Read the credential from the environment; absence is a defined,
/// reported failure, not a crash. Construction is never attempted
/// without it.
fn resolve_credential(var: &str) -> Result<String> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::CredentialMissing(var.to_string())),
    }
}
