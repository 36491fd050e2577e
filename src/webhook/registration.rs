//! One-shot webhook registration with the node.
//!
//! Registration is attempted once at startup and deregistration once at
//! shutdown. Neither is retried and neither failure is fatal. Nothing here
//! re-registers after a node restart.

use crate::client::{MinimaClient, Transport};
use crate::utils::ClientError;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Unregistered,
    Registered,
}

pub struct WebhookRegistrar<T: Transport> {
    client: MinimaClient<T>,
    hook_url: String,
    filter: Option<String>,
    state: Registration,
}

impl<T: Transport> WebhookRegistrar<T> {
    pub fn new(client: &MinimaClient<T>, hook_url: impl Into<String>, filter: Option<String>) -> Self {
        Self {
            client: client.single_shot(),
            hook_url: hook_url.into(),
            filter: filter.filter(|f| !f.is_empty()),
            state: Registration::Unregistered,
        }
    }

    pub fn state(&self) -> Registration {
        self.state
    }

    pub fn hook_url(&self) -> &str {
        &self.hook_url
    }

    /// Unregistered -> Registered on success; a failure only logs.
    pub async fn register(&mut self) -> Registration {
        match self.client.add_webhook(&self.hook_url, self.filter.as_deref()).await {
            Ok(()) => {
                self.state = Registration::Registered;
                match &self.filter {
                    Some(f) => info!("Webhook registered: {} (filter: {})", self.hook_url, f),
                    None => info!("Webhook registered: {}", self.hook_url),
                }
            }
            Err(e @ ClientError::Logic(_)) => warn!("Failed to register webhook: {}", e),
            Err(e) => {
                warn!("Could not register webhook (node may not be running): {}", e);
                warn!("Webhook stays unregistered until the listener is restarted");
            }
        }
        self.state
    }

    /// Best-effort removal; always leaves the registrar unregistered.
    pub async fn deregister(&mut self) {
        match self.client.remove_webhook(&self.hook_url).await {
            Ok(()) => info!("Webhook removed"),
            Err(e) => warn!("Could not remove webhook on shutdown: {}", e),
        }
        self.state = Registration::Unregistered;
    }
}
