//! Webhook listener
//!
//! - registers `http://{hook_host}:{port}/events` with the node at startup
//! - `POST /events`: count, classify and log node events (always 200)
//! - `GET /status`: `{lastBlock, eventCounts, uptime}`
//! - deregisters once on shutdown

pub mod dispatch;
pub mod event;
pub mod registration;
pub mod server;
pub mod state;

pub use event::{EventPayload, WebhookEvent};
pub use registration::{Registration, WebhookRegistrar};
pub use state::{ListenerState, ListenerStatus};

use crate::client::{HttpTransport, MinimaClient, Transport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WebhookConfig {
    pub bind: String,
    pub listen_port: u16,
    /// Comma separated event names, empty for all events.
    pub filter: String,
    /// Host the node uses to reach this listener.
    pub hook_host: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            listen_port: 8099,
            filter: String::new(),
            hook_host: "127.0.0.1".into(),
        }
    }
}

impl WebhookConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.listen_port)
    }

    pub fn hook_url(&self, port: u16) -> String {
        format!("http://{}:{}/events", self.hook_host, port)
    }
}

pub struct WebhookListener<T: Transport = HttpTransport> {
    config: WebhookConfig,
    client: MinimaClient<T>,
    state: Arc<ListenerState>,
}

impl<T: Transport> WebhookListener<T> {
    pub fn new(config: WebhookConfig, client: MinimaClient<T>) -> Self {
        Self { config, client, state: Arc::new(ListenerState::new()) }
    }

    pub fn state(&self) -> Arc<ListenerState> {
        self.state.clone()
    }

    /// Bind the configured address and serve until `shutdown` turns true.
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.config.listen_addr()).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener, mut shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let port = listener.local_addr()?.port();
        info!("Webhook listener started on port {}", port);
        info!("Status endpoint: http://127.0.0.1:{}/status", port);

        let filter = Some(self.config.filter.clone());
        let mut registrar = WebhookRegistrar::new(&self.client, self.config.hook_url(port), filter);
        registrar.register().await;

        axum::serve(listener, server::router(self.state.clone()))
            .with_graceful_shutdown(async move {
                let _ = shutdown.wait_for(|stop| *stop).await;
            })
            .await?;

        info!("Shutting down, removing webhook...");
        registrar.deregister().await;
        Ok(())
    }
}
