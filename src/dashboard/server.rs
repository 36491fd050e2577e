use crate::client::{BalanceQuery, HttpTransport, MinimaClient, Transport};
use crate::dashboard::DashboardConfig;
use crate::utils::Result;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the dashboard router around `client`.
pub fn router<T: Transport>(client: MinimaClient<T>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/balance", get(balance::<T>))
        .route("/api/status", get(status::<T>))
        .route("/api/contacts", get(contacts::<T>))
        .route("/api/address", get(address::<T>))
        .layer(TraceLayer::new_for_http())
        .with_state(client)
}

/// `{ok: true, <field>: value}` or `{ok: false, error}`.
fn envelope<V: Serialize>(field: &str, result: Result<V>) -> Json<Value> {
    let value = result
        .map_err(|e| e.to_string())
        .and_then(|v| serde_json::to_value(v).map_err(|e| e.to_string()));
    match value {
        Ok(v) => {
            let mut body = json!({"ok": true});
            body[field] = v;
            Json(body)
        }
        Err(error) => {
            warn!(endpoint = field, %error, "dashboard request failed");
            Json(json!({"ok": false, "error": error}))
        }
    }
}

async fn balance<T: Transport>(State(client): State<MinimaClient<T>>) -> Json<Value> {
    envelope("balances", client.balance(BalanceQuery::default()).await)
}

async fn status<T: Transport>(State(client): State<MinimaClient<T>>) -> Json<Value> {
    envelope("status", client.status().await)
}

async fn contacts<T: Transport>(State(client): State<MinimaClient<T>>) -> Json<Value> {
    envelope("contacts", client.contacts().await)
}

async fn address<T: Transport>(State(client): State<MinimaClient<T>>) -> Json<Value> {
    envelope("address", client.getaddress().await)
}

pub struct DashboardServer<T: Transport = HttpTransport> {
    config: DashboardConfig,
    client: MinimaClient<T>,
}

impl<T: Transport> DashboardServer<T> {
    pub fn new(config: DashboardConfig, client: MinimaClient<T>) -> Self {
        Self { config, client }
    }

    /// Serve until `shutdown` turns true.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.config.listen_addr()).await?;
        info!("Dashboard running on http://{}", listener.local_addr()?);
        axum::serve(listener, router(self.client))
            .with_graceful_shutdown(async move {
                let _ = shutdown.wait_for(|stop| *stop).await;
            })
            .await?;
        info!("Dashboard stopped");
        Ok(())
    }
}
