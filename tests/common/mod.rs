#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use minima_kit::client::Transport;
use minima_kit::TransportError;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// In-memory node: answers commands from a fixed table and records every
/// decoded command it sees.
#[derive(Default)]
pub struct FixedNode {
    replies: HashMap<String, Value>,
    pub seen: Mutex<Vec<String>>,
}

impl FixedNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successful envelope for `cmd`.
    pub fn ok(mut self, cmd: &str, response: Value) -> Self {
        self.replies.insert(cmd.to_string(), json!({"status": true, "response": response}));
        self
    }

    /// `status:false` envelope for `cmd`.
    pub fn reject(mut self, cmd: &str, error: &str) -> Self {
        self.replies.insert(cmd.to_string(), json!({"status": false, "error": error}));
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl Transport for FixedNode {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        let encoded = url.rsplit('/').next().unwrap_or_default();
        let cmd = urlencoding::decode(encoded).unwrap().into_owned();
        self.seen.lock().push(cmd.clone());
        match self.replies.get(&cmd) {
            Some(v) => Ok(v.to_string()),
            None => Err(TransportError::Request("connection refused".into())),
        }
    }
}

#[derive(Clone)]
struct MockNode {
    replies: Arc<HashMap<String, Value>>,
    seen: Arc<Mutex<Vec<String>>>,
}

async fn mock_command(State(node): State<MockNode>, Path(command): Path<String>) -> Response {
    node.seen.lock().push(command.clone());
    if command == "garbage" {
        return "<html>not json</html>".into_response();
    }
    match node.replies.get(&command) {
        Some(v) => Json(json!({"status": true, "response": v})).into_response(),
        None => Json(json!({"status": false, "error": format!("Command not found: {}", command)}))
            .into_response(),
    }
}

/// Real HTTP node on an ephemeral port. Returns its address and the log of
/// decoded commands it received.
pub async fn spawn_mock_node(replies: HashMap<String, Value>) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(vec![]));
    let state = MockNode { replies: Arc::new(replies), seen: seen.clone() };
    let app = Router::new().route("/*command", get(mock_command)).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, seen)
}

/// A port nothing listens on.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
