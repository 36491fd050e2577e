//! Read-only dashboard API over the RPC client.
//!
//! Each endpoint makes exactly one client call. Failures are reported as
//! `200 {ok:false, error}`, never as HTTP errors.

pub mod server;

pub use server::{router, DashboardServer};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { bind: "0.0.0.0".into(), port: 3000 }
    }
}

impl DashboardConfig {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
