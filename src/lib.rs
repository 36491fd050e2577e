//! Client kit for a Minima node's local RPC endpoint.
//!
//! - [`client`]: retrying RPC client with normalized responses
//! - [`webhook`]: listener for node push events
//! - [`dashboard`]: read-only JSON API over the client
//! - [`service`]: CLI, settings, lifecycle, balance monitor

pub mod client;
pub mod dashboard;
pub mod service;
pub mod utils;
pub mod webhook;

pub use client::{ClientConfig, MinimaClient};
pub use utils::{ClientError, TransportError};
