//! RPC client for a node's local HTTP endpoint.
//!
//! - `command`: encode, GET, retry with linear backoff, parse the envelope
//! - typed operations (`balance`, `status`, `send`, ...) that normalize the
//!   node's raw field names
//!
//! Transport is pluggable through the `Transport` trait; `HttpTransport`
//! (reqwest) is the default.

pub mod api;
pub mod command;
pub mod normalize;
pub mod transport;
pub mod types;

pub use command::{backoff_delay, ClientConfig, Envelope, MinimaClient};
pub use transport::{HttpTransport, Transport};
pub use types::*;
