//! Utility module: errors, logging, and lenient JSON field helpers.

pub mod errors;
pub mod logging;
pub mod serde_helpers;

pub use errors::{ClientError, Result, TransportError};
pub use logging::init_logging;
