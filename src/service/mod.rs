//! Process plumbing: CLI, layered settings, service lifecycle and the
//! balance monitor.

pub mod cli;
pub mod config;
pub mod monitor;
pub mod service_handle;

pub use cli::run_cli;
pub use config::Settings;
pub use monitor::{BalanceMonitor, MonitorConfig};
pub use service_handle::{shutdown_signal, ServiceHandle};
