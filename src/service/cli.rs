use clap::{Args, Parser, Subcommand};
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;
use crate::client::{ClientConfig, MinimaClient};
use crate::dashboard::DashboardServer;
use crate::service::config::Settings;
use crate::service::monitor::BalanceMonitor;
use crate::service::ServiceHandle;
use crate::utils::init_logging;
use crate::webhook::WebhookListener;

/// Minima node integration kit.
#[derive(Parser)]
#[clap(name = "minima-kit", version)]
pub struct Cli {
    /// Path to a TOML settings file
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(flatten)]
    pub rpc: RpcArgs,

    #[clap(subcommand)]
    pub cmd: Cmd,
}

/// Node RPC overrides; each one beats the settings file.
#[derive(Args, Debug, Default)]
pub struct RpcArgs {
    /// Node RPC host
    #[clap(long = "rpc-host", env = "MINIMA_HOST", global = true)]
    pub host: Option<String>,

    /// Node RPC port
    #[clap(long = "rpc-port", env = "MINIMA_PORT", global = true)]
    pub port: Option<u16>,

    /// Attempts per command
    #[clap(long, env = "MINIMA_RETRIES", global = true)]
    pub retries: Option<u32>,

    /// Base backoff between attempts, in ms
    #[clap(long, env = "MINIMA_RETRY_DELAY_MS", global = true)]
    pub retry_delay_ms: Option<u64>,

    /// Per-attempt timeout, in ms
    #[clap(long, env = "MINIMA_TIMEOUT_MS", global = true)]
    pub timeout_ms: Option<u64>,
}

impl RpcArgs {
    pub fn apply(&self, cfg: &mut ClientConfig) {
        if let Some(h) = &self.host {
            cfg.host = h.clone();
        }
        if let Some(p) = self.port {
            cfg.port = p;
        }
        if let Some(r) = self.retries {
            cfg.retries = r;
        }
        if let Some(d) = self.retry_delay_ms {
            cfg.retry_delay_ms = d;
        }
        if let Some(t) = self.timeout_ms {
            cfg.timeout_ms = t;
        }
    }
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Serve the read-only dashboard API
    Dashboard {
        /// bind address
        #[clap(long)]
        bind: Option<String>,

        #[clap(long, env = "DASHBOARD_PORT")]
        port: Option<u16>,
    },
    /// Register with the node and receive webhook events
    Webhook {
        #[clap(long, env = "LISTEN_PORT")]
        listen_port: Option<u16>,

        /// comma separated event names to subscribe to
        #[clap(long, env = "WEBHOOK_FILTER")]
        filter: Option<String>,

        /// host the node should call back on
        #[clap(long)]
        hook_host: Option<String>,
    },
    /// Periodically log status and balances
    Monitor {
        /// seconds between checks
        #[clap(long, env = "INTERVAL")]
        interval: Option<u64>,

        /// warn when sendable drops below this amount
        #[clap(long, env = "ALERT_THRESHOLD")]
        alert_threshold: Option<f64>,
    },
    /// Run one raw RPC command and print the envelope
    Exec {
        #[clap(required = true, num_args = 1..)]
        command: Vec<String>,
    },
}

pub async fn run_cli() -> Result<()> {
    init_logging("info");
    let cli = Cli::parse();

    let mut settings = Settings::load_or_default(cli.config.as_deref())?;
    cli.rpc.apply(&mut settings.rpc);
    let client = MinimaClient::new(settings.rpc.clone());

    match cli.cmd {
        Cmd::Exec { command } => {
            let envelope = client.command(&command.join(" ")).await?;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
            Ok(())
        }
        Cmd::Dashboard { bind, port } => {
            let mut cfg = settings.dashboard;
            if let Some(b) = bind {
                cfg.bind = b;
            }
            if let Some(p) = port {
                cfg.port = p;
            }
            let (mut services, shutdown_rx) = ServiceHandle::new();
            services.spawn(DashboardServer::new(cfg, client).run(shutdown_rx));
            services.run_until_shutdown().await
        }
        Cmd::Webhook { listen_port, filter, hook_host } => {
            let mut cfg = settings.webhook;
            if let Some(p) = listen_port {
                cfg.listen_port = p;
            }
            if let Some(f) = filter {
                cfg.filter = f;
            }
            if let Some(h) = hook_host {
                cfg.hook_host = h;
            }
            info!("node RPC at {}", client.base_url());
            let (mut services, shutdown_rx) = ServiceHandle::new();
            services.spawn(WebhookListener::new(cfg, client).run(shutdown_rx));
            services.run_until_shutdown().await
        }
        Cmd::Monitor { interval, alert_threshold } => {
            let mut cfg = settings.monitor;
            if let Some(i) = interval {
                cfg.interval_secs = i;
            }
            if let Some(t) = alert_threshold {
                cfg.alert_threshold = t;
            }
            let (mut services, shutdown_rx) = ServiceHandle::new();
            services.spawn(BalanceMonitor::new(client, cfg).run(shutdown_rx));
            services.run_until_shutdown().await
        }
    }
}
