//! Periodic status and balance monitor.
//!
//! Each check logs node status, every wallet balance row and the default
//! address. A failing section is logged and the remaining sections still run.

use crate::client::{BalanceEntry, BalanceQuery, MinimaClient, NodeAddress, NodeStatus, Transport};
use crate::utils::serde_helpers::safe_float;
use crate::utils::ClientError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    pub interval_secs: u64,
    /// Alert when `sendable` drops below this; `0` disables alerts.
    pub alert_threshold: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { interval_secs: 60, alert_threshold: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceAlert {
    pub tokenid: String,
    pub sendable: f64,
    pub threshold: f64,
}

/// Outcome of one check.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub status: Option<NodeStatus>,
    pub balances: Vec<BalanceEntry>,
    pub address: Option<NodeAddress>,
    pub alerts: Vec<BalanceAlert>,
    pub failures: Vec<String>,
    /// At least one section failed because the node was unreachable.
    pub unreachable: bool,
}

/// Rows whose spendable amount is under a positive `threshold`.
pub fn low_balance_alerts(balances: &[BalanceEntry], threshold: f64) -> Vec<BalanceAlert> {
    if threshold <= 0.0 {
        return vec![];
    }
    balances
        .iter()
        .filter_map(|b| {
            let sendable = safe_float(&b.sendable);
            (sendable < threshold).then(|| BalanceAlert { tokenid: b.tokenid.clone(), sendable, threshold })
        })
        .collect()
}

pub struct BalanceMonitor<T: Transport> {
    client: MinimaClient<T>,
    config: MonitorConfig,
}

impl<T: Transport> BalanceMonitor<T> {
    pub fn new(client: MinimaClient<T>, config: MonitorConfig) -> Self {
        Self { client, config }
    }

    pub async fn check(&self) -> CheckReport {
        let mut report = CheckReport::default();

        match self.client.status().await {
            Ok(s) => {
                info!(
                    "status: version={} block={} height={} devices={} mempool={} uptime={}",
                    s.version, s.block, s.chain_height, s.devices, s.mempool, s.uptime
                );
                report.status = Some(s);
            }
            Err(e) => report.failed("status", e),
        }

        match self.client.balance(BalanceQuery::default()).await {
            Ok(balances) => {
                if balances.is_empty() {
                    info!("balance: no balances found");
                }
                for b in &balances {
                    info!(
                        "balance: {} ({}) sendable={} confirmed={} unconfirmed={} coins={}",
                        b.display_name(), b.tokenid, b.sendable, b.confirmed, b.unconfirmed, b.coins
                    );
                }
                report.alerts = low_balance_alerts(&balances, self.config.alert_threshold);
                for a in &report.alerts {
                    warn!("ALERT: {} sendable {} below threshold {}", a.tokenid, a.sendable, a.threshold);
                }
                report.balances = balances;
            }
            Err(e) => report.failed("balance", e),
        }

        match self.client.getaddress().await {
            Ok(addr) => {
                info!("address: {}", addr.miniaddress);
                report.address = Some(addr);
            }
            Err(e) => report.failed("address", e),
        }

        if report.unreachable {
            warn!(
                "node at {} unreachable, retrying in {}s",
                self.client.base_url(),
                self.config.interval_secs
            );
        }
        report
    }

    /// Check, then wait `interval_secs`, until `shutdown` turns true. The wait
    /// starts when a check ends, however long the check took.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> anyhow::Result<()> {
        let period = Duration::from_secs(self.config.interval_secs.max(1));
        info!(
            "monitoring {} every {}s (alert threshold {})",
            self.client.base_url(),
            period.as_secs(),
            self.config.alert_threshold
        );

        loop {
            tokio::select! {
                _ = shutdown.wait_for(|stop| *stop) => break,
                _ = async {
                    self.check().await;
                    sleep(period).await
                } => {}
            }
        }
        info!("monitor stopped");
        Ok(())
    }
}

impl CheckReport {
    fn failed(&mut self, section: &str, e: ClientError) {
        warn!("{} check failed: {}", section, e);
        self.unreachable |= e.is_connection();
        self.failures.push(format!("{}: {}", section, e));
    }
}
