//! Normalized response types returned by `MinimaClient`.
//!
//! Field names serialize in camelCase so the dashboard can hand them straight
//! to a browser.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Base URL for transaction links.
pub const EXPLORER_TX_URL: &str = "https://explorer.minima.global/transactions/";

/// Token id of native Minima.
pub const NATIVE_TOKEN_ID: &str = "0x00";

/// Token-wide supply. Kept in its own struct so it can never be mistaken
/// for a wallet amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSupply {
    pub total: String,
}

/// One wallet balance row. Wallet amounts are the node's numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceEntry {
    /// Display name: a plain string for Minima, an object for custom tokens.
    pub token: Value,
    pub tokenid: String,
    /// Spendable right now.
    pub sendable: String,
    /// Full balance including locked coins.
    pub confirmed: String,
    /// Pending incoming.
    pub unconfirmed: String,
    /// Number of UTXOs.
    pub coins: String,
    pub supply: TokenSupply,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl BalanceEntry {
    /// Token name for display, falling back to a shortened token id.
    pub fn display_name(&self) -> String {
        let name = match &self.token {
            Value::String(s) => s.clone(),
            Value::Object(o) => o.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
            _ => String::new(),
        };
        if name.is_empty() {
            format!("{}...", self.tokenid.chars().take(12).collect::<String>())
        } else {
            name
        }
    }

    /// True for indivisible tokens (`details.decimals == 0`).
    pub fn is_nft(&self) -> bool {
        self.details
            .as_ref()
            .and_then(|d| d.get("decimals"))
            .and_then(Value::as_i64)
            == Some(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BalanceQuery {
    pub tokenid: Option<String>,
    pub token_details: bool,
}

impl BalanceQuery {
    pub fn token(tokenid: impl Into<String>) -> Self {
        Self { tokenid: Some(tokenid.into()), token_details: false }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub sendable: f64,
    pub confirmed: f64,
    pub unconfirmed: f64,
    pub coins: i64,
}

/// Point-in-time node state. Never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStatus {
    pub version: String,
    pub chain_height: i64,
    pub block: i64,
    pub locked: bool,
    pub mempool: i64,
    pub connections: i64,
    pub devices: i64,
    pub uptime: String,
    pub block_time: String,
    pub raw: Value,
}

#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub tokenid: Option<String>,
    pub split: Option<u32>,
    pub burn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    pub txpowid: String,
    /// Absent when the node returned no txpowid.
    pub explorer_url: Option<String>,
    pub block: String,
    pub date: String,
    pub raw: Value,
}

/// Result of the node's local `hash` command. Nothing is written on-chain and
/// no txpowid exists; use `record_on_chain` for a permanent record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashResult {
    pub input: String,
    pub data: String,
    #[serde(rename = "type")]
    pub hash_type: String,
    pub hash: String,
}

/// Options for `record_on_chain`. State ports are 0..=255.
#[derive(Debug, Clone, Default)]
pub struct RecordOptions {
    pub label: String,
    pub port: u8,
    pub burn: Option<String>,
    /// Applied last, overriding data/label/timestamp ports.
    pub extra_state: BTreeMap<u8, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnChainRecord {
    pub txpowid: String,
    pub explorer_url: Option<String>,
    pub data: String,
    pub label: String,
    pub port: u8,
    pub timestamp: String,
    pub block: String,
    pub date: String,
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomValue {
    pub random: String,
    pub hashed: String,
    pub keycode: String,
    pub size: String,
    #[serde(rename = "type")]
    pub random_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub tokenid: String,
    pub name: String,
    /// Max supply of the token, not a wallet amount.
    pub supply_total: String,
    pub decimals: i64,
    pub scale: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAddress {
    pub address: String,
    pub miniaddress: String,
    pub publickey: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaximaInfo {
    pub name: String,
    pub publickey: String,
    pub mxpublickey: String,
    pub staticmls: bool,
    pub mls: String,
    pub p2pidentity: String,
    pub localidentity: String,
    pub contact: String,
    pub logs: bool,
    pub poll: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub publickey: String,
    pub address: String,
    pub lastseen: String,
    pub samechain: bool,
}
