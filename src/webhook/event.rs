//! Webhook event model: the node POSTs `{event, data}` and we turn it into a
//! closed enum so dispatch is an exhaustive match.

use crate::utils::serde_helpers::string_field;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

/// Longest payload excerpt written to the log.
pub const SUMMARY_LIMIT: usize = 200;

/// Tally name for a body without an `event` member.
pub const MISSING_EVENT_NAME: &str = "undefined";

/// Raw body of an event POST. Any JSON object is accepted: a missing or
/// non-string `event` is kept under its text form and later classified as
/// unknown.
#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    #[serde(default = "missing_event_name", deserialize_with = "event_name")]
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

fn missing_event_name() -> String {
    MISSING_EVENT_NAME.to_string()
}

fn event_name<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Null => missing_event_name(),
        other => other.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerInterval {
    TenSeconds,
    SixtySeconds,
}

impl TimerInterval {
    pub fn label(self) -> &'static str {
        match self {
            TimerInterval::TenSeconds => "10s",
            TimerInterval::SixtySeconds => "60s",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockNotice {
    pub block: String,
    pub superblock: bool,
    pub txn_count: usize,
    pub has_transaction: bool,
}

/// A classified node event.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    NewBlock(BlockNotice),
    Mining { block: String },
    Timer { interval: TimerInterval, timemilli: String },
    NewTransaction(Value),
    NewBalance(Value),
    Maxima(Value),
    Unknown { name: String, data: Value },
}

/// A known event arrived without the fields its handler needs.
#[derive(Error, Debug, PartialEq)]
#[error("{event} payload missing {field}")]
pub struct EventError {
    pub event: &'static str,
    pub field: &'static str,
}

impl WebhookEvent {
    /// Classify `name` and extract what its handler needs from `data`.
    pub fn parse(name: &str, data: Value) -> Result<Self, EventError> {
        match name {
            "NEWBLOCK" => {
                let txpow = data.get("txpow").ok_or(EventError { event: "NEWBLOCK", field: "txpow" })?;
                Ok(WebhookEvent::NewBlock(BlockNotice {
                    block: header_block(txpow).ok_or(EventError { event: "NEWBLOCK", field: "txpow.header.block" })?,
                    superblock: txpow.get("superblock").and_then(Value::as_bool).unwrap_or(false),
                    txn_count: txpow
                        .pointer("/body/txnlist")
                        .and_then(Value::as_array)
                        .map(Vec::len)
                        .unwrap_or(0),
                    has_transaction: txpow.get("istransaction").and_then(Value::as_bool).unwrap_or(false),
                }))
            }
            "MINING" => {
                let block = data
                    .get("txpow")
                    .and_then(header_block)
                    .ok_or(EventError { event: "MINING", field: "txpow.header.block" })?;
                Ok(WebhookEvent::Mining { block })
            }
            "MDS_TIMER_10SECONDS" | "MDS_TIMER_60SECONDS" => Ok(WebhookEvent::Timer {
                interval: if name == "MDS_TIMER_10SECONDS" {
                    TimerInterval::TenSeconds
                } else {
                    TimerInterval::SixtySeconds
                },
                timemilli: string_field(&data, "timemilli", ""),
            }),
            "NEWTRANSACTION" => Ok(WebhookEvent::NewTransaction(data)),
            "NEWBALANCE" => Ok(WebhookEvent::NewBalance(data)),
            "MAXIMA" => Ok(WebhookEvent::Maxima(data)),
            other => Ok(WebhookEvent::Unknown { name: other.to_string(), data }),
        }
    }
}

fn header_block(txpow: &Value) -> Option<String> {
    match txpow.pointer("/header/block")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Compact JSON of `data`, cut to `SUMMARY_LIMIT` characters.
pub fn summarize(data: &Value) -> String {
    truncate_chars(&data.to_string(), SUMMARY_LIMIT)
}

pub fn truncate_chars(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
