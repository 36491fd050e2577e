//! Reshape raw node responses into the types in `client::types`.
//!
//! Pure functions over `serde_json::Value`; none of them can fail. The one rule
//! that matters most: the raw `total` field of a balance row is the token's max
//! supply and only ever lands in `supply.total`.

use crate::client::types::*;
use crate::utils::serde_helpers::{bool_field, int_field, safe_float, safe_int_str, string_field};
use serde_json::Value;
use std::collections::BTreeMap;

/// Highest state port; holds the record timestamp.
pub const TIMESTAMP_PORT: u8 = 255;

fn rows(v: &Value) -> &[Value] {
    v.as_array().map(Vec::as_slice).unwrap_or(&[])
}

pub fn balance_entries(response: &Value, include_details: bool) -> Vec<BalanceEntry> {
    rows(response)
        .iter()
        .map(|entry| {
            let token = match entry.get("token") {
                None | Some(Value::Null) | Some(Value::Bool(false)) => Value::String(String::new()),
                Some(Value::String(s)) if s.is_empty() => Value::String(String::new()),
                Some(v) => v.clone(),
            };
            let details = if include_details {
                entry.get("details").filter(|d| !d.is_null()).cloned()
            } else {
                None
            };
            BalanceEntry {
                token,
                tokenid: string_field(entry, "tokenid", ""),
                sendable: string_field(entry, "sendable", "0"),
                confirmed: string_field(entry, "confirmed", "0"),
                unconfirmed: string_field(entry, "unconfirmed", "0"),
                coins: string_field(entry, "coins", "0"),
                supply: TokenSupply { total: string_field(entry, "total", "0") },
                details,
            }
        })
        .collect()
}

/// Exact-match filter on `tokenid`.
pub fn filter_by_token(entries: Vec<BalanceEntry>, tokenid: &str) -> Vec<BalanceEntry> {
    entries.into_iter().filter(|b| b.tokenid == tokenid).collect()
}

/// Numeric view of the first entry; all zeros for an empty list.
pub fn summarize(entries: &[BalanceEntry]) -> BalanceSummary {
    match entries.first() {
        None => BalanceSummary::default(),
        Some(b) => BalanceSummary {
            sendable: safe_float(&b.sendable),
            confirmed: safe_float(&b.confirmed),
            unconfirmed: safe_float(&b.unconfirmed),
            coins: safe_int_str(&b.coins),
        },
    }
}

pub fn node_status(resp: &Value) -> NodeStatus {
    let chain = resp.get("chain").unwrap_or(&Value::Null);
    let txpow = resp.get("txpow").unwrap_or(&Value::Null);
    let network = resp.get("network").unwrap_or(&Value::Null);

    NodeStatus {
        version: string_field(resp, "version", ""),
        chain_height: int_field(resp, "length"),
        block: int_field(chain, "block"),
        locked: bool_field(resp, "locked"),
        mempool: int_field(txpow, "mempool"),
        connections: int_field(network, "connected"),
        devices: int_field(resp, "devices"),
        uptime: string_field(resp, "uptime", ""),
        block_time: string_field(chain, "time", ""),
        raw: resp.clone(),
    }
}

/// Explorer link for a txpowid. An empty id gets no link.
pub fn explorer_url(txpowid: &str) -> Option<String> {
    if txpowid.is_empty() {
        None
    } else {
        Some(format!("{}{}", EXPLORER_TX_URL, txpowid))
    }
}

pub fn send_receipt(resp: &Value) -> SendReceipt {
    let header = resp.get("header").unwrap_or(&Value::Null);
    let txpowid = string_field(resp, "txpowid", "");
    SendReceipt {
        explorer_url: explorer_url(&txpowid),
        txpowid,
        block: string_field(header, "block", ""),
        date: string_field(header, "date", ""),
        raw: resp.clone(),
    }
}

pub fn hash_result(resp: &Value) -> HashResult {
    HashResult {
        input: string_field(resp, "input", ""),
        data: string_field(resp, "data", ""),
        hash_type: string_field(resp, "type", ""),
        hash: string_field(resp, "hash", ""),
    }
}

/// State map for an on-chain record: data at `port`, label at `port + 1`,
/// timestamp at 255, then caller overrides.
pub fn record_state(data: &str, opts: &RecordOptions, timestamp: &str) -> BTreeMap<u8, String> {
    let mut state = BTreeMap::new();
    state.insert(opts.port, data.to_string());
    state.insert(TIMESTAMP_PORT, timestamp.to_string());
    if !opts.label.is_empty() && opts.port < TIMESTAMP_PORT {
        state.insert(opts.port + 1, opts.label.clone());
    }
    for (k, v) in &opts.extra_state {
        state.insert(*k, v.clone());
    }
    state
}

/// `{"<port>": "<value>", ...}` as sent in the `state:` argument.
pub fn state_json(state: &BTreeMap<u8, String>) -> String {
    let map: serde_json::Map<String, Value> = state
        .iter()
        .map(|(port, v)| (port.to_string(), Value::String(v.clone())))
        .collect();
    Value::Object(map).to_string()
}

pub fn random_value(resp: &Value) -> RandomValue {
    RandomValue {
        random: string_field(resp, "random", ""),
        hashed: string_field(resp, "hashed", ""),
        keycode: string_field(resp, "keycode", ""),
        size: string_field(resp, "size", ""),
        random_type: string_field(resp, "type", ""),
    }
}

/// Token display name: `name` (falling back to `token`) as a plain string,
/// a `{name: ..}` object, or anything else rendered as JSON text.
pub fn token_name(entry: &Value) -> String {
    let field = match entry.get("name") {
        None | Some(Value::Null) => entry.get("token").unwrap_or(&Value::Null),
        Some(v) => v,
    };
    match field {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Object(_) => match field.get("name") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => field.to_string(),
        },
        other => other.to_string(),
    }
}

pub fn token_infos(response: &Value) -> Vec<TokenInfo> {
    rows(response)
        .iter()
        .map(|entry| TokenInfo {
            tokenid: string_field(entry, "tokenid", ""),
            name: token_name(entry),
            supply_total: string_field(entry, "total", "0"),
            decimals: int_field(entry, "decimals"),
            scale: int_field(entry, "scale"),
        })
        .collect()
}

pub fn node_address(resp: &Value) -> NodeAddress {
    NodeAddress {
        address: string_field(resp, "address", ""),
        miniaddress: string_field(resp, "miniaddress", ""),
        publickey: string_field(resp, "publickey", ""),
    }
}

pub fn maxima_info(resp: &Value) -> MaximaInfo {
    MaximaInfo {
        name: string_field(resp, "name", ""),
        publickey: string_field(resp, "publickey", ""),
        mxpublickey: string_field(resp, "mxpublickey", ""),
        staticmls: bool_field(resp, "staticmls"),
        mls: string_field(resp, "mls", ""),
        p2pidentity: string_field(resp, "p2pidentity", ""),
        localidentity: string_field(resp, "localidentity", ""),
        contact: string_field(resp, "contact", ""),
        logs: bool_field(resp, "logs"),
        poll: int_field(resp, "poll"),
    }
}

pub fn contacts(response: &Value) -> Vec<Contact> {
    rows(response)
        .iter()
        .map(|entry| {
            let extra = entry.get("extradata").unwrap_or(&Value::Null);
            Contact {
                id: int_field(entry, "id"),
                name: string_field(extra, "name", ""),
                publickey: string_field(entry, "publickey", ""),
                address: string_field(entry, "currentaddress", ""),
                lastseen: string_field(entry, "date", ""),
                samechain: bool_field(entry, "samechain"),
            }
        })
        .collect()
}
