//! Typed node operations built on `MinimaClient::command`.

use crate::client::command::MinimaClient;
use crate::client::normalize;
use crate::client::transport::Transport;
use crate::client::types::*;
use crate::utils::Result;
use std::fmt::Display;
use tracing::info;

/// Amount used for self-sends that only carry state.
const RECORD_AMOUNT: &str = "0.000000001";

impl<T: Transport> MinimaClient<T> {
    /// Wallet balances with max supply moved under `supply.total`.
    pub async fn balance(&self, query: BalanceQuery) -> Result<Vec<BalanceEntry>> {
        let cmd = if query.token_details { "balance tokendetails:true" } else { "balance" };
        let envelope = self.command(cmd).await?;
        let entries = normalize::balance_entries(&envelope.response, query.token_details);
        Ok(match query.tokenid.as_deref() {
            Some(id) if !id.is_empty() => normalize::filter_by_token(entries, id),
            _ => entries,
        })
    }

    /// Balance rows for indivisible tokens only.
    pub async fn nfts(&self) -> Result<Vec<BalanceEntry>> {
        let balances = self
            .balance(BalanceQuery { tokenid: None, token_details: true })
            .await?;
        Ok(balances.into_iter().filter(BalanceEntry::is_nft).collect())
    }

    /// Numeric balance of one token; zeros when the wallet doesn't hold it.
    pub async fn balance_summary(&self, tokenid: &str) -> Result<BalanceSummary> {
        let balances = self.balance(BalanceQuery::token(tokenid)).await?;
        Ok(normalize::summarize(&balances))
    }

    pub async fn status(&self) -> Result<NodeStatus> {
        let envelope = self.command("status").await?;
        Ok(normalize::node_status(&envelope.response))
    }

    /// Send Minima or a token to `address`.
    pub async fn send(&self, address: &str, amount: impl Display, opts: SendOptions) -> Result<SendReceipt> {
        let mut cmd = format!("send address:{} amount:{}", address, amount);
        if let Some(tokenid) = opts.tokenid.filter(|t| !t.is_empty()) {
            cmd.push_str(&format!(" tokenid:{}", tokenid));
        }
        if let Some(split) = opts.split.filter(|s| *s > 0) {
            cmd.push_str(&format!(" split:{}", split));
        }
        if let Some(burn) = opts.burn.filter(|b| !b.is_empty()) {
            cmd.push_str(&format!(" burn:{}", burn));
        }

        let envelope = self.command(&cmd).await?;
        let receipt = normalize::send_receipt(&envelope.response);
        info!(txpowid = %receipt.txpowid, "send accepted by node");
        Ok(receipt)
    }

    /// Hash `data` on the node. Local only: nothing is written on-chain.
    pub async fn hash(&self, data: &str) -> Result<HashResult> {
        let envelope = self.command(&format!("hash data:{}", data)).await?;
        Ok(normalize::hash_result(&envelope.response))
    }

    /// Persist `data` on-chain as state of a zero-value self-send.
    pub async fn record_on_chain(&self, data: &str, opts: RecordOptions) -> Result<OnChainRecord> {
        let own = self.getaddress().await?;
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        let state = normalize::record_state(data, &opts, &timestamp);
        let state_json = normalize::state_json(&state);

        let mut cmd = format!(
            "send address:{} amount:{} state:{}",
            own.miniaddress, RECORD_AMOUNT, state_json
        );
        if let Some(burn) = opts.burn.as_deref().filter(|b| !b.is_empty()) {
            cmd.push_str(&format!(" burn:{}", burn));
        }

        let envelope = self.command(&cmd).await?;
        let receipt = normalize::send_receipt(&envelope.response);
        info!(txpowid = %receipt.txpowid, port = opts.port, "data recorded on-chain");
        Ok(OnChainRecord {
            txpowid: receipt.txpowid,
            explorer_url: receipt.explorer_url,
            data: data.to_string(),
            label: opts.label,
            port: opts.port,
            timestamp,
            block: receipt.block,
            date: receipt.date,
            raw: receipt.raw,
        })
    }

    pub async fn random(&self) -> Result<RandomValue> {
        let envelope = self.command("random").await?;
        Ok(normalize::random_value(&envelope.response))
    }

    pub async fn tokens(&self) -> Result<Vec<TokenInfo>> {
        let envelope = self.command("tokens").await?;
        Ok(normalize::token_infos(&envelope.response))
    }

    pub async fn getaddress(&self) -> Result<NodeAddress> {
        let envelope = self.command("getaddress").await?;
        Ok(normalize::node_address(&envelope.response))
    }

    pub async fn maxima_info(&self) -> Result<MaximaInfo> {
        let envelope = self.command("maxima action:info").await?;
        Ok(normalize::maxima_info(&envelope.response))
    }

    pub async fn contacts(&self) -> Result<Vec<Contact>> {
        let envelope = self.command("maxcontacts action:list").await?;
        Ok(normalize::contacts(&envelope.response))
    }

    /// Ask the node to POST events to `hook`, optionally filtered.
    pub async fn add_webhook(&self, hook: &str, filter: Option<&str>) -> Result<()> {
        let mut cmd = format!("webhooks action:add hook:{}", hook);
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            cmd.push_str(&format!(" filter:{}", filter));
        }
        self.command(&cmd).await.map(|_| ())
    }

    pub async fn remove_webhook(&self, hook: &str) -> Result<()> {
        self.command(&format!("webhooks action:remove hook:{}", hook))
            .await
            .map(|_| ())
    }
}
