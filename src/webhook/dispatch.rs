//! Count, classify and log incoming events.

use crate::webhook::event::{summarize, EventPayload, WebhookEvent};
use crate::webhook::state::ListenerState;
use tracing::{info, warn};

/// Handle one decoded payload. The event is counted before it is parsed, so a
/// known event with a broken body still shows up in the tally.
pub fn process_event(state: &ListenerState, payload: EventPayload) -> Option<WebhookEvent> {
    state.record_event(&payload.event);

    match WebhookEvent::parse(&payload.event, payload.data) {
        Ok(event) => {
            handle(state, &event);
            Some(event)
        }
        Err(e) => {
            warn!("rejected event: {}", e);
            None
        }
    }
}

fn handle(state: &ListenerState, event: &WebhookEvent) {
    match event {
        WebhookEvent::NewBlock(notice) => {
            state.set_last_block(&notice.block);
            info!(
                "NEWBLOCK #{} (super={}, txns={}, hasTx={})",
                notice.block, notice.superblock, notice.txn_count, notice.has_transaction
            );
        }
        WebhookEvent::Mining { block } => info!("MINING for block #{}", block),
        WebhookEvent::Timer { interval, timemilli } => {
            info!("TIMER {} ({})", interval.label(), timemilli)
        }
        WebhookEvent::NewTransaction(data) => info!("NEWTRANSACTION: {}", summarize(data)),
        WebhookEvent::NewBalance(data) => info!("NEWBALANCE: {}", summarize(data)),
        WebhookEvent::Maxima(data) => info!("MAXIMA message received: {}", summarize(data)),
        WebhookEvent::Unknown { name, data } => {
            warn!("UNKNOWN event: {} {}", name, summarize(data))
        }
    }
}
