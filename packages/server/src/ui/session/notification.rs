//! Inbound frames on a notification channel.
//!
//! Clients cannot publish notifications. Any valid JSON is acknowledged and
//! has no other effect.

use serde_json::Value;

use crate::{
    domain::SessionContext,
    infrastructure::dto::websocket::{AckFrame, ErrorFrame, OutboundFrame},
};

pub fn on_inbound_text(context: &SessionContext, raw: &str) -> OutboundFrame {
    match serde_json::from_str::<Value>(raw) {
        Ok(_) => AckFrame::received().into(),
        Err(e) => {
            tracing::warn!(
                "Malformed frame on notification channel '{}': {}",
                context.connection_id(),
                e
            );
            ErrorFrame::invalid_json().into()
        }
    }
}
