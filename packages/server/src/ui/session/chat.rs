//! Inbound frames on a room channel.

use crate::{
    domain::{MessageText, SessionContext},
    infrastructure::dto::websocket::{ErrorFrame, InboundChatFrame, OutboundFrame},
    ui::state::AppState,
    usecase::SendMessageError,
};

/// Handle a chat text frame, returning a frame for the sender only, if any.
pub async fn on_inbound_text(
    state: &AppState,
    context: &SessionContext,
    raw: &str,
) -> Option<OutboundFrame> {
    let frame = match InboundChatFrame::from_text(raw) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!(
                "Malformed chat frame from '{}': {}",
                context.connection_id(),
                e
            );
            return Some(ErrorFrame::invalid_json().into());
        }
    };

    match state
        .send_message_usecase
        .execute(context, MessageText::new(frame.message))
        .await
    {
        Ok(recipients) => {
            tracing::debug!(
                "Broadcast message from '{}' to {} connections",
                context.connection_id(),
                recipients
            );
            None
        }
        Err(SendMessageError::PersistenceFailed(_)) => Some(ErrorFrame::store_failed().into()),
        Err(e) => {
            tracing::warn!("Failed to send message: {}", e);
            None
        }
    }
}
