//! Per-connection session driver.
//!
//! A live connection runs two tasks:
//! - the receive task reads client frames and dispatches them by channel
//! - the pusher task forwards bus events and direct replies to the client
//!
//! When either task ends the other is aborted and the connection is disconnected.

mod chat;
mod notification;

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{Channel, EventReceiver, SessionContext},
    infrastructure::dto::{conversion::render_event, websocket::OutboundFrame},
    ui::state::AppState,
    usecase::ConnectedSession,
};

/// Capacity of the per-connection reply queue (error and ack frames)
const REPLY_QUEUE_CAPACITY: usize = 32;

pub async fn run_session(socket: WebSocket, state: Arc<AppState>, connected: ConnectedSession) {
    let ConnectedSession {
        mut session,
        events,
    } = connected;
    let context = session.context().clone();
    let connection_id = context.connection_id();

    let (sender, receiver) = socket.split();
    let (reply_tx, reply_rx) = mpsc::channel(REPLY_QUEUE_CAPACITY);

    let mut recv_task = tokio::spawn(receive_loop(
        receiver,
        state.clone(),
        context.clone(),
        reply_tx,
    ));
    let mut send_task = tokio::spawn(pusher_loop(
        context.channel().clone(),
        events,
        reply_rx,
        sender,
    ));

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state
        .disconnect_participant_usecase
        .execute(&mut session)
        .await;
    tracing::info!("Session '{}' closed", connection_id);
}

/// Reads frames from the client until it closes or the transport fails.
async fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    context: SessionContext,
    replies: mpsc::Sender<OutboundFrame>,
) {
    let connection_id = context.connection_id();

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!("WebSocket error on '{}': {}", connection_id, e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                let reply = match context.channel() {
                    Channel::Room(_) => {
                        chat::on_inbound_text(&state, &context, text.as_str()).await
                    }
                    Channel::Notifications(_) => {
                        Some(notification::on_inbound_text(&context, text.as_str()))
                    }
                };
                if let Some(frame) = reply
                    && replies.send(frame).await.is_err()
                {
                    break;
                }
            }
            Message::Binary(_) => {
                tracing::debug!("Ignoring binary frame from '{}'", connection_id);
            }
            Message::Ping(_) | Message::Pong(_) => {
                // Ping/pong is handled automatically by the WebSocket protocol
            }
            Message::Close(_) => {
                tracing::info!("Client '{}' requested close", connection_id);
                break;
            }
        }
    }
}

/// Forwards bus events and replies to the client.
///
/// Ends when the bus closes the event queue (disconnect, overflow eviction) or
/// the client can no longer be written to.
async fn pusher_loop(
    channel: Channel,
    mut events: EventReceiver,
    mut replies: mpsc::Receiver<OutboundFrame>,
    mut sender: SplitSink<WebSocket, Message>,
) {
    loop {
        let frame = tokio::select! {
            event = events.recv() => match event {
                Some(event) => match render_event(&channel, &event) {
                    Some(frame) => frame,
                    None => continue,
                },
                None => break,
            },
            reply = replies.recv() => match reply {
                Some(frame) => frame,
                None => break,
            },
        };

        if !push_frame(&mut sender, &frame).await {
            break;
        }
    }
}

/// Returns `false` once the client can no longer be written to.
async fn push_frame(sender: &mut SplitSink<WebSocket, Message>, frame: &OutboundFrame) -> bool {
    let json = match frame.to_json() {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize outbound frame: {}", e);
            return true;
        }
    };
    sender.send(Message::Text(json.into())).await.is_ok()
}
