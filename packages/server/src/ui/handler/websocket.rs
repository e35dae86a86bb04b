//! WebSocket upgrade handlers.
//!
//! Every upgrade is accepted first. Authentication and authorization run inside
//! the upgraded connection, and a rejected connection is closed right away with
//! code 1008 (policy violation) and an empty reason.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{
        Path, RawQuery, State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    response::Response,
};

use crate::{
    domain::RoomName,
    ui::{session::run_session, state::AppState},
    usecase::{ConnectError, ConnectedSession},
};

use super::auth::AuthenticatedScope;

/// `/ws/circles/{room}?token=...`
pub async fn circle_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    ws.on_upgrade(move |socket| async move {
        let connected = match RoomName::new(room) {
            Ok(room) => {
                state
                    .connect_participant_usecase
                    .connect_circle(room, query.as_deref())
                    .await
            }
            Err(e) => Err(ConnectError::AuthorizationFailure(e.to_string())),
        };
        accept_or_reject(socket, state, connected).await
    })
}

/// `/ws/chat/{room}`
pub async fn lobby_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
    Extension(AuthenticatedScope(identity)): Extension<AuthenticatedScope>,
) -> Response {
    ws.on_upgrade(move |socket| async move {
        let connected = match RoomName::new(room) {
            Ok(room) => {
                state
                    .connect_participant_usecase
                    .connect_lobby(room, identity)
                    .await
            }
            Err(e) => Err(ConnectError::AuthorizationFailure(e.to_string())),
        };
        accept_or_reject(socket, state, connected).await
    })
}

/// `/ws/notifications`
pub async fn notifications_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedScope(identity)): Extension<AuthenticatedScope>,
) -> Response {
    ws.on_upgrade(move |socket| async move {
        let connected = state
            .connect_participant_usecase
            .connect_notifications(identity)
            .await;
        accept_or_reject(socket, state, connected).await
    })
}

async fn accept_or_reject(
    socket: WebSocket,
    state: Arc<AppState>,
    connected: Result<ConnectedSession, ConnectError>,
) {
    match connected {
        Ok(connected) => run_session(socket, state, connected).await,
        Err(e) => {
            tracing::warn!("Rejecting connection: {}", e);
            reject(socket).await;
        }
    }
}

/// Close with 1008 and no reason; the rejection cause stays in the server log
async fn reject(mut socket: WebSocket) {
    let frame = CloseFrame {
        code: close_code::POLICY,
        reason: Utf8Bytes::from_static(""),
    };
    if let Err(e) = socket.send(Message::Close(Some(frame))).await {
        tracing::debug!("Failed to send close frame: {}", e);
    }
}
