//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, middleware, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{ConnectParticipantUseCase, DisconnectParticipantUseCase, SendMessageUseCase};

use super::{
    handler::{
        attach_identity, circle_handler, health_check, lobby_handler, notifications_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket gateway server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_participant_usecase,
///     disconnect_participant_usecase,
///     send_message_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `connect_participant_usecase` - UseCase for authenticating and registering connections
    /// * `disconnect_participant_usecase` - UseCase for deregistering connections
    /// * `send_message_usecase` - UseCase for persisting and broadcasting chat messages
    pub fn new(
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                connect_participant_usecase,
                disconnect_participant_usecase,
                send_message_usecase,
            }),
        }
    }

    /// Build the router with all gateway endpoints
    pub fn router(&self) -> Router {
        // Lobby and notification channels take the identity from the request scope
        let scoped = Router::new()
            .route("/ws/chat/{room}", get(lobby_handler))
            .route("/ws/chat/{room}/", get(lobby_handler))
            .route("/ws/notifications", get(notifications_handler))
            .route("/ws/notifications/", get(notifications_handler))
            .route_layer(middleware::from_fn_with_state(
                self.state.clone(),
                attach_identity,
            ));

        Router::new()
            // WebSocket エンドポイント
            .route("/ws/circles/{room}", get(circle_handler))
            .route("/ws/circles/{room}/", get(circle_handler))
            .merge(scoped)
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
    }

    /// Run the WebSocket gateway server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Gateway listening on {}", listener.local_addr()?);
        tracing::info!("Circle rooms:  ws://{}/ws/circles/{{room}}?token=...", bind_addr);
        tracing::info!("Lobby rooms:   ws://{}/ws/chat/{{room}}", bind_addr);
        tracing::info!("Notifications: ws://{}/ws/notifications", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
