//! Request handlers.

mod auth;
mod http;
mod websocket;

pub use auth::{AuthenticatedScope, attach_identity};
pub use http::health_check;
pub use websocket::{circle_handler, lobby_handler, notifications_handler};
