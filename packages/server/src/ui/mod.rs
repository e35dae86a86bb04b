//! WebSocket gateway server implementation.

mod handler;
mod server;
mod session;
mod signal;
pub mod state;

pub use server::Server;
